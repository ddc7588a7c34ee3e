use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::pipeline::{ingest_resume, IngestDeps, IngestOutcome};
use crate::profile::store::{load_profile, load_skills};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/resumes
///
/// Multipart upload with a single `resume` file field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, AppError> {
    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidDocument(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("resume") {
            let file_name = field
                .file_name()
                .unwrap_or("resume.pdf")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidDocument(format!("Failed to read upload: {e}")))?;
            document = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) =
        document.ok_or_else(|| AppError::InvalidDocument("No resume file uploaded".to_string()))?;

    let outcome = ingest_resume(
        IngestDeps {
            pool: &state.db,
            s3: &state.s3,
            s3_bucket: &state.config.s3_bucket,
            classifier: &state.classifier,
            engine: &state.engine,
        },
        params.user_id,
        &file_name,
        bytes,
    )
    .await?;

    Ok(Json(outcome))
}

#[derive(Serialize)]
pub struct ResumeDataResponse {
    pub resume_path: String,
    pub ats_score: Option<i32>,
    pub role: Option<String>,
    pub experience_years: i32,
    pub education: Option<String>,
    pub current_company: Option<String>,
    pub skills: Vec<String>,
}

/// GET /api/v1/resumes
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeDataResponse>, AppError> {
    let profile = load_profile(&state.db, params.user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(params.user_id))?;
    let resume_path = profile
        .resume_path
        .ok_or_else(|| AppError::NotFound("No resume on file".to_string()))?;
    let skills = load_skills(&state.db, params.user_id).await?;

    Ok(Json(ResumeDataResponse {
        resume_path,
        ats_score: profile.ats_score,
        role: profile.role,
        experience_years: profile.experience_years,
        education: profile.education,
        current_company: profile.current_company,
        skills,
    }))
}

/// DELETE /api/v1/resumes
///
/// Removes the stored document (best-effort), the parsed profile fields, and
/// the skill set.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = load_profile(&state.db, params.user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(params.user_id))?;

    if let Some(key) = &profile.resume_path {
        if let Err(e) = state
            .s3
            .delete_object()
            .bucket(&state.config.s3_bucket)
            .key(key)
            .send()
            .await
        {
            tracing::warn!("Stored resume delete failed for {key}: {e}");
        }
    }

    sqlx::query(
        "UPDATE users
         SET resume_path = NULL, resume_text = NULL, ats_score = NULL,
             role = NULL, education = NULL, current_company = NULL, updated_at = now()
         WHERE id = $1",
    )
    .bind(params.user_id)
    .execute(&state.db)
    .await?;

    sqlx::query("DELETE FROM user_skills WHERE user_id = $1")
        .bind(params.user_id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
