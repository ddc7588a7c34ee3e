use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::skills::{normalize_skills, upsert_skills};
use crate::models::user::UserProfileRow;
use crate::profile::store::{load_profile, load_skills};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: UserProfileRow,
    pub skills: Vec<String>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = load_profile(&state.db, params.user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(params.user_id))?;
    let skills = load_skills(&state.db, params.user_id).await?;
    Ok(Json(ProfileResponse { profile, skills }))
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub user_id: Uuid,
    pub full_name: String,
    pub role: Option<String>,
    pub experience_years: i32,
    pub education: Option<String>,
    pub current_company: Option<String>,
}

/// PATCH /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let result = sqlx::query(
        "UPDATE users
         SET full_name = $1, role = $2, experience_years = $3, education = $4,
             current_company = $5, updated_at = now()
         WHERE id = $6",
    )
    .bind(&req.full_name)
    .bind(&req.role)
    .bind(req.experience_years)
    .bind(&req.education)
    .bind(&req.current_company)
    .bind(req.user_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ProfileNotFound(req.user_id));
    }

    let profile = load_profile(&state.db, req.user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(req.user_id))?;
    let skills = load_skills(&state.db, req.user_id).await?;
    Ok(Json(ProfileResponse { profile, skills }))
}

#[derive(Deserialize)]
pub struct AddSkillsRequest {
    pub user_id: Uuid,
    pub skills: Vec<String>,
}

#[derive(Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
}

/// POST /api/v1/profile/skills
///
/// Skill writes here normalize exactly like ingestion writes do.
pub async fn handle_add_skills(
    State(state): State<AppState>,
    Json(req): Json<AddSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let normalized = normalize_skills(req.skills);
    if normalized.is_empty() {
        return Err(AppError::Validation(
            "Skills array required (non-empty)".to_string(),
        ));
    }

    upsert_skills(&state.db, req.user_id, &normalized)
        .await
        .map_err(AppError::Internal)?;

    let skills = load_skills(&state.db, req.user_id).await?;
    Ok(Json(SkillsResponse { skills }))
}
