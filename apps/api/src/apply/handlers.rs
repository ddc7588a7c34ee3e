use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::apply::engine::ApplyReport;
use crate::errors::AppError;
use crate::models::application::{is_valid_status, ApplicationSummaryRow, APPLICATION_STATUSES};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AutoApplyRequest {
    pub user_id: Uuid,
    pub max_apps: Option<u32>,
    pub role: Option<String>,
}

/// POST /api/v1/applications/auto
pub async fn handle_auto_apply(
    State(state): State<AppState>,
    Json(req): Json<AutoApplyRequest>,
) -> Result<Json<ApplyReport>, AppError> {
    let requested = req.max_apps.unwrap_or(state.config.daily_apply_limit);
    let role_filter = req.role.as_deref().unwrap_or("all");

    let report = state
        .engine
        .auto_apply(req.user_id, requested, role_filter)
        .await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct ApplicationsQuery {
    pub user_id: Uuid,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationSummaryRow>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationsQuery>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(50).clamp(1, 100);
    let offset = i64::from(page - 1) * i64::from(limit);

    let applications = sqlx::query_as::<_, ApplicationSummaryRow>(
        r#"
        SELECT id, job_id, job_title, company_name, status, match_score, applied_at
        FROM applications
        WHERE user_id = $1
        ORDER BY applied_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(params.user_id)
    .bind(i64::from(limit))
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE user_id = $1")
        .bind(params.user_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApplicationsResponse {
        applications,
        total,
        page,
        limit,
    }))
}

#[derive(Deserialize)]
pub struct ManualApplyRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
}

#[derive(Serialize)]
pub struct ManualApplyResponse {
    pub application_id: Uuid,
    pub job_title: String,
}

/// POST /api/v1/applications
///
/// Manual apply to a catalog job. Re-application to the same job refreshes
/// status and timestamp instead of inserting a second row.
pub async fn handle_manual_apply(
    State(state): State<AppState>,
    Json(req): Json<ManualApplyRequest>,
) -> Result<Json<ManualApplyResponse>, AppError> {
    // Snapshot title/company so the application survives catalog deletion.
    let job: Option<(String, String)> =
        sqlx::query_as("SELECT title, company FROM jobs WHERE id = $1")
            .bind(req.job_id)
            .fetch_optional(&state.db)
            .await?;
    let (job_title, company_name) =
        job.unwrap_or_else(|| ("Untitled Job".to_string(), "N/A".to_string()));

    let application_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO applications (user_id, job_id, status, job_title, company_name)
        VALUES ($1, $2, 'applied', $3, $4)
        ON CONFLICT (user_id, job_id) DO UPDATE
            SET status = 'applied',
                applied_at = now(),
                job_title = EXCLUDED.job_title,
                company_name = EXCLUDED.company_name
        RETURNING id
        "#,
    )
    .bind(req.user_id)
    .bind(req.job_id)
    .bind(&job_title)
    .bind(&company_name)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ManualApplyResponse {
        application_id,
        job_title,
    }))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub user_id: Uuid,
    pub status: String,
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<StatusCode, AppError> {
    if !is_valid_status(&req.status) {
        return Err(AppError::Validation(format!(
            "Invalid status '{}' (expected one of {})",
            req.status,
            APPLICATION_STATUSES.join(", ")
        )));
    }

    let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = $2 AND user_id = $3")
        .bind(&req.status)
        .bind(id)
        .bind(req.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
