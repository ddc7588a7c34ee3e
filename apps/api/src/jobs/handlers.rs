use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::query::{build_profile_query, build_search_query};
use crate::models::job::JobListing;
use crate::profile::store::{load_profile, load_skills};
use crate::state::AppState;

/// Profile-driven match searches return at most this many listings.
const MATCH_LIMIT: usize = 20;

#[derive(Deserialize)]
pub struct JobSearchQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub count: Option<u32>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobListing>,
    pub total: usize,
}

/// GET /api/v1/jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSearchQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let role = params.role.as_deref().unwrap_or("all");
    let location = params
        .location
        .unwrap_or_else(|| state.config.search_location.clone());
    let count = params.count.unwrap_or(state.config.jobs_default_num);

    let query = build_search_query(role, params.q.as_deref(), &location);
    let jobs = state.jobs.search(&state.db, &query, &location, count).await;

    Ok(Json(JobsResponse {
        total: jobs.len(),
        jobs,
    }))
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/jobs/matches
///
/// Same search as the Apply Engine runs, without the apply side effects.
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let profile = load_profile(&state.db, params.user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(params.user_id))?;
    let skills = load_skills(&state.db, params.user_id).await?;

    let query = build_profile_query(
        profile.role.as_deref(),
        &skills,
        profile.experience_years,
        &state.config.search_location,
        "all",
    );
    let mut jobs = state
        .jobs
        .search(
            &state.db,
            &query,
            &state.config.search_location,
            state.config.jobs_default_num,
        )
        .await;
    jobs.truncate(MATCH_LIMIT);

    Ok(Json(JobsResponse {
        total: jobs.len(),
        jobs,
    }))
}
