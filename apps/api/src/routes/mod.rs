pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::apply::handlers as application_handlers;
use crate::ingest::handlers as resume_handlers;
use crate::jobs::handlers as job_handlers;
use crate::profile::handlers as profile_handlers;
use crate::scheduler::handlers as session_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session boundary — drives the auto-search scheduler lifecycle
        .route(
            "/api/v1/sessions/start",
            post(session_handlers::handle_session_start),
        )
        .route(
            "/api/v1/sessions/end",
            post(session_handlers::handle_session_end),
        )
        // Job catalog
        .route("/api/v1/jobs", get(job_handlers::handle_search_jobs))
        .route(
            "/api/v1/jobs/matches",
            get(job_handlers::handle_job_matches),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(application_handlers::handle_list_applications)
                .post(application_handlers::handle_manual_apply),
        )
        .route(
            "/api/v1/applications/auto",
            post(application_handlers::handle_auto_apply),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(application_handlers::handle_update_status),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resume_handlers::handle_upload_resume)
                .get(resume_handlers::handle_get_resume)
                .delete(resume_handlers::handle_delete_resume),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(profile_handlers::handle_get_profile)
                .patch(profile_handlers::handle_update_profile),
        )
        .route(
            "/api/v1/profile/skills",
            post(profile_handlers::handle_add_skills),
        )
        // Resume uploads run up to a few MB; the 2MB default is too tight.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
