use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::apply::engine::ApplyEngine;
use crate::classifier::ClassifierClient;
use crate::config::Config;
use crate::jobs::source::JobSourceClient;
use crate::scheduler::AutoSearchScheduler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub classifier: ClassifierClient,
    pub jobs: JobSourceClient,
    /// The Apply Engine owns all Application writes. The scheduler and the
    /// ingestion pipeline both go through it.
    pub engine: Arc<ApplyEngine>,
    pub scheduler: AutoSearchScheduler,
    pub config: Config,
}
