mod apply;
mod classifier;
mod config;
mod db;
mod errors;
mod ingest;
mod jobs;
mod models;
mod profile;
mod routes;
mod scheduler;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::apply::engine::ApplyEngine;
use crate::apply::scoring::RandomBandScorer;
use crate::classifier::ClassifierClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::source::JobSourceClient;
use crate::routes::build_router;
use crate::scheduler::AutoSearchScheduler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobPilot API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs embedded migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO for resume documents
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize the resume classifier
    let classifier = ClassifierClient::new(config.groq_api_key.clone());
    info!(
        "Resume classifier initialized (model: {}, credential: {})",
        classifier::MODEL,
        config.groq_api_key.is_some()
    );

    // Initialize the job source adapter. A missing provider credential is
    // tolerated: searches run in fallback mode until one is configured.
    if config.serp_api_key.is_none() {
        info!("No job provider credential configured; searches will use fallback listings");
    }
    let job_source = JobSourceClient::new(config.serp_api_key.clone());

    // Apply Engine with the placeholder match scorer
    let engine = Arc::new(ApplyEngine::new(
        db.clone(),
        job_source.clone(),
        Arc::new(RandomBandScorer),
        config.daily_apply_limit,
        config.search_location.clone(),
    ));

    // Auto-search scheduler. Timers are process-local: none survive a restart,
    // sessions re-register on their next start.
    let scheduler = AutoSearchScheduler::new(
        Arc::clone(&engine),
        Duration::from_millis(config.search_interval_ms),
    );
    info!(
        "Auto-search scheduler ready (period {}ms, {} applications/day)",
        config.search_interval_ms, config.daily_apply_limit
    );

    // Build app state
    let state = AppState {
        db,
        s3,
        classifier,
        jobs: job_source,
        engine,
        scheduler,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobpilot-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
