//! Resume Ingestion Pipeline — stores the document, extracts text, derives a
//! suitability score, classifies a profile, and seeds a bootstrap apply batch.
//!
//! Failure policy: document validation and extraction abort before/with no
//! profile writes; classifier failure degrades gracefully (text and score are
//! persisted, profile stays unset); bootstrap-apply failure is logged only.

use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::apply::engine::ApplyEngine;
use crate::classifier::{ClassifierClient, ResumeProfile};
use crate::errors::AppError;
use crate::ingest::ats::suitability_score;
use crate::ingest::extract::{extract_text, validate_document};
use crate::ingest::skills::{normalize_skills, upsert_skills};

/// Size of the immediate apply batch triggered after a successful ingest.
pub const BOOTSTRAP_BATCH_SIZE: u32 = 5;

/// Dependencies the pipeline needs, passed by the handler.
pub struct IngestDeps<'a> {
    pub pool: &'a PgPool,
    pub s3: &'a aws_sdk_s3::Client,
    pub s3_bucket: &'a str,
    pub classifier: &'a ClassifierClient,
    pub engine: &'a Arc<ApplyEngine>,
}

#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub resume_path: String,
    pub ats_score: i32,
    /// `None` when classification failed and the pipeline degraded.
    pub profile: Option<ResumeProfile>,
}

pub async fn ingest_resume(
    deps: IngestDeps<'_>,
    user_id: Uuid,
    file_name: &str,
    document: Bytes,
) -> Result<IngestOutcome, AppError> {
    validate_document(&document)?;

    // 1. Persist the raw document under a per-user key.
    let resume_path = format!(
        "resumes/{user_id}/{}_{file_name}",
        Utc::now().timestamp_millis()
    );
    deps.s3
        .put_object()
        .bucket(deps.s3_bucket)
        .key(&resume_path)
        .body(ByteStream::from(document.clone()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Resume upload failed: {e}")))?;

    // 2. Extract text and compute the deterministic suitability score.
    let text = extract_text(document).await?;
    let ats_score = suitability_score(&text);

    // 3. Classify. Failure is absorbed: the upload is not rolled back and the
    //    profile simply stays unset.
    let profile = match deps.classifier.classify_resume(&text).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Resume classification failed for user {user_id}, degrading: {e}");
            None
        }
    };

    persist(deps.pool, user_id, &resume_path, &text, ats_score, profile.as_ref()).await?;

    info!(
        "Resume ingested for user {user_id}: ats_score={ats_score}, classified={}",
        profile.is_some()
    );

    // 4. Bootstrap batch through the Apply Engine. Never escalated.
    let role_filter = profile
        .as_ref()
        .and_then(|p| p.role.clone())
        .unwrap_or_else(|| "all".to_string());
    if let Err(e) = deps
        .engine
        .auto_apply(user_id, BOOTSTRAP_BATCH_SIZE, &role_filter)
        .await
    {
        warn!("Bootstrap apply after ingest failed for user {user_id}: {e}");
    }

    Ok(IngestOutcome {
        resume_path,
        ats_score,
        profile,
    })
}

/// Persists the extracted text and score, plus the classified profile fields
/// and skill set when classification succeeded.
async fn persist(
    pool: &PgPool,
    user_id: Uuid,
    resume_path: &str,
    text: &str,
    ats_score: i32,
    profile: Option<&ResumeProfile>,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE users
         SET resume_path = $1, resume_text = $2, ats_score = $3, updated_at = now()
         WHERE id = $4",
    )
    .bind(resume_path)
    .bind(text)
    .bind(ats_score)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    if let Some(profile) = profile {
        sqlx::query(
            "UPDATE users
             SET role = $1, experience_years = $2, education = $3, current_company = $4,
                 updated_at = now()
             WHERE id = $5",
        )
        .bind(&profile.role)
        .bind(profile.experience_years)
        .bind(&profile.education)
        .bind(&profile.current_company)
        .bind(user_id)
        .execute(pool)
        .await?;

        let skills = normalize_skills(profile.skills.clone());
        upsert_skills(pool, user_id, &skills)
            .await
            .map_err(AppError::Internal)?;
    }

    Ok(())
}
