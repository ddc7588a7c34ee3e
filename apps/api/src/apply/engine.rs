//! Apply Engine — the rate-limited, deduplicating apply loop.
//!
//! The engine exclusively owns Application writes. Invocations for one user
//! serialize through a per-user async mutex so the quota read-then-write
//! sequence cannot interleave; the unique `(user_id, job_id)` constraint is
//! the storage-level backstop for dedup under any remaining concurrency.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::apply::scoring::MatchScorer;
use crate::errors::AppError;
use crate::jobs::query::build_profile_query;
use crate::jobs::source::JobSourceClient;
use crate::models::job::JobListing;
use crate::models::user::UserProfileRow;
use crate::profile::store::{load_profile, load_skills};

/// One newly created application, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedJob {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub match_score: i32,
}

/// Outcome of one `auto_apply` invocation. Duplicate skips and insert
/// failures are counted separately so callers can tell them apart.
#[derive(Debug, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedJob>,
    pub skipped_duplicates: u32,
    pub failed: u32,
    pub remaining_quota: u32,
}

pub struct ApplyEngine {
    db: PgPool,
    source: JobSourceClient,
    scorer: Arc<dyn MatchScorer>,
    daily_limit: u32,
    search_location: String,
    /// Per-user critical sections. Entries are created on first use and kept
    /// for the process lifetime; the map itself is only locked briefly.
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ApplyEngine {
    pub fn new(
        db: PgPool,
        source: JobSourceClient,
        scorer: Arc<dyn MatchScorer>,
        daily_limit: u32,
        search_location: String,
    ) -> Self {
        Self {
            db,
            source,
            scorer,
            daily_limit,
            search_location,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Applies to up to `requested` jobs for the user, bounded by the daily
    /// quota. Candidates are processed strictly in provider order; iteration
    /// stops once enough insertions succeeded or candidates run out.
    pub async fn auto_apply(
        &self,
        user_id: Uuid,
        requested: u32,
        role_filter: &str,
    ) -> Result<ApplyReport, AppError> {
        let user_lock = self.lock_for(user_id).await;
        let _guard = user_lock.lock().await;

        let applied_today = self.count_applied_today(user_id).await?;
        let (remaining, to_apply) = compute_batch(requested, self.daily_limit, applied_today);

        if to_apply == 0 {
            return Err(AppError::QuotaExceeded {
                limit: self.daily_limit,
                applied_today,
            });
        }

        let profile = load_profile(&self.db, user_id)
            .await?
            .ok_or(AppError::ProfileNotFound(user_id))?;
        let skills = load_skills(&self.db, user_id).await?;

        let query = build_profile_query(
            profile.role.as_deref(),
            &skills,
            profile.experience_years,
            &self.search_location,
            role_filter,
        );
        let candidates = self
            .source
            .search(&self.db, &query, &self.search_location, crate::config::MAX_RESULT_COUNT)
            .await;

        let mut applied = Vec::new();
        let mut skipped_duplicates = 0u32;
        let mut failed = 0u32;

        for candidate in &candidates {
            if applied.len() as u32 >= to_apply {
                break;
            }

            let score = self.scorer.score(&profile, candidate).await;
            match self.insert_application(&profile, candidate, score).await {
                Ok(Some(application_id)) => {
                    applied.push(AppliedJob {
                        application_id,
                        job_id: candidate.id,
                        title: candidate.title.clone(),
                        company: candidate.company.clone(),
                        match_score: score,
                    });
                }
                Ok(None) => skipped_duplicates += 1,
                Err(e) => {
                    warn!(
                        "Application insert failed for user {user_id}, job {}: {e}",
                        candidate.id
                    );
                    failed += 1;
                }
            }
        }

        let remaining_quota = u32::try_from(remaining).unwrap_or(0) - applied.len() as u32;
        info!(
            "Auto-applied to {} jobs for user {user_id} (skipped {skipped_duplicates} duplicates, \
             {failed} failed, remaining quota {remaining_quota})",
            applied.len()
        );

        Ok(ApplyReport {
            applied,
            skipped_duplicates,
            failed,
            remaining_quota,
        })
    }

    /// Inserts one application snapshot. Returns `Ok(None)` when an
    /// application for this (user, job) pair already exists — the unique
    /// constraint makes this race-safe, so a lost race reads as a skip.
    async fn insert_application(
        &self,
        profile: &UserProfileRow,
        candidate: &JobListing,
        match_score: i32,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO applications
                (user_id, job_id, status, match_score, job_title, company_name,
                 resume_path, education, current_company)
            VALUES ($1, $2, 'applied', $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(profile.id)
        .bind(candidate.id)
        .bind(match_score)
        .bind(&candidate.title)
        .bind(&candidate.company)
        .bind(&profile.resume_path)
        .bind(&profile.education)
        .bind(&profile.current_company)
        .fetch_optional(&self.db)
        .await
    }

    async fn count_applied_today(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications
             WHERE user_id = $1 AND applied_at::date = CURRENT_DATE",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
    }

    async fn lock_for(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(user_id).or_default().clone()
    }
}

/// Quota arithmetic for one invocation: `(remaining, to_apply)`.
/// Kept separate from the engine so the boundary cases stay testable without
/// a database.
pub fn compute_batch(requested: u32, daily_limit: u32, applied_today: i64) -> (i64, u32) {
    let remaining = i64::from(daily_limit) - applied_today;
    let to_apply = u32::try_from(remaining.max(0)).unwrap_or(0).min(requested);
    (remaining, to_apply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_bounded_by_remaining_quota() {
        // 28 already applied, limit 30, 10 requested -> at most 2 go out.
        let (remaining, to_apply) = compute_batch(10, 30, 28);
        assert_eq!(remaining, 2);
        assert_eq!(to_apply, 2);
    }

    #[test]
    fn test_batch_bounded_by_request() {
        let (remaining, to_apply) = compute_batch(5, 30, 0);
        assert_eq!(remaining, 30);
        assert_eq!(to_apply, 5);
    }

    #[test]
    fn test_batch_zero_when_limit_reached() {
        let (_, to_apply) = compute_batch(10, 30, 30);
        assert_eq!(to_apply, 0);
    }

    #[test]
    fn test_batch_zero_when_over_limit() {
        // Over-limit counts (from a historical race) never go negative.
        let (remaining, to_apply) = compute_batch(10, 30, 35);
        assert_eq!(remaining, -5);
        assert_eq!(to_apply, 0);
    }
}
