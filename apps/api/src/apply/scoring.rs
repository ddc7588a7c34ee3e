//! Match Scoring — pluggable, trait-based scorer for user-vs-listing fit.
//!
//! Default: `RandomBandScorer`, a placeholder that draws a bounded value in
//! [50, 100]. It carries no semantic guarantee; the trait seam exists so a
//! real ranking backend can replace it without touching the engine.

use async_trait::async_trait;
use rand::Rng;

use crate::models::job::JobListing;
use crate::models::user::UserProfileRow;

/// Lowest score the placeholder backend will emit.
pub const SCORE_FLOOR: i32 = 50;
/// Scores are bounded to 0–100 everywhere; the placeholder floor is 50.
pub const SCORE_CEILING: i32 = 100;

/// The match scorer seam. Carried in the engine as `Arc<dyn MatchScorer>`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, profile: &UserProfileRow, listing: &JobListing) -> i32;
}

/// Placeholder scorer: bounded pseudo-random value in [50, 100].
pub struct RandomBandScorer;

#[async_trait]
impl MatchScorer for RandomBandScorer {
    async fn score(&self, _profile: &UserProfileRow, _listing: &JobListing) -> i32 {
        rand::thread_rng().gen_range(SCORE_FLOOR..=SCORE_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_profile() -> UserProfileRow {
        UserProfileRow {
            id: Uuid::new_v4(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: Some("Fullstack Developer".to_string()),
            experience_years: 3,
            education: None,
            current_company: None,
            resume_path: None,
            resume_text: None,
            ats_score: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_listing() -> JobListing {
        JobListing {
            id: Uuid::new_v4(),
            external_id: "x-1".to_string(),
            title: "Backend Developer".to_string(),
            company: "Acme".to_string(),
            description: None,
            url: None,
            location: None,
            platform: "test".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_random_band_scorer_stays_in_bounds() {
        let scorer = RandomBandScorer;
        let profile = make_profile();
        let listing = make_listing();
        for _ in 0..200 {
            let score = scorer.score(&profile, &listing).await;
            assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&score), "score {score}");
        }
    }
}
