use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Valid application statuses, in lifecycle order.
pub const APPLICATION_STATUSES: [&str; 4] = ["applied", "interview", "offer", "rejected"];

pub fn is_valid_status(status: &str) -> bool {
    APPLICATION_STATUSES.contains(&status)
}

/// The shape returned by the paginated applications list. `job_title` /
/// `company_name` are a denormalized snapshot so the record survives the
/// source listing being deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationSummaryRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub status: String,
    pub match_score: i32,
    pub applied_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_are_valid() {
        for status in APPLICATION_STATUSES {
            assert!(is_valid_status(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(!is_valid_status("ghosted"));
        assert!(!is_valid_status("Applied"));
        assert!(!is_valid_status(""));
    }
}
