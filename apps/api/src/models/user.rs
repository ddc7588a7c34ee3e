use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user profile row. Parsed resume fields (`role`, `experience_years`,
/// `education`, `current_company`, `resume_text`, `ats_score`) are owned by the
/// ingestion pipeline; the rest mutate via profile updates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience_years: i32,
    pub education: Option<String>,
    pub current_company: Option<String>,
    pub resume_path: Option<String>,
    pub resume_text: Option<String>,
    pub ats_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
