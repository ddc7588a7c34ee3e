use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A normalized job listing. Rows in the `jobs` catalog carry the same shape;
/// search results that could not be upserted exist only in memory under a
/// locally synthesized id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobListing {
    pub id: Uuid,
    /// Provider-supplied key when available, else a `local-` surrogate.
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    /// Source platform tag. Fallback listings carry a distinguishable tag so
    /// callers can detect degraded mode.
    pub platform: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
