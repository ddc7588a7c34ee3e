//! Job Source Adapter — queries the external job provider, normalizes and
//! upserts results into the catalog, and synthesizes deterministic fallback
//! listings when the provider is unavailable.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MAX_RESULT_COUNT;
use crate::models::job::JobListing;

const SERP_API_URL: &str = "https://serpapi.com/search.json";
const SEARCH_ENGINE: &str = "google_jobs";

/// Platform tag on listings that came from the real provider.
pub const PROVIDER_PLATFORM: &str = "Google Jobs";
/// Platform tag on synthetic listings, so callers can detect degraded mode.
pub const FALLBACK_PLATFORM: &str = "fallback";

/// Provider-level failures. Absorbed inside `search` via the fallback path —
/// these never escalate to callers and are not retried automatically.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider credential absent or malformed")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),

    #[error("Provider returned an empty result set")]
    EmptyResults,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    jobs_results: Vec<ProviderJob>,
}

/// One raw result from the provider, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderJob {
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub job_url: Option<String>,
    pub location: Option<String>,
}

/// Client for the external job search provider.
#[derive(Clone)]
pub struct JobSourceClient {
    client: Client,
    api_key: Option<String>,
}

impl JobSourceClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Searches the provider and returns normalized, catalog-upserted listings
    /// in provider order. Any provider failure (unreachable, misconfigured,
    /// empty or malformed result set) switches to deterministic fallback
    /// listings sized to the requested count.
    pub async fn search(
        &self,
        pool: &PgPool,
        query: &str,
        location: &str,
        count: u32,
    ) -> Vec<JobListing> {
        let count = cap_count(count);

        match self.fetch(query, location, count).await {
            Ok(raw) => {
                let mut listings = Vec::with_capacity(raw.len());
                for job in raw.into_iter().take(count as usize) {
                    listings.push(normalize_and_upsert(pool, job).await);
                }
                listings
            }
            Err(e) => {
                warn!("Job provider unavailable, using fallback listings: {e}");
                fallback_listings(count)
            }
        }
    }

    async fn fetch(
        &self,
        query: &str,
        location: &str,
        count: u32,
    ) -> Result<Vec<ProviderJob>, ProviderError> {
        let api_key = self.usable_credential()?;
        let num = count.to_string();

        let response = self
            .client
            .get(SERP_API_URL)
            .query(&[
                ("engine", SEARCH_ENGINE),
                ("api_key", api_key),
                ("q", query),
                ("location", location),
                ("num", num.as_str()),
                ("sort_by", "date"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ProviderResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

        if parsed.jobs_results.is_empty() {
            return Err(ProviderError::EmptyResults);
        }

        debug!("Provider returned {} listings", parsed.jobs_results.len());
        Ok(parsed.jobs_results)
    }

    fn usable_credential(&self) -> Result<&str, ProviderError> {
        match self.api_key.as_deref() {
            Some(key) if credential_usable(key) => Ok(key),
            _ => Err(ProviderError::MissingCredential),
        }
    }
}

/// Clamps a requested result count to the provider hard cap.
pub fn cap_count(count: u32) -> u32 {
    count.min(MAX_RESULT_COUNT)
}

/// A credential is usable when present and not of a shape known to belong to
/// a different service (`gsk_` keys are classifier keys pasted in the wrong
/// variable — a recurring misconfiguration).
pub fn credential_usable(key: &str) -> bool {
    !key.is_empty() && !key.starts_with("gsk_")
}

/// Normalizes one provider result and upserts it into the catalog, keyed by
/// external id. An upsert failure is non-fatal: the listing survives in memory
/// under a locally synthesized id and the batch continues.
async fn normalize_and_upsert(pool: &PgPool, job: ProviderJob) -> JobListing {
    let now = Utc::now();
    let external_id = job
        .job_id
        .clone()
        .unwrap_or_else(|| format!("local-{}", Uuid::new_v4()));

    let mut listing = JobListing {
        id: Uuid::new_v4(),
        external_id,
        title: job.title.unwrap_or_else(|| "Untitled Job".to_string()),
        company: job
            .company_name
            .unwrap_or_else(|| "Various Companies".to_string()),
        description: job.description,
        url: job.job_url,
        location: job.location,
        platform: PROVIDER_PLATFORM.to_string(),
        created_at: now,
        updated_at: now,
    };

    let upserted: Result<Uuid, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO jobs (external_id, title, company, description, url, location, platform)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (external_id) DO UPDATE SET updated_at = now()
        RETURNING id
        "#,
    )
    .bind(&listing.external_id)
    .bind(&listing.title)
    .bind(&listing.company)
    .bind(&listing.description)
    .bind(&listing.url)
    .bind(&listing.location)
    .bind(&listing.platform)
    .fetch_one(pool)
    .await;

    match upserted {
        Ok(id) => listing.id = id,
        Err(e) => {
            warn!(
                "Catalog upsert failed for listing '{}', keeping in-memory id: {e}",
                listing.external_id
            );
        }
    }

    listing
}

/// Synthesizes a deterministic sequence of placeholder listings, used when the
/// provider is unreachable or misconfigured. Each is tagged with
/// `FALLBACK_PLATFORM` and dated one day apart so ordering stays stable.
pub fn fallback_listings(count: u32) -> Vec<JobListing> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let n = i + 1;
            JobListing {
                id: Uuid::new_v4(),
                external_id: format!("fallback-{n}"),
                title: format!("Developer Role {n} (Fullstack/Frontend/Backend)"),
                company: format!("Tech Company {n}"),
                description: Some(
                    "Sample job for software/fullstack/web/java developer with modern stack"
                        .to_string(),
                ),
                url: Some(format!("https://example.com/jobs/{n}")),
                location: None,
                platform: FALLBACK_PLATFORM.to_string(),
                created_at: now - chrono::Duration::days(i64::from(i)),
                updated_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_listings_sized_to_request() {
        let listings = fallback_listings(7);
        assert_eq!(listings.len(), 7);
    }

    #[test]
    fn test_fallback_listings_tagged_distinguishably() {
        for listing in fallback_listings(5) {
            assert_eq!(listing.platform, FALLBACK_PLATFORM);
        }
    }

    #[test]
    fn test_fallback_listings_deterministic_identity() {
        let a = fallback_listings(3);
        let b = fallback_listings(3);
        let keys_a: Vec<_> = a.iter().map(|l| l.external_id.clone()).collect();
        let keys_b: Vec<_> = b.iter().map(|l| l.external_id.clone()).collect();
        assert_eq!(keys_a, keys_b);
        assert_eq!(a[0].title, "Developer Role 1 (Fullstack/Frontend/Backend)");
    }

    #[test]
    fn test_cap_count_enforces_hard_cap() {
        assert_eq!(cap_count(150), MAX_RESULT_COUNT);
        assert_eq!(cap_count(100), 100);
        assert_eq!(cap_count(10), 10);
    }

    #[test]
    fn test_credential_usable_rejects_known_bad_shapes() {
        assert!(!credential_usable(""));
        assert!(!credential_usable("gsk_abc123"));
        assert!(credential_usable("serp-key-ok"));
    }

    #[test]
    fn test_provider_payload_deserializes() {
        let body = r#"{
            "jobs_results": [
                {
                    "job_id": "abc-123",
                    "title": "Backend Developer",
                    "company_name": "Acme",
                    "description": "Build services",
                    "job_url": "https://jobs.example.com/abc-123",
                    "location": "Pune, India"
                },
                {
                    "title": "Frontend Developer"
                }
            ]
        }"#;
        let parsed: ProviderResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.jobs_results.len(), 2);
        assert_eq!(parsed.jobs_results[0].job_id.as_deref(), Some("abc-123"));
        assert!(parsed.jobs_results[1].company_name.is_none());
    }

    #[test]
    fn test_missing_jobs_results_treated_as_empty() {
        let parsed: ProviderResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.jobs_results.is_empty());
    }
}
