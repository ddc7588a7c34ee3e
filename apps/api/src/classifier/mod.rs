/// Resume Classifier — the single point of entry for all AI calls in JobPilot.
///
/// ARCHITECTURAL RULE: No other module may call the Groq API directly.
/// All classification requests MUST go through this module.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all classification calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama-3.1-8b-instant";
const TEMPERATURE: f32 = 0.1;
const MAX_RETRIES: u32 = 3;
/// Resume text is truncated to this many characters before classification.
pub const MAX_EXCERPT_CHARS: usize = 4000;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier API key not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Classifier returned empty content")]
    EmptyContent,
}

/// The structured profile extracted from resume text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub role: Option<String>,
    #[serde(default)]
    pub experience_years: i32,
    pub education: Option<String>,
    pub current_company: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single classifier client used by the ingestion pipeline.
/// Wraps the Groq chat completions API with retry logic and a structured
/// output helper.
#[derive(Clone)]
pub struct ClassifierClient {
    client: Client,
    api_key: Option<String>,
}

impl ClassifierClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Classifies resume text into a structured profile.
    /// The text is truncated to `MAX_EXCERPT_CHARS` before the call.
    pub async fn classify_resume(&self, text: &str) -> Result<ResumeProfile, ClassifierError> {
        let excerpt = truncate_excerpt(text, MAX_EXCERPT_CHARS);
        let prompt = prompts::RESUME_PARSE_PROMPT.replace("{resume_text}", &excerpt);
        self.call_json::<ResumeProfile>(&prompt, prompts::RESUME_PARSE_SYSTEM)
            .await
    }

    /// Makes a raw chat completion call, returning the assistant text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn call(&self, prompt: &str, system: &str) -> Result<String, ClassifierError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClassifierError::MissingCredential)?;

        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<ClassifierError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Classifier call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(GROQ_API_URL)
                .bearer_auth(api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ClassifierError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Classifier API returned {}: {}", status, body);
                last_error = Some(ClassifierError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ClassifierError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat: ChatResponse = response.json().await?;
            let content = chat
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|c| !c.trim().is_empty())
                .ok_or(ClassifierError::EmptyContent)?;

            debug!("Classifier call succeeded ({} chars)", content.len());
            return Ok(content);
        }

        Err(last_error.unwrap_or(ClassifierError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the classifier and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, ClassifierError> {
        let text = self.call(prompt, system).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(ClassifierError::Parse)
    }
}

/// Truncates text to at most `max_chars` characters, respecting char boundaries.
fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"role\": \"Fullstack Developer\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"role\": \"Fullstack Developer\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"role\": \"Backend Developer\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"role\": \"Backend Developer\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"role\": \"Web Developer\"}";
        assert_eq!(strip_json_fences(input), "{\"role\": \"Web Developer\"}");
    }

    #[test]
    fn test_truncate_excerpt_short_text_unchanged() {
        assert_eq!(truncate_excerpt("short resume", 4000), "short resume");
    }

    #[test]
    fn test_truncate_excerpt_bounds_long_text() {
        let long = "x".repeat(10_000);
        assert_eq!(truncate_excerpt(&long, MAX_EXCERPT_CHARS).chars().count(), 4000);
    }

    #[test]
    fn test_truncate_excerpt_multibyte_safe() {
        let text = "é".repeat(100);
        let out = truncate_excerpt(&text, 10);
        assert_eq!(out.chars().count(), 10);
    }

    // The credential check runs before any request is built, so this needs
    // no network. The ingestion pipeline relies on this error to degrade to
    // an unclassified profile instead of failing the upload.
    #[tokio::test]
    async fn test_classify_without_credential_fails_before_any_call() {
        let client = ClassifierClient::new(None);
        let err = client
            .classify_resume("John Doe, Fullstack Developer, 5 years")
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::MissingCredential));
    }

    #[test]
    fn test_resume_profile_defaults_for_missing_fields() {
        let profile: ResumeProfile = serde_json::from_str(r#"{"role": "Java Developer"}"#).unwrap();
        assert_eq!(profile.role.as_deref(), Some("Java Developer"));
        assert_eq!(profile.experience_years, 0);
        assert!(profile.skills.is_empty());
        assert!(profile.education.is_none());
    }

    #[test]
    fn test_resume_profile_full_deserializes() {
        let json = r#"{
            "role": "Fullstack Developer",
            "experience_years": 6,
            "education": "B.Tech Computer Science",
            "current_company": "Tech Corp",
            "skills": ["React", "Node.js", "SQL"]
        }"#;
        let profile: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.experience_years, 6);
        assert_eq!(profile.skills.len(), 3);
        assert_eq!(profile.current_company.as_deref(), Some("Tech Corp"));
    }
}
