/// System prompt for resume classification. Forces bare-JSON output.
pub const RESUME_PARSE_SYSTEM: &str = "You are a resume parser for a job application service. \
You always respond with a single valid JSON object and nothing else — no prose, no markdown.";

/// Prompt template for extracting a structured profile from resume text.
/// `{resume_text}` is replaced with a truncated excerpt of the extracted text.
pub const RESUME_PARSE_PROMPT: &str = r#"Parse this resume for job applications. Extract the following JSON:
{
  "role": "Detected role (e.g., Fullstack Developer; prioritize fullstack/frontend/backend/web/java/software)",
  "experience_years": <number, total relevant development experience>,
  "education": "Highest degree (e.g., B.Tech Computer Science)",
  "current_company": "Current employer",
  "skills": ["Top 10 skills, e.g., React, Node.js, Java, SQL, AWS"]
}

Resume text:
{resume_text}"#;
