//! Suitability scoring — a deterministic keyword-match score over extracted
//! resume text, independent of the AI-classified profile.

/// Fixed technology keyword set the score is computed against.
pub const SUITABILITY_KEYWORDS: [&str; 16] = [
    "react", "node", "javascript", "sql", "aws", "java", "spring", "html", "css", "mongodb",
    "python", "git", "docker", "fullstack", "frontend", "backend",
];

const POINTS_PER_KEYWORD: i32 = 10;
const MAX_SCORE: i32 = 100;

/// Scores resume text 0–100: 10 points per matched keyword, capped at 100.
/// Matching is case-insensitive substring containment.
pub fn suitability_score(text: &str) -> i32 {
    let lower = text.to_lowercase();
    let matches = SUITABILITY_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(**kw))
        .count() as i32;
    (matches * POINTS_PER_KEYWORD).min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(suitability_score(""), 0);
        assert_eq!(suitability_score("unrelated hobbies and interests"), 0);
    }

    #[test]
    fn test_ten_points_per_keyword() {
        assert_eq!(suitability_score("React and Node experience"), 20);
        assert_eq!(suitability_score("java spring sql"), 30);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(suitability_score("PYTHON"), suitability_score("python"));
    }

    #[test]
    fn test_score_capped_at_100() {
        let everything = SUITABILITY_KEYWORDS.join(" ");
        assert_eq!(suitability_score(&everything), 100);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert_eq!(suitability_score("docker docker docker"), 10);
    }
}
