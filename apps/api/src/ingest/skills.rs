//! Skill set writes — every skill write in the system goes through the same
//! normalization: trim, lowercase, drop empties, dedup.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Normalizes a skill list for storage. Order of first occurrence is kept.
pub fn normalize_skills<I>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Upserts normalized skills for a user. Repeat writes of an existing skill
/// are no-ops under the `(user_id, skill)` primary key.
pub async fn upsert_skills(pool: &PgPool, user_id: Uuid, skills: &[String]) -> Result<()> {
    for skill in skills {
        sqlx::query(
            "INSERT INTO user_skills (user_id, skill) VALUES ($1, $2)
             ON CONFLICT (user_id, skill) DO NOTHING",
        )
        .bind(user_id)
        .bind(skill)
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_lowercases_and_dedups() {
        let input = vec![
            "React".to_string(),
            " Node ".to_string(),
            "react".to_string(),
        ];
        assert_eq!(normalize_skills(input), vec!["react", "node"]);
    }

    #[test]
    fn test_normalize_drops_empty_entries() {
        let input = vec!["  ".to_string(), "sql".to_string(), String::new()];
        assert_eq!(normalize_skills(input), vec!["sql"]);
    }

    #[test]
    fn test_normalize_preserves_first_occurrence_order() {
        let input = vec![
            "Docker".to_string(),
            "AWS".to_string(),
            "docker".to_string(),
            "Git".to_string(),
        ];
        assert_eq!(normalize_skills(input), vec!["docker", "aws", "git"]);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_skills(Vec::new()).is_empty());
    }
}
