//! Search query construction — maps role tags and user profiles to the
//! provider's free-text query language.

/// Fixed set of adjacent developer-role synonyms merged into every
/// profile-driven query so one narrow role tag never starves the search.
pub const DEV_ROLE_SYNONYMS: &str =
    "fullstack OR frontend OR backend OR web developer OR java developer OR software developer";

const DEFAULT_QUERY: &str = "software developer jobs any company";

/// Maps a role tag to a canonical OR-expression of role synonyms.
/// Unrecognized tags fall back to the raw free-text query (or the default).
pub fn role_query(role: &str, free_text: Option<&str>) -> String {
    let canonical = match role {
        "frontend" => "frontend developer OR react developer OR html css javascript jobs any company",
        "backend" => "backend developer OR node.js developer OR python java backend jobs any company",
        "fullstack" => "fullstack developer OR mean mern stack fullstack jobs any company",
        "java" => "java developer OR spring boot hibernate java jobs any company",
        "mern" => "mern stack developer OR react node.js mongodb express mern jobs any company",
        "web" => "web developer OR php laravel html css js web jobs any company",
        "software" => "software developer OR software engineer c# .net python jobs any company",
        _ => return free_text.unwrap_or(DEFAULT_QUERY).to_string(),
    };
    canonical.to_string()
}

/// Builds the full provider query for the catalog search path:
/// role expression + location + recency qualifiers.
pub fn build_search_query(role: &str, free_text: Option<&str>, location: &str) -> String {
    format!(
        "{} {location} remote OR onsite recent",
        role_query(role, free_text)
    )
}

/// Builds the composite query the Apply Engine uses: the user's role, the
/// fixed dev-role synonyms, their skills, and a seniority qualifier derived
/// from experience.
pub fn build_profile_query(
    role: Option<&str>,
    skills: &[String],
    experience_years: i32,
    location: &str,
    role_filter: &str,
) -> String {
    let role = role.unwrap_or("software developer");
    let seniority = if experience_years > 5 { "senior" } else { "mid level" };

    let mut query = format!(
        "{role} OR {DEV_ROLE_SYNONYMS} any company {} {seniority} {location} remote OR onsite recent",
        skills.join(" ")
    );
    if role_filter != "all" {
        query.push(' ');
        query.push_str(role_filter);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_role_maps_to_synonym_expression() {
        let q = role_query("frontend", None);
        assert!(q.contains("react developer"));
        assert!(q.contains("frontend developer"));
    }

    #[test]
    fn test_unknown_role_falls_back_to_free_text() {
        let q = role_query("astronaut", Some("rust engineer jobs"));
        assert_eq!(q, "rust engineer jobs");
    }

    #[test]
    fn test_unknown_role_without_free_text_uses_default() {
        let q = role_query("all", None);
        assert_eq!(q, "software developer jobs any company");
    }

    #[test]
    fn test_search_query_appends_location_and_recency() {
        let q = build_search_query("java", None, "Pune");
        assert!(q.contains("java developer"));
        assert!(q.ends_with("Pune remote OR onsite recent"));
    }

    #[test]
    fn test_profile_query_senior_qualifier_above_five_years() {
        let q = build_profile_query(Some("Backend Developer"), &[], 6, "India", "all");
        assert!(q.contains("senior"));
        assert!(!q.contains("mid level"));
    }

    #[test]
    fn test_profile_query_mid_level_at_five_years_or_less() {
        let q = build_profile_query(Some("Backend Developer"), &[], 5, "India", "all");
        assert!(q.contains("mid level"));
    }

    #[test]
    fn test_profile_query_includes_skills_and_synonyms() {
        let skills = vec!["react".to_string(), "sql".to_string()];
        let q = build_profile_query(Some("Fullstack Developer"), &skills, 3, "India", "all");
        assert!(q.contains("react sql"));
        assert!(q.contains(DEV_ROLE_SYNONYMS));
    }

    #[test]
    fn test_profile_query_defaults_role_when_missing() {
        let q = build_profile_query(None, &[], 0, "India", "all");
        assert!(q.starts_with("software developer OR"));
    }

    #[test]
    fn test_profile_query_appends_role_filter() {
        let q = build_profile_query(None, &[], 0, "India", "mern");
        assert!(q.ends_with(" mern"));
    }
}
