const BASE_MAX_LEN: usize = 20;
const FALLBACK_BASE: &str = "user";

/// Base du username : partie locale de l'email, limitée à [A-Za-z0-9_]
pub fn base_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let base: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(BASE_MAX_LEN)
        .collect();

    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    }
}

/// Ajoute un suffixe dérivé de l'heure (millisecondes) pour l'unicité
pub fn with_suffix(base: &str, millis: i64) -> String {
    format!("{}_{:06}", base, millis.rem_euclid(1_000_000))
}

/// Règle des usernames choisis par l'utilisateur (PUT /api/user/profile)
pub fn is_valid(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_email() {
        assert_eq!(base_from_email("jane.doe+beta@example.com"), "janedoebeta");
        assert_eq!(base_from_email("barista_42@example.com"), "barista_42");
    }

    #[test]
    fn test_base_is_capped() {
        let base = base_from_email("averyveryverylongemailaddresslocalpart@example.com");
        assert_eq!(base.len(), 20);
    }

    #[test]
    fn test_base_fallback() {
        assert_eq!(base_from_email("...@example.com"), "user");
        assert_eq!(base_from_email("émile@example.com"), "mile");
    }

    #[test]
    fn test_suffix() {
        assert_eq!(with_suffix("jane", 1_700_000_123_456), "jane_123456");
        assert_eq!(with_suffix("jane", 42), "jane_000042");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("coffee_lover"));
        assert!(!is_valid("ab"));
        assert!(!is_valid("has space"));
        assert!(!is_valid(&"x".repeat(31)));
    }
}
