//! Helper functions and utilities

use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format an amount in cents as dollars, e.g. `1050` -> `$10.50`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

/// Validate email format (basic validation)
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Normalize free-form text input: trims and collapses runs of whitespace
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1000), "$10.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(-250), "-$2.50");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("events@masjid.org"));
        assert!(!is_valid_email("events.masjid.org"));
        assert!(!is_valid_email("@masjid.org"));
        assert!(!is_valid_email("events@masjid"));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Community   Iftar \n"), "Community Iftar");
    }

    #[test]
    fn test_generate_uuid() {
        assert_ne!(generate_uuid(), generate_uuid());
    }
}
