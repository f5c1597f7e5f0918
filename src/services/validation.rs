use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$")
        .expect("Invalid email pattern regex")
});

static SCRIPT_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script[^>]*>.*?</script>").expect("Invalid script pattern regex"));

static HTML_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag pattern regex"));

static UNSAFE_CHAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>"'&]"#).expect("Invalid character pattern regex"));

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_AGE: i32 = 13;
pub const MAX_AGE: i32 = 120;
pub const MAX_TRIP_DAYS: i32 = 365;

/// Domain rules checked before profile data is accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusinessRule {
    /// Traveller must be between 13 and 120 years old
    Age(NaiveDate),
    /// Trip length in days, 1 through 365
    TripDuration(i32),
    /// Timestamp must lie in the future
    FutureDate(NaiveDateTime),
}

impl BusinessRule {
    pub fn name(&self) -> &'static str {
        match self {
            BusinessRule::Age(_) => "age",
            BusinessRule::TripDuration(_) => "trip_duration",
            BusinessRule::FutureDate(_) => "future_date",
        }
    }
}

pub fn validate_email_format(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() {
        tracing::warn!("Email validation failed: email is empty");
        return false;
    }

    let valid = EMAIL_PATTERN.is_match(email);
    tracing::debug!(valid, "Validated email format");
    valid
}

pub fn validate_password_strength(password: &str) -> bool {
    let valid = password.chars().count() >= MIN_PASSWORD_LENGTH;
    if !valid {
        tracing::warn!("Password validation failed: password is too short");
    }
    valid
}

/// True when `start` is strictly before `end`
pub fn validate_date_range(start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start < end
}

/// Both bounds must be non-negative and ordered
pub fn validate_budget_range(lower: i32, upper: i32) -> bool {
    if lower < 0 || upper < 0 {
        tracing::warn!(lower, upper, "Budget range validation failed: negative budget");
        return false;
    }
    lower <= upper
}

/// Strips script blocks, markup and HTML-significant characters
pub fn sanitize_input(input: &str) -> String {
    let without_scripts = SCRIPT_TAG_PATTERN.replace_all(input.trim(), "");
    let without_tags = HTML_TAG_PATTERN.replace_all(&without_scripts, "");
    let sanitized = UNSAFE_CHAR_PATTERN.replace_all(&without_tags, "").into_owned();

    tracing::debug!(
        original_len = input.len(),
        sanitized_len = sanitized.len(),
        "Sanitized input"
    );

    sanitized
}

pub fn validate_business_rule(rule: BusinessRule) -> bool {
    validate_business_rule_at(rule, Utc::now().naive_utc())
}

pub fn validate_business_rule_at(rule: BusinessRule, now: NaiveDateTime) -> bool {
    let valid = match rule {
        BusinessRule::Age(birth_date) => {
            let age = age_on(birth_date, now.date());
            (MIN_AGE..=MAX_AGE).contains(&age)
        }
        BusinessRule::TripDuration(days) => days > 0 && days <= MAX_TRIP_DAYS,
        BusinessRule::FutureDate(date) => date > now,
    };

    if !valid {
        tracing::warn!(rule = rule.name(), "Business rule validation failed");
    }

    valid
}

/// Whole years between `birth_date` and `today`
fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email_format("test@example.com"));
        assert!(validate_email_format("first.last+trip@mail.example.org"));
        assert!(!validate_email_format(""));
        assert!(!validate_email_format("   "));
        assert!(!validate_email_format("no-at-sign.com"));
        assert!(!validate_email_format("user@localhost"));
    }

    #[test]
    fn test_validate_password_length_only() {
        assert!(validate_password_strength("password"));
        assert!(!validate_password_strength("short"));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_date_range(at(2024, 1, 1), at(2024, 1, 2)));
        assert!(!validate_date_range(at(2024, 1, 2), at(2024, 1, 2)));

        assert!(validate_budget_range(1500, 2000));
        assert!(validate_budget_range(2000, 2000));
        assert!(!validate_budget_range(2000, 1500));
        assert!(!validate_budget_range(-1, 10));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(
            sanitize_input("  <script>alert('x')</script>Hello <b>world</b> & \"friends\" "),
            "Hello world  friends"
        );
        assert_eq!(sanitize_input("Plain text"), "Plain text");
    }

    #[test]
    fn test_business_rules() {
        let now = at(2024, 6, 15);

        assert!(validate_business_rule_at(
            BusinessRule::Age(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            now
        ));
        // Turns 13 tomorrow
        assert!(!validate_business_rule_at(
            BusinessRule::Age(NaiveDate::from_ymd_opt(2011, 6, 16).unwrap()),
            now
        ));
        assert!(validate_business_rule_at(
            BusinessRule::Age(NaiveDate::from_ymd_opt(2011, 6, 15).unwrap()),
            now
        ));

        assert!(validate_business_rule_at(BusinessRule::TripDuration(7), now));
        assert!(!validate_business_rule_at(BusinessRule::TripDuration(0), now));
        assert!(!validate_business_rule_at(BusinessRule::TripDuration(366), now));

        assert!(validate_business_rule_at(BusinessRule::FutureDate(at(2024, 6, 16)), now));
        assert!(!validate_business_rule_at(BusinessRule::FutureDate(at(2024, 6, 14)), now));
    }
}
