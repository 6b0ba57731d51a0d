//! Field validators shared by every record constructor.
//!
//! All functions are pure: the current date is always passed in by the caller.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;

use super::error::DomainError;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";
pub const ADULT_AGE: u32 = 18;
pub const NATIONAL_ID_DIGITS: usize = 11;

fn name_pattern() -> &'static Regex {
    const RE: &str = r"^[\p{L}\s'\-]+$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(RE).expect("name pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    const RE: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(RE).expect("email pattern compiles"))
}

fn date_pattern() -> &'static Regex {
    const RE: &str = r"^(\d{2})/(\d{2})/(\d{4})$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(RE).expect("date pattern compiles"))
}

/// Validate a person's full name, returning the trimmed value.
pub fn validate_name(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName("name cannot be empty"));
    }

    if !name_pattern().is_match(trimmed) {
        return Err(DomainError::InvalidName(
            "only letters, spaces, hyphens and apostrophes are allowed",
        ));
    }

    if trimmed.split_whitespace().count() < 2 {
        return Err(DomainError::InvalidName(
            "given name and surname are required",
        ));
    }

    if !trimmed
        .split_whitespace()
        .all(|token| token.chars().any(char::is_alphabetic))
    {
        return Err(DomainError::InvalidName("every name part needs a letter"));
    }

    Ok(trimmed.to_string())
}

/// Parse a strict `DD/MM/YYYY` date without any "not in the future" rule.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let captures = date_pattern()
        .captures(raw.trim())
        .ok_or(DomainError::InvalidDate("expected DD/MM/YYYY"))?;

    let day: u32 = captures[1].parse().map_err(|_| DomainError::InvalidDate("day"))?;
    let month: u32 = captures[2]
        .parse()
        .map_err(|_| DomainError::InvalidDate("month"))?;
    let year: i32 = captures[3]
        .parse()
        .map_err(|_| DomainError::InvalidDate("year"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DomainError::InvalidDate("not a real calendar date"))
}

/// Validate a birth date: strict format, real calendar day, not after `today`.
pub fn validate_birth_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    let date = parse_date(raw)?;
    if date > today {
        return Err(DomainError::InvalidDate("birth date cannot be in the future"));
    }
    Ok(date)
}

pub fn validate_email(raw: &str) -> Result<String, DomainError> {
    let normalized = raw.trim().to_lowercase();
    if !email_pattern().is_match(&normalized) {
        return Err(DomainError::InvalidEmail);
    }
    Ok(normalized)
}

pub fn validate_phone(raw: &str, max_digits: u8) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_ascii_digit())
        && trimmed.len() <= usize::from(max_digits);

    if well_formed {
        Ok(trimmed.to_string())
    } else {
        Err(DomainError::InvalidPhone { max_digits })
    }
}

/// National id numbers are exactly eleven digits, no punctuation.
pub fn validate_id_number(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.len() == NATIONAL_ID_DIGITS && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err(DomainError::InvalidId)
    }
}

pub fn validate_time_of_day(raw: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::InvalidTime(raw.trim().to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Completed years between `birth` and `as_of`.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> u32 {
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Blank optional text collapses to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    #[test]
    fn name_is_trimmed_and_accepts_accents() {
        assert_eq!(
            validate_name("  João D'Ávila-Souza ").expect("valid name"),
            "João D'Ávila-Souza"
        );
    }

    #[test]
    fn name_rejects_digits_single_tokens_and_blanks() {
        assert!(matches!(validate_name("   "), Err(DomainError::InvalidName(_))));
        assert!(matches!(validate_name("Maria"), Err(DomainError::InvalidName(_))));
        assert!(matches!(
            validate_name("Maria 2 Silva"),
            Err(DomainError::InvalidName(_))
        ));
        assert!(matches!(
            validate_name("Maria_Silva Souza"),
            Err(DomainError::InvalidName(_))
        ));
        assert!(matches!(validate_name("- '"), Err(DomainError::InvalidName(_))));
        assert!(matches!(validate_name("-- --"), Err(DomainError::InvalidName(_))));
        assert!(matches!(
            validate_name("Maria -"),
            Err(DomainError::InvalidName(_))
        ));
        assert_eq!(validate_name("Ana D'Ávila-Souza"), Ok("Ana D'Ávila-Souza".to_string()));
    }

    #[test]
    fn birth_date_requires_strict_format() {
        assert!(validate_birth_date("1/1/1980", today()).is_err());
        assert!(validate_birth_date("1980-01-01", today()).is_err());
        assert!(validate_birth_date("01/01/80", today()).is_err());
        assert_eq!(
            validate_birth_date("01/01/1980", today()).expect("valid"),
            NaiveDate::from_ymd_opt(1980, 1, 1).expect("valid date")
        );
    }

    #[test]
    fn birth_date_rejects_impossible_and_future_dates() {
        assert!(matches!(
            validate_birth_date("31/04/2010", today()),
            Err(DomainError::InvalidDate(_))
        ));
        assert!(matches!(
            validate_birth_date("29/02/2023", today()),
            Err(DomainError::InvalidDate(_))
        ));
        assert!(matches!(
            validate_birth_date("16/06/2025", today()),
            Err(DomainError::InvalidDate(_))
        ));
        assert!(validate_birth_date("15/06/2025", today()).is_ok());
    }

    #[test]
    fn email_is_normalized_and_shape_checked() {
        assert_eq!(
            validate_email("  Maria@Example.COM ").expect("valid"),
            "maria@example.com"
        );
        assert_eq!(validate_email("maria@example"), Err(DomainError::InvalidEmail));
        assert_eq!(validate_email("maria.example.com"), Err(DomainError::InvalidEmail));
        assert_eq!(validate_email(""), Err(DomainError::InvalidEmail));
    }

    #[test]
    fn phone_enforces_digits_and_length() {
        assert_eq!(validate_phone(" 999922222 ", 9).expect("valid"), "999922222");
        assert!(validate_phone("9999-2222", 9).is_err());
        assert!(validate_phone("1234567890", 9).is_err());
        assert!(validate_phone("", 9).is_err());
    }

    #[test]
    fn id_number_requires_eleven_digits() {
        assert_eq!(validate_id_number("11122233344").expect("valid"), "11122233344");
        assert_eq!(validate_id_number("111.222.333-44"), Err(DomainError::InvalidId));
        assert_eq!(validate_id_number("1112223334"), Err(DomainError::InvalidId));
    }

    #[test]
    fn age_accounts_for_anniversary() {
        let birth = NaiveDate::from_ymd_opt(2007, 6, 16).expect("valid date");
        assert_eq!(age_on(birth, today()), 17);
        let birth = NaiveDate::from_ymd_opt(2007, 6, 15).expect("valid date");
        assert_eq!(age_on(birth, today()), 18);
    }

    #[test]
    fn time_of_day_parses_hours_and_minutes() {
        assert_eq!(
            validate_time_of_day("07:30").expect("valid"),
            NaiveTime::from_hms_opt(7, 30, 0).expect("valid time")
        );
        assert!(matches!(
            validate_time_of_day("25:00"),
            Err(DomainError::InvalidTime(_))
        ));
    }
}
