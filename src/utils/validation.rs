use crate::utils::error::{CheckError, Result};
use chrono::{NaiveDate, NaiveTime};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Dates travel as `YYYYMMDD` with no separators, and must name a real
/// calendar day.
pub fn validate_date(value: &str) -> Result<()> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheckError::validation(format!(
            "Invalid date format '{}': expected YYYYMMDD",
            value
        )));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| {
        CheckError::validation(format!(
            "Invalid date format '{}': not a calendar date",
            value
        ))
    })?;
    Ok(())
}

/// Times travel as 24-hour `HHMM` with no separators.
pub fn validate_time(value: &str) -> Result<()> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheckError::validation(format!(
            "Invalid time format '{}': expected HHMM (24-hour)",
            value
        )));
    }
    NaiveTime::parse_from_str(value, "%H%M").map_err(|_| {
        CheckError::validation(format!(
            "Invalid time format '{}': not a time of day",
            value
        ))
    })?;
    Ok(())
}

pub fn validate_party_size(value: u32) -> Result<()> {
    if value == 0 {
        return Err(CheckError::validation("Party size must be at least 1"));
    }
    Ok(())
}

pub fn validate_worker_count(value: usize) -> Result<()> {
    if value == 0 {
        return Err(CheckError::config("Worker count must be at least 1"));
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CheckError::config(format!(
            "{}: URL cannot be empty",
            field_name
        )));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CheckError::config(format!(
                "{}: unsupported URL scheme '{}'",
                field_name, scheme
            ))),
        },
        Err(e) => Err(CheckError::config(format!(
            "{}: invalid URL '{}': {}",
            field_name, url_str, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("20260201").is_ok());
        assert!(validate_date("2026-02-01").is_err());
        assert!(validate_date("202602").is_err());
        assert!(validate_date("20261345").is_err());
    }

    #[test]
    fn test_validate_date_message_contract() {
        let err = validate_date("2026/02/01").unwrap_err();
        assert!(err.to_string().contains("Invalid date format"));
        let err = validate_date("20269999").unwrap_err();
        assert!(err.to_string().contains("Invalid date format"));
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("1900").is_ok());
        assert!(validate_time("0000").is_ok());
        assert!(validate_time("19:00").is_err());
        assert!(validate_time("2500").is_err());
        assert!(validate_time("730").is_err());
    }

    #[test]
    fn test_validate_time_message_contract() {
        let err = validate_time("19:00").unwrap_err();
        assert!(err.to_string().contains("Invalid time format"));
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(2).is_ok());
        assert!(validate_party_size(0).is_err());
    }

    #[test]
    fn test_validate_worker_count() {
        assert!(validate_worker_count(10).is_ok());
        assert!(validate_worker_count(0).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://example.com").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }
}
