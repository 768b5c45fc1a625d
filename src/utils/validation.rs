use crate::utils::error::{Result, WayfareError};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Normalizes a country code to its canonical uppercase form.
///
/// Codes arrive validated at the transport layer, but the core re-checks
/// defensively: exactly 3 ASCII alphabetic characters.
pub fn normalize_country_code(code: &str) -> Result<String> {
    let re = regex::Regex::new(r"^[A-Za-z]{3}$").expect("static pattern");
    if !re.is_match(code) {
        return Err(WayfareError::Validation {
            field: "countryCode".to_string(),
            reason: format!(
                "Country code must be exactly 3 letters, got {:?}",
                code
            ),
        });
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_date_order(start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    if end_date <= start_date {
        return Err(WayfareError::Validation {
            field: "endDate".to_string(),
            reason: format!(
                "End date {} must be after start date {}",
                end_date, start_date
            ),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WayfareError::Validation {
            field: field_name.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(WayfareError::Validation {
            field: field_name.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(WayfareError::Validation {
                field: field_name.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(WayfareError::Validation {
            field: field_name.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(WayfareError::Validation {
            field: field_name.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_country_code() {
        assert_eq!(normalize_country_code("col").unwrap(), "COL");
        assert_eq!(normalize_country_code("FRA").unwrap(), "FRA");
        assert_eq!(normalize_country_code("fRa").unwrap(), "FRA");
        assert!(normalize_country_code("").is_err());
        assert!(normalize_country_code("FR").is_err());
        assert!(normalize_country_code("FRAN").is_err());
        assert!(normalize_country_code("F1A").is_err());
        assert!(normalize_country_code("FR ").is_err());
    }

    #[test]
    fn test_validate_date_order() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(validate_date_order(start, end).is_ok());
        assert!(validate_date_order(end, start).is_err());
        assert!(validate_date_order(start, start).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("title", "Paris trip").is_ok());
        assert!(validate_non_empty_string("title", "").is_err());
        assert!(validate_non_empty_string("title", "   ").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api_base_url", "https://restcountries.com/v3.1").is_ok());
        assert!(validate_url("api_base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("api_base_url", "").is_err());
        assert!(validate_url("api_base_url", "not-a-url").is_err());
        assert!(validate_url("api_base_url", "ftp://example.com").is_err());
    }
}
