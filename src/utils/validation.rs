use crate::utils::error::{Result, SiteError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SiteError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SiteError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SiteError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SiteError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SiteError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 使用者輸入（地址、郵遞區號）只檢查是否為空白，格式交由上游服務判斷
pub fn validate_input(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteError::InvalidInput {
            field: field_name.to_string(),
            reason: "must not be blank".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoints.geocode_url", "https://example.com").is_ok());
        assert!(validate_url("endpoints.geocode_url", "http://127.0.0.1:8080/geo").is_ok());
        assert!(validate_url("endpoints.geocode_url", "").is_err());
        assert!(validate_url("endpoints.geocode_url", "invalid-url").is_err());
        assert!(validate_url("endpoints.geocode_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("http.timeout_seconds", 10u64, 1, 120).is_ok());
        assert!(validate_range("http.timeout_seconds", 0u64, 1, 120).is_err());
        assert!(validate_range("narrative.temperature", 2.5f64, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        let missing: Option<String> = None;

        assert_eq!(validate_required_field("key", &present).unwrap(), "key");
        assert!(matches!(
            validate_required_field("credentials.openai_api_key", &missing),
            Err(SiteError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_input_rejects_blank() {
        assert!(validate_input("address", "1600 Amphitheatre Pkwy").is_ok());
        assert!(matches!(
            validate_input("zip_code", "   "),
            Err(SiteError::InvalidInput { .. })
        ));
    }
}
