use std::fmt;
use thiserror::Error;

/// 需要座標或郵遞區號的三個查詢服務
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupService {
    Places,
    Demographics,
    Traffic,
}

impl fmt::Display for LookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupService::Places => "Places",
            LookupService::Demographics => "Demographics",
            LookupService::Traffic => "Traffic",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Address could not be resolved: {message}")]
    GeoFailure {
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },

    #[error("{service} lookup failed: {message}")]
    LookupFailure {
        service: LookupService,
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },

    #[error("Narrative generation failed: {message}")]
    GenerationFailure {
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Geocoding,
    Lookup,
    Generation,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn geo(message: impl Into<String>) -> Self {
        SiteError::GeoFailure {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn lookup(service: LookupService, message: impl Into<String>) -> Self {
        SiteError::LookupFailure {
            service,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        SiteError::GenerationFailure {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// 附加上游 HTTP 狀態碼；非上游錯誤原樣返回
    pub fn with_status(mut self, code: u16) -> Self {
        match &mut self {
            SiteError::GeoFailure { status, .. }
            | SiteError::LookupFailure { status, .. }
            | SiteError::GenerationFailure { status, .. } => *status = Some(code),
            _ => {}
        }
        self
    }

    /// 附加原始回應內容作為診斷資訊
    pub fn with_details(mut self, body: impl Into<String>) -> Self {
        match &mut self {
            SiteError::GeoFailure { details, .. }
            | SiteError::LookupFailure { details, .. }
            | SiteError::GenerationFailure { details, .. } => *details = Some(body.into()),
            _ => {}
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::GeoFailure { .. } => ErrorCategory::Geocoding,
            SiteError::LookupFailure { .. } => ErrorCategory::Lookup,
            SiteError::GenerationFailure { .. } => ErrorCategory::Generation,
            SiteError::InvalidInput { .. } => ErrorCategory::Input,
            SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::IoError(_) | SiteError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Generation => ErrorSeverity::Medium,
            ErrorCategory::Geocoding | ErrorCategory::Lookup | ErrorCategory::Input => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 上游狀態碼與原始回應，供顯示層呈現
    pub fn diagnostic(&self) -> Option<String> {
        let (status, details) = match self {
            SiteError::GeoFailure {
                status, details, ..
            }
            | SiteError::LookupFailure {
                status, details, ..
            }
            | SiteError::GenerationFailure {
                status, details, ..
            } => (status, details),
            _ => return None,
        };

        match (status, details) {
            (None, None) => None,
            (Some(code), None) => Some(format!("HTTP {}", code)),
            (None, Some(body)) => Some(body.clone()),
            (Some(code), Some(body)) => Some(format!("HTTP {}: {}", code, body)),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::GeoFailure { .. } => {
                "The address could not be located. No assessment was produced.".to_string()
            }
            SiteError::LookupFailure { service, .. } => format!(
                "The {} data source failed, so no assessment was produced.",
                service.to_string().to_lowercase()
            ),
            SiteError::GenerationFailure { .. } => {
                "The site summary could not be generated. The numeric assessment is still valid."
                    .to_string()
            }
            SiteError::InvalidInput { field, reason } => {
                format!("Please check the {}: {}", field, reason)
            }
            SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            SiteError::IoError(_) | SiteError::SerializationError(_) => {
                format!("Internal error: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::GeoFailure { .. } => {
                "Check the spelling of the address and include city and state"
            }
            SiteError::LookupFailure {
                service: LookupService::Traffic,
                ..
            } => "Live traffic coverage varies by location; try again later or a nearby address",
            SiteError::LookupFailure {
                service: LookupService::Demographics,
                ..
            } => "Verify the ZIP code and the Census API key",
            SiteError::LookupFailure { .. } => "Verify the Google API key and its enabled APIs",
            SiteError::GenerationFailure { .. } => {
                "Verify the OpenAI API key and model name, then retry"
            }
            SiteError::InvalidInput { .. } => "Provide both a street address and a ZIP code",
            SiteError::MissingConfigError { .. } => {
                "Set the missing value in the config file or as an environment variable"
            }
            SiteError::ConfigValidationError { .. } | SiteError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            SiteError::IoError(_) => "Check file paths and permissions",
            SiteError::SerializationError(_) => "Report this issue with the command you ran",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_keeps_status_and_body() {
        let err = SiteError::lookup(LookupService::Traffic, "HERE API failed (503)")
            .with_status(503)
            .with_details("service unavailable");

        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.diagnostic().as_deref(),
            Some("HTTP 503: service unavailable")
        );
        assert_eq!(err.to_string(), "Traffic lookup failed: HERE API failed (503)");
    }

    #[test]
    fn test_generation_failure_is_less_severe_than_lookup() {
        let generation = SiteError::generation("empty response");
        let geo = SiteError::geo("ZERO_RESULTS");

        assert!(generation.severity() < geo.severity());
        assert_eq!(generation.category(), ErrorCategory::Generation);
        assert_eq!(geo.category(), ErrorCategory::Geocoding);
    }

    #[test]
    fn test_with_status_ignores_non_upstream_errors() {
        let err = SiteError::MissingConfigError {
            field: "credentials.here_api_key".to_string(),
        }
        .with_status(500);

        assert!(err.diagnostic().is_none());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_names_service() {
        let err = SiteError::lookup(LookupService::Demographics, "Census API failed");
        assert!(err.user_friendly_message().contains("demographics"));
        assert_eq!(
            err.recovery_suggestion(),
            "Verify the ZIP code and the Census API key"
        );
    }
}
