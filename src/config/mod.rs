#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const CENSUS_API_KEY_VAR: &str = "CENSUS_API_KEY";
pub const HERE_API_KEY_VAR: &str = "HERE_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const TIMEOUT_VAR: &str = "SITE_ANALYZER_TIMEOUT_SECONDS";

/// API 金鑰；`Debug` 輸出不會洩漏內容
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn from_env(var: &str) -> Option<Self> {
        env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub google_api_key: Option<ApiKey>,
    pub census_api_key: Option<ApiKey>,
    pub here_api_key: Option<ApiKey>,
    pub openai_api_key: Option<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub geocode_url: String,
    pub places_url: String,
    pub census_url: String,
    pub traffic_url: String,
    pub openai_base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            places_url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json".to_string(),
            census_url: "https://api.census.gov/data/2020/acs/acs5/profile".to_string(),
            traffic_url: "https://data.traffic.hereapi.com/v7/flow".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub radius_meters: u32,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self { radius_meters: 500 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    pub model: String,
    pub temperature: f64,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub credentials: Credentials,
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub places: PlacesConfig,
    pub narrative: NarrativeSettings,
    pub monitoring: MonitoringConfig,
}

impl SiteConfig {
    /// 只從環境變數讀取金鑰，其餘使用預設值
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.fill_missing_from_env()?;
        Ok(config)
    }

    /// 設定檔未提供的金鑰由環境變數補上
    pub fn fill_missing_from_env(&mut self) -> Result<()> {
        let creds = &mut self.credentials;
        if creds.google_api_key.is_none() {
            creds.google_api_key = ApiKey::from_env(GOOGLE_API_KEY_VAR);
        }
        if creds.census_api_key.is_none() {
            creds.census_api_key = ApiKey::from_env(CENSUS_API_KEY_VAR);
        }
        if creds.here_api_key.is_none() {
            creds.here_api_key = ApiKey::from_env(HERE_API_KEY_VAR);
        }
        if creds.openai_api_key.is_none() {
            creds.openai_api_key = ApiKey::from_env(OPENAI_API_KEY_VAR);
        }

        if let Ok(raw) = env::var(TIMEOUT_VAR) {
            self.http.timeout_seconds =
                raw.trim()
                    .parse()
                    .map_err(|_| SiteError::InvalidConfigValueError {
                        field: TIMEOUT_VAR.to_string(),
                        value: raw.clone(),
                        reason: "Expected a whole number of seconds".to_string(),
                    })?;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn google_api_key(&self) -> Result<&ApiKey> {
        validate_required_field("credentials.google_api_key", &self.credentials.google_api_key)
    }

    pub fn here_api_key(&self) -> Result<&ApiKey> {
        validate_required_field("credentials.here_api_key", &self.credentials.here_api_key)
    }

    pub fn openai_api_key(&self) -> Result<&ApiKey> {
        validate_required_field("credentials.openai_api_key", &self.credentials.openai_api_key)
    }

    /// Census API 允許無金鑰的低流量查詢
    pub fn census_api_key(&self) -> Option<&ApiKey> {
        self.credentials.census_api_key.as_ref()
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.google_api_key()?;
        self.here_api_key()?;
        self.openai_api_key()?;

        validate_url("endpoints.geocode_url", &self.endpoints.geocode_url)?;
        validate_url("endpoints.places_url", &self.endpoints.places_url)?;
        validate_url("endpoints.census_url", &self.endpoints.census_url)?;
        validate_url("endpoints.traffic_url", &self.endpoints.traffic_url)?;
        validate_url("endpoints.openai_base_url", &self.endpoints.openai_base_url)?;

        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 120)?;
        // Google Nearby Search 上限為 50km
        validate_range("places.radius_meters", self.places.radius_meters, 1, 50_000)?;

        validate_non_empty_string("narrative.model", &self.narrative.model)?;
        validate_range("narrative.temperature", self.narrative.temperature, 0.0, 2.0)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.credentials = Credentials {
            google_api_key: Some(ApiKey::new("google")),
            census_api_key: None,
            here_api_key: Some(ApiKey::new("here")),
            openai_api_key: Some(ApiKey::new("openai")),
        };
        config
    }

    #[test]
    fn test_defaults_match_production_endpoints() {
        let config = SiteConfig::default();

        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.places.radius_meters, 500);
        assert_eq!(config.narrative.model, "gpt-3.5-turbo");
        assert!((config.narrative.temperature - 0.7).abs() < f64::EPSILON);
        assert!(config.endpoints.traffic_url.ends_with("/v7/flow"));
    }

    #[test]
    fn test_validation_requires_mandatory_keys() {
        let mut config = configured();
        assert!(config.validate().is_ok());

        config.credentials.here_api_key = None;
        assert!(matches!(
            config.validate(),
            Err(SiteError::MissingConfigError { ref field }) if field == "credentials.here_api_key"
        ));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let mut config = configured();
        config.places.radius_meters = 60_000;
        assert!(config.validate().is_err());

        let mut config = configured();
        config.endpoints.census_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
        assert_eq!(key.expose(), "super-secret");
    }
}
