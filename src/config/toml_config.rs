use crate::config::SiteConfig;
use crate::utils::error::{Result, SiteError};
use regex::Regex;
use std::path::Path;

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${HERE_API_KEY})；未設定的變數保留原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigValidationError {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[credentials]
google_api_key = "g-key"
census_api_key = "c-key"
here_api_key = "h-key"
openai_api_key = "o-key"

[endpoints]
traffic_url = "http://localhost:9000/v7/flow"

[http]
timeout_seconds = 5

[places]
radius_meters = 800

[narrative]
model = "gpt-4o-mini"
temperature = 0.2

[monitoring]
enabled = true
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.google_api_key().unwrap().expose(), "g-key");
        assert_eq!(config.census_api_key().unwrap().expose(), "c-key");
        assert_eq!(config.endpoints.traffic_url, "http://localhost:9000/v7/flow");
        // 未指定的端點沿用預設值
        assert!(config.endpoints.geocode_url.starts_with("https://maps.googleapis.com"));
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.places.radius_meters, 800);
        assert_eq!(config.narrative.model, "gpt-4o-mini");
        assert!(config.monitoring.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SITE_ANALYZER_TEST_HERE_KEY", "here-from-env");

        let toml_content = r#"
[credentials]
here_api_key = "${SITE_ANALYZER_TEST_HERE_KEY}"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.here_api_key().unwrap().expose(), "here-from-env");

        std::env::remove_var("SITE_ANALYZER_TEST_HERE_KEY");
    }

    #[test]
    fn test_unset_variable_is_left_in_place() {
        let toml_content = r#"
[credentials]
openai_api_key = "${SITE_ANALYZER_TEST_UNSET_VARIABLE}"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.openai_api_key().unwrap().expose(),
            "${SITE_ANALYZER_TEST_UNSET_VARIABLE}"
        );
    }

    #[test]
    fn test_invalid_toml_reports_config_error() {
        let result = SiteConfig::from_toml_str("[http\ntimeout_seconds = ");
        assert!(matches!(
            result,
            Err(SiteError::ConfigValidationError { ref field, .. }) if field == "toml_parsing"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[places]
radius_meters = 1200
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.places.radius_meters, 1200);
        assert_eq!(config.http.timeout_seconds, 10);
    }
}
