use crate::config::SiteConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "site-analyzer")]
#[command(about = "Commercial real-estate site evaluation from live location data")]
pub struct CliArgs {
    /// Street address of the site
    #[arg(long)]
    pub address: String,

    /// ZIP code used for demographics
    #[arg(long)]
    pub zip: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Search radius for nearby businesses, in meters
    #[arg(long)]
    pub radius: Option<u32>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Narrative model selector
    #[arg(long)]
    pub model: Option<String>,

    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log process resource usage per stage")]
    pub monitor: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut SiteConfig) {
        if let Some(radius) = self.radius {
            config.places.radius_meters = radius;
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = timeout;
        }
        if let Some(model) = &self.model {
            config.narrative.model = model.clone();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_arguments() {
        let args = CliArgs::parse_from([
            "site-analyzer",
            "--address",
            "1 Main St, Springfield",
            "--zip",
            "62701",
        ]);

        assert_eq!(args.address, "1 Main St, Springfield");
        assert_eq!(args.zip, "62701");
        assert!(args.config.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "site-analyzer",
            "--address",
            "1 Main St",
            "--zip",
            "62701",
            "--radius",
            "1000",
            "--timeout",
            "3",
            "--model",
            "gpt-4o-mini",
            "--monitor",
        ]);
        let mut config = SiteConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.places.radius_meters, 1000);
        assert_eq!(config.http.timeout_seconds, 3);
        assert_eq!(config.narrative.model, "gpt-4o-mini");
        assert!(config.monitoring.enabled);
    }

    #[test]
    fn test_missing_zip_is_rejected() {
        let result = CliArgs::try_parse_from(["site-analyzer", "--address", "1 Main St"]);
        assert!(result.is_err());
    }
}
