use anyhow::Context;
use clap::Parser;
use site_analyzer::adapters::{here::HereTraffic, http::build_client};
use site_analyzer::domain::{model::Coordinate, ports::TrafficLookup};
use site_analyzer::utils::{logger, validation::validate_range};
use site_analyzer::SiteConfig;

/// 直接查詢單一座標的 HERE 即時交通，用於檢查金鑰與涵蓋範圍
#[derive(Debug, Parser)]
#[command(name = "traffic_probe")]
struct ProbeArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProbeArgs::parse();
    logger::init_cli_logger(args.verbose);

    validate_range("lat", args.lat, -90.0, 90.0)?;
    validate_range("lon", args.lon, -180.0, 180.0)?;

    let mut config = match &args.config {
        Some(path) => SiteConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => SiteConfig::default(),
    };
    config.fill_missing_from_env()?;

    let traffic = HereTraffic::new(
        build_client(config.request_timeout())?,
        config.endpoints.traffic_url.clone(),
        config.here_api_key()?.clone(),
    );

    println!("🚦 Probing live traffic at {},{}", args.lat, args.lon);
    let flow = traffic
        .flow_at(Coordinate::new(args.lat, args.lon))
        .await
        .context("traffic lookup failed")?;

    println!("{}", serde_json::to_string_pretty(&flow)?);
    println!("{}", flow.summary());
    Ok(())
}
