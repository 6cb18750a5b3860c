use clap::Parser;
use site_analyzer::app::report;
use site_analyzer::utils::error::{ErrorSeverity, SiteError};
use site_analyzer::utils::{logger, validation::Validate};
use site_analyzer::{http_services, CliArgs, PipelineStage, SiteConfig, SitePipeline};

fn load_config(args: &CliArgs) -> site_analyzer::Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            let mut config = SiteConfig::from_file(path)?;
            config.fill_missing_from_env()?;
            config
        }
        None => SiteConfig::from_env()?,
    };

    args.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// 根據錯誤嚴重程度決定退出碼
fn exit_code(error: &SiteError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

/// 錯誤已在發生處記錄，這裡只輸出給使用者
fn report_failure(error: &SiteError) -> ! {
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("   {}", error);
    if let Some(diagnostic) = error.diagnostic() {
        eprintln!("🔎 {}", diagnostic);
    }
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());

    std::process::exit(exit_code(error));
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting site-analyzer v{}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        tracing::debug!("CLI arguments: {:?}", args);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            report_failure(&e)
        }
    };

    let services = match http_services(&config) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!("❌ Failed to set up HTTP services: {}", e);
            report_failure(&e)
        }
    };
    let pipeline = SitePipeline::from_config(services, &config);

    let site = match pipeline.assess(&args.address, &args.zip).await {
        Ok(site) => site,
        Err(e) => report_failure(&e),
    };

    match pipeline.narrate(site.clone()).await {
        Ok(assessment) => {
            tracing::info!("✅ Site analysis completed");
            let output = if args.json {
                report::assessment_json(&assessment)
            } else {
                Ok(report::render_assessment(&assessment))
            };
            match output {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    tracing::error!("❌ Failed to render assessment: {}", e);
                    report_failure(&e)
                }
            }
        }
        Err(e) => {
            // 評分結果仍然有效，先輸出再回報敘述失敗
            tracing::warn!(
                "⚠️ Narrative unavailable at stage '{}', printing numeric assessment only",
                PipelineStage::from_error(&e)
            );
            let output = if args.json {
                report::scored_json(&site)
            } else {
                Ok(report::render_scored(&site))
            };
            if let Ok(text) = output {
                print!("{}", text);
            }
            report_failure(&e)
        }
    }
}
