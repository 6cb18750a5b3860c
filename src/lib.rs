pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::http_services;
pub use crate::config::SiteConfig;
pub use crate::core::{PipelineStage, SitePipeline, SiteServices};
pub use crate::domain::model::{ScoredSite, SiteAssessment};
pub use crate::utils::error::{Result, SiteError};
