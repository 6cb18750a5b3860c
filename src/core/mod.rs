pub mod narrative;
pub mod pipeline;
pub mod scoring;

pub use crate::domain::model::{ScoredSite, SiteAssessment};
pub use crate::utils::error::Result;
pub use pipeline::{PipelineStage, SiteServices, SitePipeline};
