use crate::config::{NarrativeSettings, SiteConfig};
use crate::core::narrative::NarrativeContextBuilder;
use crate::core::scoring;
use crate::domain::model::{ScoredSite, SiteAssessment};
use crate::domain::ports::{
    DemographicsLookup, GeoResolver, NarrativeGenerator, PlacesLookup, TrafficLookup,
};
use crate::utils::error::{LookupService, Result, SiteError};
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_input;
use std::fmt;

/// 單次分析流程的階段；`Errored` 為終止狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Geocoding,
    FetchingPlaces,
    FetchingDemographics,
    FetchingTraffic,
    Scoring,
    Generating,
    Done,
    Errored,
}

impl PipelineStage {
    /// 錯誤發生時所在的階段
    pub fn from_error(error: &SiteError) -> PipelineStage {
        match error {
            SiteError::InvalidInput { .. } => PipelineStage::Idle,
            SiteError::GeoFailure { .. } => PipelineStage::Geocoding,
            SiteError::LookupFailure { service, .. } => match service {
                LookupService::Places => PipelineStage::FetchingPlaces,
                LookupService::Demographics => PipelineStage::FetchingDemographics,
                LookupService::Traffic => PipelineStage::FetchingTraffic,
            },
            SiteError::GenerationFailure { .. } => PipelineStage::Generating,
            _ => PipelineStage::Errored,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Errored)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Geocoding => "geocoding",
            PipelineStage::FetchingPlaces => "fetching places",
            PipelineStage::FetchingDemographics => "fetching demographics",
            PipelineStage::FetchingTraffic => "fetching traffic",
            PipelineStage::Scoring => "scoring",
            PipelineStage::Generating => "generating narrative",
            PipelineStage::Done => "done",
            PipelineStage::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// 分析流程依賴的外部服務
pub struct SiteServices {
    pub geocoder: Box<dyn GeoResolver>,
    pub places: Box<dyn PlacesLookup>,
    pub demographics: Box<dyn DemographicsLookup>,
    pub traffic: Box<dyn TrafficLookup>,
    pub narrator: Box<dyn NarrativeGenerator>,
}

pub struct SitePipeline {
    services: SiteServices,
    narrative: NarrativeContextBuilder,
    radius_meters: u32,
    monitor: SystemMonitor,
}

impl SitePipeline {
    pub const DEFAULT_RADIUS_METERS: u32 = 500;

    pub fn new(services: SiteServices, settings: NarrativeSettings) -> Self {
        Self {
            services,
            narrative: NarrativeContextBuilder::new(settings),
            radius_meters: Self::DEFAULT_RADIUS_METERS,
            monitor: SystemMonitor::default(),
        }
    }

    pub fn from_config(services: SiteServices, config: &SiteConfig) -> Self {
        Self::new(services, config.narrative.clone())
            .with_radius(config.places.radius_meters)
            .with_monitoring(config.monitoring.enabled)
    }

    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        if self.monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }
        self
    }

    fn enter(&self, stage: PipelineStage) {
        tracing::debug!("➡️ Stage: {}", stage);
        if stage.is_terminal() {
            self.monitor.log_final_stats();
        } else {
            self.monitor.log_stats(&stage.to_string());
        }
    }

    fn abort(&self, error: SiteError) -> SiteError {
        let stage = PipelineStage::from_error(&error);
        let diagnostic = error.diagnostic().unwrap_or_default();
        tracing::error!(
            diagnostic = %diagnostic,
            "❌ Site analysis aborted while {}: {} (Category: {:?}, Severity: {:?})",
            stage,
            error,
            error.category(),
            error.severity()
        );
        self.enter(PipelineStage::Errored);
        error
    }

    /// 地理編碼、三項查詢與評分；任何查詢失敗即中止，不產生部分結果
    pub async fn assess(&self, address: &str, zip_code: &str) -> Result<ScoredSite> {
        self.enter(PipelineStage::Idle);
        validate_input("address", address).map_err(|e| self.abort(e))?;
        validate_input("zip_code", zip_code).map_err(|e| self.abort(e))?;

        tracing::info!("🚀 Analyzing site: {} ({})", address, zip_code);

        self.enter(PipelineStage::Geocoding);
        let coordinate = self
            .services
            .geocoder
            .resolve(address)
            .await
            .map_err(|e| self.abort(e))?;

        // 三項查詢彼此獨立，同時送出；任一失敗即取消其餘請求
        self.enter(PipelineStage::FetchingPlaces);
        self.enter(PipelineStage::FetchingDemographics);
        self.enter(PipelineStage::FetchingTraffic);
        let (places, demographics, traffic) = tokio::try_join!(
            self.services.places.find_nearby(coordinate, self.radius_meters),
            self.services.demographics.lookup(zip_code),
            self.services.traffic.flow_at(coordinate),
        )
        .map_err(|e| self.abort(e))?;

        self.enter(PipelineStage::Scoring);
        let score = scoring::score(&places, &demographics);
        tracing::info!("📈 Estimated foot traffic score: {}/100", score);

        Ok(ScoredSite {
            address: address.to_string(),
            zip_code: zip_code.to_string(),
            coordinate,
            places,
            demographics,
            traffic,
            score,
        })
    }

    /// 為已評分的地點產生敘述摘要
    pub async fn narrate(&self, site: ScoredSite) -> Result<SiteAssessment> {
        self.enter(PipelineStage::Generating);
        let output = self
            .narrative
            .build_and_generate(self.services.narrator.as_ref(), &site)
            .await
            .map_err(|e| self.abort(e))?;

        self.enter(PipelineStage::Done);

        Ok(SiteAssessment {
            site,
            narrative: output.text,
            usage_tokens: output.usage_tokens,
            assessed_at: chrono::Utc::now(),
        })
    }

    pub async fn run(&self, address: &str, zip_code: &str) -> Result<SiteAssessment> {
        let site = self.assess(address, zip_code).await?;
        self.narrate(site).await
    }
}
