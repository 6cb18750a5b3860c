use crate::domain::model::{
    Coordinate, DemographicProfile, NarrativeRequest, NarrativeResponse, Place, TrafficFlow,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Coordinate>;
}

#[async_trait]
pub trait PlacesLookup: Send + Sync {
    async fn find_nearby(&self, coordinate: Coordinate, radius_meters: u32) -> Result<Vec<Place>>;
}

#[async_trait]
pub trait DemographicsLookup: Send + Sync {
    async fn lookup(&self, zip_code: &str) -> Result<DemographicProfile>;
}

#[async_trait]
pub trait TrafficLookup: Send + Sync {
    async fn flow_at(&self, coordinate: Coordinate) -> Result<TrafficFlow>;
}

/// 外部文字生成服務，視為不透明的單次請求/回應
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeResponse>;
}
