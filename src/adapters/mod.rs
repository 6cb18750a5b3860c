// Adapters layer: HTTP clients for the external geocoding, places, census, traffic and narrative services.

pub mod census;
pub mod google;
pub mod here;
pub mod http;
pub mod openai;

use crate::config::SiteConfig;
use crate::core::pipeline::SiteServices;
use crate::utils::error::Result;

/// 依設定建立所有正式環境的服務實作，共用同一個 HTTP client
pub fn http_services(config: &SiteConfig) -> Result<SiteServices> {
    let client = http::build_client(config.request_timeout())?;
    let endpoints = &config.endpoints;
    let google_key = config.google_api_key()?;

    Ok(SiteServices {
        geocoder: Box::new(google::GoogleGeocoder::new(
            client.clone(),
            endpoints.geocode_url.clone(),
            google_key.clone(),
        )),
        places: Box::new(google::GooglePlaces::new(
            client.clone(),
            endpoints.places_url.clone(),
            google_key.clone(),
        )),
        demographics: Box::new(census::CensusDemographics::new(
            client.clone(),
            endpoints.census_url.clone(),
            config.census_api_key().cloned(),
        )),
        traffic: Box::new(here::HereTraffic::new(
            client.clone(),
            endpoints.traffic_url.clone(),
            config.here_api_key()?.clone(),
        )),
        narrator: Box::new(openai::OpenAiNarrator::new(
            client,
            endpoints.openai_base_url.clone(),
            config.openai_api_key()?.clone(),
        )),
    })
}
