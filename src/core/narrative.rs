use crate::config::NarrativeSettings;
use crate::domain::model::{NarrativeRequest, Place, ScoredSite};
use crate::domain::ports::NarrativeGenerator;
use crate::utils::error::{Result, SiteError};

pub const ADDRESS_LABEL: &str = "Address";
pub const PLACES_LABEL: &str = "Nearby Businesses";
pub const DEMOGRAPHICS_LABEL: &str = "Demographics";
pub const TRAFFIC_LABEL: &str = "Live Traffic";
pub const SCORE_LABEL: &str = "Estimated Foot Traffic Score (0-100)";

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeOutput {
    pub text: String,
    pub usage_tokens: Option<u64>,
}

/// 組合分析 prompt 並呼叫文字生成服務
#[derive(Debug, Clone)]
pub struct NarrativeContextBuilder {
    settings: NarrativeSettings,
}

impl NarrativeContextBuilder {
    pub fn new(settings: NarrativeSettings) -> Self {
        Self { settings }
    }

    /// 每個欄位獨佔一行，方便從 prompt 取回原始值
    pub fn build_prompt(&self, site: &ScoredSite) -> String {
        format!(
            "You are an AI commercial real estate analyst. Analyze the following site:\n\
             {ADDRESS_LABEL}: {address}\n\
             {PLACES_LABEL}: {places}\n\
             {DEMOGRAPHICS_LABEL}: {demographics}\n\
             {TRAFFIC_LABEL}: {traffic}\n\
             {SCORE_LABEL}: {score}\n\
             \n\
             Give a brief site summary including:\n\
             - Commercial viability\n\
             - Traffic strength\n\
             - Investment outlook\n\
             - Anchor co-tenancy or notable patterns\n",
            address = site.address,
            places = format_places(&site.places),
            demographics = site.demographics,
            traffic = site.traffic.summary(),
            score = site.score,
        )
    }

    pub fn build_request(&self, site: &ScoredSite) -> NarrativeRequest {
        NarrativeRequest {
            prompt: self.build_prompt(site),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
        }
    }

    pub async fn build_and_generate(
        &self,
        generator: &dyn NarrativeGenerator,
        site: &ScoredSite,
    ) -> Result<NarrativeOutput> {
        let request = self.build_request(site);
        tracing::debug!("Narrative prompt is {} characters", request.prompt.len());

        let response = generator.generate(request).await?;
        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(SiteError::generation("narrative service returned empty text"));
        }

        match response.usage_tokens {
            Some(tokens) => tracing::info!("🧾 Narrative used {} tokens", tokens),
            None => tracing::debug!("Narrative service reported no token usage"),
        }

        Ok(NarrativeOutput {
            text,
            usage_tokens: response.usage_tokens,
        })
    }
}

fn format_places(places: &[Place]) -> String {
    if places.is_empty() {
        return "none found".to_string();
    }

    places
        .iter()
        .map(|place| {
            if place.categories.is_empty() {
                place.name.clone()
            } else {
                format!("{} ({})", place.name, place.categories.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
