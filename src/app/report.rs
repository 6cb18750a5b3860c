use crate::domain::model::{ScoredSite, SiteAssessment};
use crate::utils::error::Result;
use std::fmt::Write;

/// 數值評估的純文字報告
pub fn render_scored(site: &ScoredSite) -> String {
    let mut out = String::new();
    // 寫入 String 不會失敗
    let _ = writeln!(out, "📍 {} ({})", site.address, site.zip_code);
    let _ = writeln!(out, "   Coordinates: {}", site.coordinate);
    let _ = writeln!(out, "🏬 Nearby businesses: {}", site.places.len());
    for place in &site.places {
        if place.categories.is_empty() {
            let _ = writeln!(out, "   - {}", place.name);
        } else {
            let _ = writeln!(out, "   - {} [{}]", place.name, place.categories.join(", "));
        }
    }
    let _ = writeln!(out, "👥 {}", site.demographics);
    let _ = writeln!(out, "🚦 Traffic: {}", site.traffic.summary());
    let _ = writeln!(out, "📊 Foot traffic score: {}/100", site.score);
    out
}

pub fn render_assessment(assessment: &SiteAssessment) -> String {
    let mut out = render_scored(&assessment.site);
    let _ = writeln!(out);
    let _ = writeln!(out, "🧠 Site summary");
    let _ = writeln!(out, "{}", assessment.narrative);
    if let Some(tokens) = assessment.usage_tokens {
        let _ = writeln!(out);
        let _ = writeln!(out, "🧾 Token usage: {}", tokens);
    }
    let _ = writeln!(
        out,
        "🕒 Assessed at {}",
        assessment.assessed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}

pub fn scored_json(site: &ScoredSite) -> Result<String> {
    Ok(serde_json::to_string_pretty(site)?)
}

pub fn assessment_json(assessment: &SiteAssessment) -> Result<String> {
    Ok(serde_json::to_string_pretty(assessment)?)
}
