use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 無法取得的指標一律以此標記顯示
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 以度數為單位向四周展開的矩形範圍。未做經緯度到距離的大地修正。
    pub fn bounding_box(&self, half_span_degrees: f64) -> BoundingBox {
        BoundingBox {
            south: self.latitude - half_span_degrees,
            west: self.longitude - half_span_degrees,
            north: self.latitude + half_span_degrees,
            east: self.longitude + half_span_degrees,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub categories: Vec<String>,
}

impl Place {
    pub fn new(name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            categories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicProfile {
    pub median_household_income: String,
    pub poverty_rate_estimate: String,
}

impl DemographicProfile {
    /// 從原始指標值建立；`None` 代表上游沒有該欄位
    pub fn from_raw(income: Option<&str>, poverty_rate: Option<&str>) -> Self {
        Self {
            median_household_income: income
                .map(|v| format!("${}", v))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            poverty_rate_estimate: poverty_rate
                .map(|v| format!("{}%", v))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self::from_raw(None, None)
    }

    /// 去除貨幣格式後的收入數值；無法解析時為 `None`
    pub fn median_income_value(&self) -> Option<i64> {
        let cleaned = self.median_household_income.replace(['$', ','], "");
        cleaned.trim().parse::<i64>().ok()
    }
}

impl fmt::Display for DemographicProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Median Household Income: {}; Poverty Rate Estimate: {}",
            self.median_household_income, self.poverty_rate_estimate
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficFlow {
    pub jam_factor: Option<f64>,
    pub free_flow_speed: Option<f64>,
    pub current_speed: Option<f64>,
    pub confidence: Option<f64>,
}

impl TrafficFlow {
    /// 單行交通摘要，同時用於報表與 prompt
    pub fn summary(&self) -> String {
        fn show(value: Option<f64>) -> String {
            value
                .map(|v| v.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }

        format!(
            "jam factor {} (0-10), current speed {}, free-flow speed {}, confidence {}",
            show(self.jam_factor),
            show(self.current_speed),
            show(self.free_flow_speed),
            show(self.confidence)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct SiteScore(u8);

impl SiteScore {
    pub const MAX: u8 = 100;

    /// 超過上限的值會被截到 100
    pub fn new(raw: u32) -> Self {
        Self(raw.min(Self::MAX as u32) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<SiteScore> for u8 {
    fn from(score: SiteScore) -> u8 {
        score.0
    }
}

/// 反序列化時不截斷，超出範圍直接拒絕
impl TryFrom<u8> for SiteScore {
    type Error = String;

    fn try_from(raw: u8) -> std::result::Result<Self, Self::Error> {
        if raw > Self::MAX {
            return Err(format!("score {} exceeds {}", raw, Self::MAX));
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for SiteScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 敘述生成前的數值評估結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSite {
    pub address: String,
    pub zip_code: String,
    pub coordinate: Coordinate,
    pub places: Vec<Place>,
    pub demographics: DemographicProfile,
    pub traffic: TrafficFlow,
    pub score: SiteScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAssessment {
    #[serde(flatten)]
    pub site: ScoredSite,
    pub narrative: String,
    pub usage_tokens: Option<u64>,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeResponse {
    pub text: String,
    pub usage_tokens: Option<u64>,
}
