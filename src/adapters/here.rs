use crate::adapters::http::{send, truncate_body};
use crate::config::ApiKey;
use crate::domain::model::{BoundingBox, Coordinate, TrafficFlow};
use crate::domain::ports::TrafficLookup;
use crate::utils::error::{LookupService, Result, SiteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// 座標四周各 ±0.005 度，約 1km 見方
pub const BOUNDING_BOX_HALF_SPAN: f64 = 0.005;

const NO_TRAFFIC_DATA: &str = "no traffic data available for this location";

// 只支援 v7 扁平格式；舊版巢狀路徑 (RWS/FIS/FI/CF) 不再處理
#[derive(Debug, Deserialize)]
struct FlowResponse {
    flows: Option<Vec<FlowSegment>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowSegment {
    jam_factor: Option<f64>,
    free_flow_speed: Option<f64>,
    current_speed: Option<f64>,
    confidence: Option<f64>,
}

impl From<FlowSegment> for TrafficFlow {
    fn from(segment: FlowSegment) -> Self {
        TrafficFlow {
            jam_factor: segment.jam_factor,
            free_flow_speed: segment.free_flow_speed,
            current_speed: segment.current_speed,
            confidence: segment.confidence,
        }
    }
}

pub(crate) fn bounding_box_param(bbox: &BoundingBox) -> String {
    format!(
        "boundingBox:{},{},{},{}",
        bbox.south, bbox.west, bbox.north, bbox.east
    )
}

/// 解析 200 回應的第一個路段；格式不符時回傳可回報的查詢失敗
fn parse_first_segment(body: &str) -> Result<TrafficFlow> {
    let no_data = || {
        SiteError::lookup(LookupService::Traffic, NO_TRAFFIC_DATA).with_details(truncate_body(body))
    };

    let parsed: FlowResponse = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Traffic payload did not match the v7 schema: {}", e);
        no_data()
    })?;

    parsed
        .flows
        .and_then(|flows| flows.into_iter().next())
        .map(TrafficFlow::from)
        .ok_or_else(no_data)
}

/// HERE Traffic API v7 flow
pub struct HereTraffic {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl HereTraffic {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl TrafficLookup for HereTraffic {
    async fn flow_at(&self, coordinate: Coordinate) -> Result<TrafficFlow> {
        let area = bounding_box_param(&coordinate.bounding_box(BOUNDING_BOX_HALF_SPAN));
        tracing::debug!("Requesting traffic flow for {}", area);

        let request = self.client.get(&self.endpoint).query(&[
            ("in", area.as_str()),
            ("locationReferencing", "shape"),
            ("apikey", self.api_key.expose()),
        ]);

        let response = send(request)
            .await
            .map_err(|e| SiteError::lookup(LookupService::Traffic, e))?;

        if response.status != StatusCode::OK {
            let code = response.status.as_u16();
            return Err(SiteError::lookup(
                LookupService::Traffic,
                format!("HERE API failed ({})", code),
            )
            .with_status(code)
            .with_details(truncate_body(&response.body)));
        }

        let flow = parse_first_segment(&response.body)?;
        tracing::info!("🚦 Traffic near {}: {}", coordinate, flow.summary());
        Ok(flow)
    }
}
