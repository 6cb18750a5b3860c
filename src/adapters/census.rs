use crate::adapters::http::{send, truncate_body};
use crate::config::ApiKey;
use crate::domain::model::DemographicProfile;
use crate::domain::ports::DemographicsLookup;
use crate::utils::error::{LookupService, Result, SiteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;

/// ACS5 profile：家戶所得中位數
pub const INCOME_INDICATOR: &str = "DP03_0062E";
/// ACS5 profile：貧窮率估計
pub const POVERTY_INDICATOR: &str = "DP03_0063E";

/// 美國人口普查局 ACS API，以 ZCTA 查詢
pub struct CensusDemographics {
    client: Client,
    endpoint: String,
    api_key: Option<ApiKey>,
}

impl CensusDemographics {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    fn failure(message: impl Into<String>) -> SiteError {
        SiteError::lookup(LookupService::Demographics, message)
    }
}

#[async_trait]
impl DemographicsLookup for CensusDemographics {
    async fn lookup(&self, zip_code: &str) -> Result<DemographicProfile> {
        let indicators = format!("{},{}", INCOME_INDICATOR, POVERTY_INDICATOR);
        let geography = format!("zip code tabulation area:{}", zip_code.trim());

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("get", indicators.as_str()), ("for", geography.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.expose())]);
        }

        let response = send(request).await.map_err(Self::failure)?;

        if !response.status.is_success() {
            let code = response.status.as_u16();
            return Err(Self::failure(format!("Census API failed ({})", code))
                .with_status(code)
                .with_details(truncate_body(&response.body)));
        }

        // 查無此 ZCTA 時 Census 回傳 204 且無內容
        if response.status == StatusCode::NO_CONTENT || response.body.trim().is_empty() {
            tracing::warn!("⚠️ No demographic data for ZIP {}", zip_code);
            return Ok(DemographicProfile::unavailable());
        }

        let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
            Self::failure(format!("unreadable Census response: {}", e))
                .with_details(truncate_body(&response.body))
        })?;

        let profile = parse_profile(&payload)
            .map_err(|e| e.with_details(truncate_body(&response.body)))?;
        tracing::info!("👥 Demographics for {}: {}", zip_code, profile);
        Ok(profile)
    }
}

/// 將表頭列與數值列配對成欄位對照表後取出兩個指標
fn parse_profile(payload: &Value) -> Result<DemographicProfile> {
    let rows = match payload {
        Value::Object(obj) => {
            let message = match obj.get("error") {
                Some(Value::String(message)) => format!("Census API failed: {}", message),
                Some(other) => format!("Census API failed: {}", other),
                None => "unexpected Census response shape".to_string(),
            };
            return Err(CensusDemographics::failure(message));
        }
        Value::Array(rows) => rows,
        _ => {
            return Err(CensusDemographics::failure(
                "unexpected Census response shape",
            ))
        }
    };

    let (Some(Value::Array(headers)), Some(Value::Array(values))) = (rows.first(), rows.get(1))
    else {
        tracing::warn!("⚠️ Census response has no value row");
        return Ok(DemographicProfile::unavailable());
    };

    let columns: HashMap<&str, Option<String>> = headers
        .iter()
        .zip(values.iter())
        .filter_map(|(header, value)| header.as_str().map(|name| (name, cell_text(value))))
        .collect();

    let indicator = |name: &str| columns.get(name).cloned().flatten();
    let income = indicator(INCOME_INDICATOR);
    let poverty = indicator(POVERTY_INDICATOR);

    Ok(DemographicProfile::from_raw(
        income.as_deref(),
        poverty.as_deref(),
    ))
}

// Census 以負數（如 -666666666）標註無法估計的值
fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() || text.starts_with('-') {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::build_client;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn lookup_for(server: &MockServer, key: Option<&str>) -> CensusDemographics {
        CensusDemographics::new(
            build_client(Duration::from_secs(5)).unwrap(),
            server.url("/data/2020/acs/acs5/profile"),
            key.map(ApiKey::new),
        )
    }

    #[test]
    fn test_parse_profile_zips_header_and_value_rows() {
        let payload = json!([
            ["DP03_0062E", "DP03_0063E", "zip code tabulation area"],
            ["68523", "12.1", "10001"]
        ]);

        let profile = parse_profile(&payload).unwrap();

        assert_eq!(profile.median_household_income, "$68523");
        assert_eq!(profile.poverty_rate_estimate, "12.1%");
    }

    #[test]
    fn test_parse_profile_column_order_does_not_matter() {
        let payload = json!([
            ["zip code tabulation area", "DP03_0063E", "DP03_0062E"],
            ["10001", "9.5", "91000"]
        ]);

        let profile = parse_profile(&payload).unwrap();

        assert_eq!(profile.median_household_income, "$91000");
        assert_eq!(profile.poverty_rate_estimate, "9.5%");
    }

    #[test]
    fn test_parse_profile_annotated_values_become_unavailable() {
        let payload = json!([
            ["DP03_0062E", "DP03_0063E"],
            ["-666666666", null]
        ]);

        let profile = parse_profile(&payload).unwrap();
        assert_eq!(profile, DemographicProfile::unavailable());
    }

    #[test]
    fn test_parse_profile_header_only_is_unavailable() {
        let payload = json!([["DP03_0062E", "DP03_0063E"]]);
        assert_eq!(
            parse_profile(&payload).unwrap(),
            DemographicProfile::unavailable()
        );
    }

    #[tokio::test]
    async fn test_lookup_missing_indicator_is_not_an_error() {
        let server = MockServer::start_async().await;
        let census_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/2020/acs/acs5/profile")
                    .query_param("get", "DP03_0062E,DP03_0063E")
                    .query_param("for", "zip code tabulation area:62701")
                    .query_param("key", "c-key");
                then.status(200).json_body(json!([
                    ["DP03_0062E", "zip code tabulation area"],
                    ["45210", "62701"]
                ]));
            })
            .await;

        let profile = lookup_for(&server, Some("c-key"))
            .lookup("62701")
            .await
            .unwrap();

        census_mock.assert_async().await;
        assert_eq!(profile.median_household_income, "$45210");
        assert_eq!(profile.poverty_rate_estimate, "N/A");
    }

    #[tokio::test]
    async fn test_lookup_error_payload_is_lookup_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2020/acs/acs5/profile");
                then.status(200)
                    .json_body(json!({"error": "error: unknown/unsupported geography hierarchy"}));
            })
            .await;

        let err = lookup_for(&server, None).lookup("00000").await.unwrap_err();

        match err {
            SiteError::LookupFailure {
                service, message, ..
            } => {
                assert_eq!(service, LookupService::Demographics);
                assert!(message.contains("unknown/unsupported geography"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_http_error_is_lookup_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2020/acs/acs5/profile");
                then.status(400).body("error: invalid key");
            })
            .await;

        let err = lookup_for(&server, None).lookup("62701").await.unwrap_err();

        assert!(matches!(
            err,
            SiteError::LookupFailure {
                service: LookupService::Demographics,
                status: Some(400),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_lookup_no_content_is_unavailable_profile() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2020/acs/acs5/profile");
                then.status(204);
            })
            .await;

        let profile = lookup_for(&server, None).lookup("99999").await.unwrap();
        assert_eq!(profile, DemographicProfile::unavailable());
    }
}
