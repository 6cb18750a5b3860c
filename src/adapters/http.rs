use crate::utils::error::{Result, SiteError};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

/// 診斷資訊中保留的回應長度上限
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("site-analyzer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SiteError::ConfigValidationError {
            field: "http".to_string(),
            message: format!("Failed to build HTTP client: {}", e.without_url()),
        })
}

#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// 送出請求並完整讀取回應內容，保留原始文字供錯誤診斷
pub(crate) async fn send(request: RequestBuilder) -> std::result::Result<RawResponse, String> {
    let response = request.send().await.map_err(describe_transport_error)?;
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    let body = response.text().await.map_err(describe_transport_error)?;
    Ok(RawResponse { status, body })
}

// reqwest 的錯誤訊息會帶完整 URL（含 API 金鑰），必須先去除
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        format!("request failed: {}", err)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
    truncated.push_str("...");
    truncated
}
