//! Pingdom REST API client.

use super::{
    CheckInfo, MonitoringProvider, OutageSummary, PerformanceSummary, ProviderError, ResultRecord,
    ResultsQuery, TimeWindow,
};
use crate::config::ProviderConfig;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChecksEnvelope {
    #[serde(default)]
    checks: Vec<CheckInfo>,
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<ResultRecord>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope<T> {
    summary: T,
}

/// Production provider backed by the Pingdom API.
pub struct PingdomClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl PingdomClient {
    /// Build a client for the given credentials.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_token.is_empty() {
            return Err(ProviderError::Auth("missing API token".to_string()));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("reading response body: {}", e)))?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status.as_u16(), body.len());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth(body));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))
}

fn window_params(window: &TimeWindow) -> Vec<(&'static str, String)> {
    let (from, to) = window.as_unix();
    vec![("from", from.to_string()), ("to", to.to_string())]
}

fn results_params(query: &ResultsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("limit", query.limit.to_string())];
    if let Some(window) = &query.window {
        params.extend(window_params(window));
    }
    params
}

#[async_trait]
impl MonitoringProvider for PingdomClient {
    async fn list_checks(&self) -> Result<Vec<CheckInfo>, ProviderError> {
        let envelope: ChecksEnvelope = self.get_json("/checks", &[]).await?;
        Ok(envelope.checks)
    }

    async fn fetch_results(
        &self,
        check_id: i64,
        query: ResultsQuery,
    ) -> Result<Vec<ResultRecord>, ProviderError> {
        let path = format!("/results/{}", check_id);
        let envelope: ResultsEnvelope = self.get_json(&path, &results_params(&query)).await?;
        Ok(envelope.results)
    }

    async fn fetch_performance_summary(
        &self,
        check_id: i64,
        window: TimeWindow,
    ) -> Result<PerformanceSummary, ProviderError> {
        let path = format!("/summary.performance/{}", check_id);
        let mut params = window_params(&window);
        params.push(("resolution", "day".to_string()));

        let envelope: SummaryEnvelope<PerformanceSummary> = self.get_json(&path, &params).await?;
        Ok(envelope.summary)
    }

    async fn fetch_outage_summary(
        &self,
        check_id: i64,
        window: TimeWindow,
    ) -> Result<OutageSummary, ProviderError> {
        let path = format!("/summary.outage/{}", check_id);
        let envelope: SummaryEnvelope<OutageSummary> =
            self.get_json(&path, &window_params(&window)).await?;
        Ok(envelope.summary)
    }
}
