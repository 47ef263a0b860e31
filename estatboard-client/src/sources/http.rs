use async_trait::async_trait;
use estatboard::config::ApiConfig;
use estatboard::{CategoryDimension, RealEstateKind};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::traits::StatsSource;
use crate::error::{ClientError, Result};
use crate::query::StatsQuery;

/// Statistics API over HTTP.
///
/// Endpoints, relative to the base URL:
/// - `GET statistics/{flats|houses|lands}/{author|deal-type}`
/// - `GET statistics/{flats|houses|lands}/activity`
/// - `GET statistics/domains`
pub struct HttpStatsSource {
    client: Client,
    base_url: Url,
}

impl HttpStatsSource {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token)
                    .parse()
                    .map_err(|_| ClientError::InvalidToken)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.token.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("statistics")
            .extend(segments);
        Ok(url)
    }

    async fn get_rows(&self, url: Url, query: &StatsQuery) -> Result<Vec<Value>> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .query(&query.to_pairs())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<Value>().await? {
            Value::Array(rows) => {
                tracing::debug!(rows = rows.len(), "Fetched {}", url.path());
                Ok(rows)
            }
            other => Err(ClientError::UnexpectedShape {
                url: url.to_string(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch_room_counts(
        &self,
        kind: RealEstateKind,
        dimension: CategoryDimension,
        query: &StatsQuery,
    ) -> Result<Vec<Value>> {
        let url = self.endpoint(&[kind.api_segment(), dimension.api_segment()])?;
        self.get_rows(url, query).await
    }

    async fn fetch_activity(&self, kind: RealEstateKind, query: &StatsQuery) -> Result<Vec<Value>> {
        let url = self.endpoint(&[kind.api_segment(), "activity"])?;
        self.get_rows(url, query).await
    }

    async fn fetch_domains(&self, query: &StatsQuery) -> Result<Vec<Value>> {
        let url = self.endpoint(&["domains"])?;
        self.get_rows(url, query).await
    }

    fn source_name(&self) -> &str {
        "http"
    }
}
