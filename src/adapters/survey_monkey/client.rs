//! SurveyMonkey Client - Implementation of SurveyApi over the v3 REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SurveyMonkeyConfig::new(access_token)
//!     .with_base_url("https://api.surveymonkey.com/v3")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let client = SurveyMonkeyClient::new(config)?;
//! ```
//!
//! Every request carries the access token as a bearer credential.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::foundation::SurveyId;
use crate::domain::survey::{BulkResponses, SurveyDetails, SurveyList, SurveySummary};
use crate::ports::{ResponseQuery, SurveyApi, SurveyApiError, SurveyListQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.surveymonkey.com/v3";

/// Configuration for the SurveyMonkey client.
#[derive(Debug, Clone)]
pub struct SurveyMonkeyConfig {
    access_token: Secret<String>,
    /// Base URL including the API version segment.
    pub base_url: String,
    pub timeout: Duration,
}

impl SurveyMonkeyConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::from_secret(Secret::new(access_token.into()))
    }

    pub fn from_secret(access_token: Secret<String>) -> Self {
        Self {
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// SurveyMonkey API client.
pub struct SurveyMonkeyClient {
    config: SurveyMonkeyConfig,
    base_url: Url,
    client: Client,
}

impl SurveyMonkeyClient {
    pub fn new(config: SurveyMonkeyConfig) -> Result<Self, SurveyApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SurveyApiError::unavailable(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SurveyApiError::unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SurveyApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SurveyApiError::unavailable("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<T, SurveyApiError> {
        tracing::debug!(url = %url, "Survey API request");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.config.access_token())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SurveyApiError::Timeout
                } else if e.is_connect() {
                    SurveyApiError::network(format!("Connection failed: {}", e))
                } else {
                    SurveyApiError::network(e.to_string())
                }
            })?;

        let response = Self::handle_response_status(response, resource).await?;
        let body = response
            .text()
            .await
            .map_err(|e| SurveyApiError::network(format!("Failed to read body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| SurveyApiError::parse(e.to_string()))
    }

    /// Maps non-success statuses to errors; `resource` names what a 404 lost.
    async fn handle_response_status(
        response: Response,
        resource: &str,
    ) -> Result<Response, SurveyApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = Self::parse_retry_after(&response);
        let error_body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SurveyApiError::Unauthorized(error_body))
            }
            StatusCode::NOT_FOUND => Err(SurveyApiError::NotFound(resource.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(SurveyApiError::RateLimited { retry_after_secs }),
            s if s.is_server_error() => Err(SurveyApiError::unavailable(format!(
                "Server error {}: {}",
                s, error_body
            ))),
            s => Err(SurveyApiError::network(format!(
                "Unexpected status {}: {}",
                s, error_body
            ))),
        }
    }

    fn parse_retry_after(response: &Response) -> Option<u64> {
        response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }
}

#[async_trait]
impl SurveyApi for SurveyMonkeyClient {
    async fn fetch_survey_details(
        &self,
        survey_id: &SurveyId,
    ) -> Result<SurveyDetails, SurveyApiError> {
        let url = self.endpoint(&["surveys", survey_id.as_str(), "details"])?;
        self.get_json(url, &[], survey_id.as_str()).await
    }

    async fn fetch_survey(&self, survey_id: &SurveyId) -> Result<SurveySummary, SurveyApiError> {
        let url = self.endpoint(&["surveys", survey_id.as_str()])?;
        self.get_json(url, &[], survey_id.as_str()).await
    }

    async fn fetch_responses(
        &self,
        survey_id: &SurveyId,
        query: &ResponseQuery,
    ) -> Result<BulkResponses, SurveyApiError> {
        let url = self.endpoint(&["surveys", survey_id.as_str(), "responses", "bulk"])?;
        let params = [
            ("per_page", query.per_page.to_string()),
            ("sort_order", query.sort_order.as_str().to_string()),
            ("sort_by", query.sort_by.clone()),
        ];
        self.get_json(url, &params, survey_id.as_str()).await
    }

    async fn list_surveys(&self, query: &SurveyListQuery) -> Result<SurveyList, SurveyApiError> {
        let url = self.endpoint(&["surveys"])?;
        let params = [
            ("per_page", query.per_page.to_string()),
            ("page", query.page.to_string()),
        ];
        self.get_json(url, &params, "surveys").await
    }
}
