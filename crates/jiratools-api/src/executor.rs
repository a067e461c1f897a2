//! HTTP request executor
//!
//! Wraps the reqwest client with bounded retries, exponential backoff, and
//! error normalization for calls against the JIRA REST v3 API. The retry
//! loop is an explicit bounded-attempt state machine: every failure is
//! classified, and the request's idempotency class decides at each step
//! whether another attempt is safe.

use crate::auth::JiraAuth;
use crate::config::JiraConfig;
use crate::error::{ApiError, Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Whether a request may be re-sent after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    /// Safe to retry on any transient failure, including 5xx responses.
    Retryable,
    /// Creates server-side state. Only safe to retry when no response was
    /// received at all, so a duplicate cannot have been recorded.
    CreateOnce,
}

/// A single API call, ready to be executed with retries.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub idempotency: Idempotency,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
            idempotency: Idempotency::Retryable,
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            idempotency: Idempotency::Retryable,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            idempotency: Idempotency::CreateOnce,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Bounded-attempt retry schedule.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given 1-based attempt: 1s, 2s, 4s, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

pub struct RequestExecutor {
    http: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        Self::with_policy(config, RetryPolicy::default())
    }

    pub fn with_policy(config: &JiraConfig, policy: RetryPolicy) -> Result<Self> {
        let auth = JiraAuth::from(config);
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&auth.to_basic_auth()).map_err(|_| {
            Error::Config("credentials contain characters not valid in a header".to_string())
        })?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("X-Atlassian-Token", HeaderValue::from_static("no-check"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base(),
            policy,
        })
    }

    /// Execute a request with retries, returning the parsed JSON body.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let mut attempt = 1u32;
        loop {
            debug!(method = %request.method, path = %request.path, attempt, "sending request");
            match self.send(request).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return parse_body(response).await;
                    }
                    let retryable = status.is_server_error()
                        && request.idempotency == Idempotency::Retryable;
                    let body = response.text().await.unwrap_or_default();
                    let error = ApiError::from_response(status.as_u16(), &body);
                    if !retryable || attempt >= self.policy.max_attempts {
                        return Err(error.into());
                    }
                    warn!(status = status.as_u16(), attempt, "retrying after server error");
                }
                Err(source) => {
                    // No response was received, so even a create cannot
                    // have been recorded server-side.
                    if attempt >= self.policy.max_attempts {
                        return Err(ApiError::network(source.to_string()).into());
                    }
                    warn!(error = %source, attempt, "retrying after network error");
                }
            }
            tokio::time::sleep(self.policy.backoff(attempt)).await;
            attempt += 1;
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder.send().await
    }

    /// Upload a file as multipart form data. Uploads are single-attempt: a
    /// consumed multipart stream cannot be replayed.
    pub async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<Value> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = format!("{}/{path}", self.base_url);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body).into());
        }
        parse_body(response).await
    }
}

async fn parse_body(response: reqwest::Response) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
