//! HTTP client for the backend's user and health endpoints.
//!
//! Every call is captured as an [`Exchange`]: status, headers, the raw body
//! and, when the body parses, its JSON. The probes build their transcripts
//! and verdicts from these.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const LOGIN_PATH: &str = "/api/users/login";
pub const REGISTER_PATH: &str = "/api/users/register";
pub const PROFILE_PATH: &str = "/api/users/profile";
pub const HEALTH_PATH: &str = "/health";
pub const API_TEST_PATH: &str = "/api/test";

const USER_AGENT: &str = concat!("devprobes/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header {name}: {value}")]
    InvalidHeader { name: String, value: String },
}

/// One request/response pair as observed by a probe
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// `None` when the body is not valid JSON
    pub json: Option<Value>,
    /// Set when the status and headers arrived but the body could not be read
    pub body_error: Option<String>,
}

impl Exchange {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Auth token from the body: top-level `token`, else `data.token`.
    ///
    /// Empty strings do not count as a token.
    pub fn token(&self) -> Option<&str> {
        let json = self.json.as_ref()?;
        json.get("token")
            .and_then(Value::as_str)
            .or_else(|| json.pointer("/data/token").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
    }

    /// Log status, headers, raw body and the parse result
    pub fn log_transcript(&self) {
        tracing::info!("{} {} -> {}", self.method, self.url, self.status);
        for (name, value) in &self.headers {
            tracing::info!("  {}: {}", name, value);
        }
        if let Some(error) = &self.body_error {
            tracing::error!("Failed to read response body: {}", error);
            return;
        }
        tracing::info!("Raw body: {}", self.body);
        match &self.json {
            Some(json) => tracing::info!("Parsed JSON: {}", json),
            None => tracing::warn!("Response body is not valid JSON"),
        }
    }
}

/// Thin reqwest wrapper bound to one backend origin
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    origin: Option<HeaderValue>,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// * `timeout` - per-request timeout; `None` waits indefinitely
    /// * `with_credentials` - keep cookies across requests, like a browser
    ///   fetch with `credentials: "include"`
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        with_credentials: bool,
    ) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(with_credentials);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            origin: None,
        })
    }

    /// Send `Origin: <origin>` on every request
    pub fn with_origin(mut self, origin: &str) -> Result<Self, ProbeError> {
        self.origin = Some(header_value("Origin", origin)?);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Exchange, ProbeError> {
        self.send(Method::GET, path, None, HeaderMap::new()).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Exchange, ProbeError> {
        self.send(Method::POST, path, Some(body), HeaderMap::new())
            .await
    }

    /// GET with `Authorization: Bearer <token>`
    pub async fn get_authorized(&self, path: &str, token: &str) -> Result<Exchange, ProbeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &format!("Bearer {}", token))?,
        );
        self.send(Method::GET, path, None, headers).await
    }

    /// CORS preflight for `method` on `path`
    pub async fn preflight(&self, path: &str, method: &str) -> Result<Exchange, ProbeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("access-control-request-method"),
            header_value("Access-Control-Request-Method", method)?,
        );
        headers.insert(
            HeaderName::from_static("access-control-request-headers"),
            HeaderValue::from_static("content-type"),
        );
        self.send(Method::OPTIONS, path, None, headers).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Exchange, ProbeError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(origin) = &self.origin {
            request = request.header(reqwest::header::ORIGIN, origin.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let (body, body_error) = match response.text().await {
            Ok(body) => (body, None),
            Err(e) => (String::new(), Some(e.to_string())),
        };
        let json = serde_json::from_str(&body).ok();

        Ok(Exchange {
            method: method.to_string(),
            url,
            status,
            headers,
            body,
            json,
            body_error,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ProbeError> {
    HeaderValue::from_str(value).map_err(|_| ProbeError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}
