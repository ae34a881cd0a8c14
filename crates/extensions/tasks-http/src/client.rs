//! `reqwest`-backed [`HttpClient`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use taskflow_protocols::{
    HttpAuth, HttpClient, HttpMethod, HttpRequest, HttpResponse, IntegrationError,
};

/// HTTP integration over a pooled `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Build a client with a user agent and a connection-level timeout.
    ///
    /// Each request still carries its own timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| IntegrationError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when the body parses, a JSON string otherwise, null when empty.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    fn id(&self) -> &str {
        "reqwest"
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IntegrationError> {
        let url = url::Url::parse(&request.url)
            .map_err(|e| IntegrationError::Request(format!("Invalid URL '{}': {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(to_method(request.method), url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        match &request.auth {
            Some(HttpAuth::Basic { username, password }) => {
                builder = builder.basic_auth(username, Some(password));
            }
            Some(HttpAuth::Bearer(token)) => {
                builder = builder.bearer_auth(token);
            }
            None => {}
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %request.url, "Sending HTTP request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                IntegrationError::Timeout(request.timeout)
            } else {
                IntegrationError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                IntegrationError::Timeout(request.timeout)
            } else {
                IntegrationError::Request(format!("Failed to read body: {}", e))
            }
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body: parse_body(text),
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
