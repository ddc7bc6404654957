use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// GET a JSON document. 404 maps to `NotFound`, 401/403 to `Credential`.
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn status_error(status: StatusCode, body: String) -> DomainError {
    match status {
        StatusCode::NOT_FOUND => DomainError::not_found(format!("HTTP {}: {}", status, body)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::credential(format!("HTTP {}: {}", status, body))
        }
        _ => DomainError::provider("http", format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_body));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// A request seen by the mock
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub url: String,
        pub headers: Vec<(String, String)>,
    }

    impl RecordedRequest {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }
    }

    #[derive(Debug, Clone)]
    enum MockFailure {
        Status(StatusCode),
        Transport(String),
    }

    /// Recording HTTP client returning canned responses per URL
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, serde_json::Value>>,
        failures: RwLock<HashMap<String, MockFailure>>,
        requests: RwLock<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: serde_json::Value) -> Self {
            self.responses.write().unwrap().insert(url.into(), response);
            self
        }

        pub fn with_status(self, url: impl Into<String>, status: StatusCode) -> Self {
            self.failures
                .write()
                .unwrap()
                .insert(url.into(), MockFailure::Status(status));
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: impl Into<String>) -> Self {
            self.failures
                .write()
                .unwrap()
                .insert(url.into(), MockFailure::Transport(error.into()));
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn get_json(
            &self,
            url: &str,
            headers: Vec<(&str, &str)>,
        ) -> Result<serde_json::Value, DomainError> {
            self.requests.write().unwrap().push(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });

            if let Some(failure) = self.failures.read().unwrap().get(url) {
                return Err(match failure {
                    MockFailure::Status(status) => status_error(*status, String::new()),
                    MockFailure::Transport(message) => DomainError::provider("mock", message),
                });
            }

            self.responses
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| status_error(StatusCode::NOT_FOUND, format!("no mock for {}", url)))
        }
    }
}
