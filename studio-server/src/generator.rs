//! HTTP client for the remote AI component generator.
//!
//! The generator exposes two JSON endpoints under a base URL:
//! `generate` and `enhance`. Both answer with a `success` flag and either a
//! payload or an `error` string.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use studio_core::{EnhancementRequest, EnhancementResponse, GenerationRequest, GenerationResponse};
use thiserror::Error;
use url::Url;

/// Errors that can occur when calling the generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The configured base URL is invalid.
    #[error("invalid generator URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, bad body).
    #[error("generator request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The generator answered with a non-success status.
    #[error("generator returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
}

impl GeneratorError {
    /// Whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Asynchronous generator client.
#[derive(Clone)]
pub struct GeneratorClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
}

impl std::fmt::Debug for GeneratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

impl GeneratorClient {
    /// Create a client for the generator at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidUrl`] if the URL is malformed, or
    /// [`GeneratorError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, GeneratorError> {
        let mut base =
            Url::parse(base_url.as_ref()).map_err(|e| GeneratorError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(GeneratorError::InvalidUrl(format!(
                "{base} cannot be used as a base URL"
            )));
        }

        // Endpoints are joined relative to the base path.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(format!("component-studio/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, base }),
        })
    }

    /// Base URL the endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Ask the generator for a new component.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a
    /// generation response. A response with `success: false` is not an error
    /// here.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GeneratorError> {
        self.post("generate", request).await
    }

    /// Ask the generator for improvement suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an
    /// enhancement response.
    pub async fn enhance(
        &self,
        request: &EnhancementRequest,
    ) -> Result<EnhancementResponse, GeneratorError> {
        self.post("enhance", request).await
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, GeneratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        const MAX_ERROR_BODY: usize = 256;

        let url = self
            .inner
            .base
            .join(endpoint)
            .map_err(|e| GeneratorError::InvalidUrl(e.to_string()))?;
        tracing::debug!("POST {url}");

        let response = self.inner.http.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut text = response.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            tracing::warn!("Generator {endpoint} returned {status}");
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest {
            description: "a glowing card".into(),
            component_type: "card".into(),
            style: "modern".into(),
        }
    }

    fn client_for(server: &MockServer, timeout: Duration) -> GeneratorClient {
        GeneratorClient::new(format!("{}/api/ai", server.uri()), timeout).expect("client")
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client =
            GeneratorClient::new("http://localhost:8787/api/ai", Duration::from_secs(1))
                .expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:8787/api/ai/");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = GeneratorClient::new("not a url", Duration::from_secs(1)).expect_err("invalid");
        assert!(matches!(err, GeneratorError::InvalidUrl(_)));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn generate_posts_camel_case_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ai/generate"))
            .and(body_json(json!({
                "description": "a glowing card",
                "componentType": "card",
                "style": "modern"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "component": "<div>{title}</div>",
                "source": "mock"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.generate(&request()).await.expect("response");
        assert!(response.success);
        assert_eq!(response.component.as_deref(), Some("<div>{title}</div>"));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn unsuccessful_body_is_returned_not_raised() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ai/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "timeout"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.generate(&request()).await.expect("response");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn server_error_status_is_raised() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ai/enhance"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .enhance(&EnhancementRequest {
                component_code: "<p></p>".into(),
                enhancement_request: "make it pop".into(),
            })
            .await
            .expect_err("status error");
        match err {
            GeneratorError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn slow_generator_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ai/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "component": "<p></p>" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(100));
        let err = client.generate(&request()).await.expect_err("timeout");
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }
}
