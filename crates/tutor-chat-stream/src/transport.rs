use std::pin::Pin;
use std::time::Duration;

use futures::StreamExt as _;
use tracing::debug;

use crate::errors::{ClientError, TransportError};
use crate::request::{ChatRequest, RequestOptions};

/// Raw byte stream produced by a transport.
pub type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, TransportError>> + Send + 'static>>;

/// Transport seam for issuing a streaming chat request.
///
/// The HTTP implementation lives in `HttpTransport`; tests substitute
/// synthetic byte sources so the parser and delivery machinery can be
/// exercised without opening real connections.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Issues the request and returns the raw response byte stream.
    async fn start_stream(
        &self,
        request: &ChatRequest,
        options: &RequestOptions,
    ) -> Result<ByteStream, TransportError>;
}

/// Configuration for the HTTP transport.
///
/// The bearer credential is an explicit value here, never ambient process
/// state.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API key used for bearer auth.
    pub api_key: String,
    /// Base URL for the chat-completions endpoint.
    ///
    /// Useful for proxies or local test servers.
    pub base_url: String,
    /// Default HTTP timeout for requests.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with sensible defaults and a provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Builds a config from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ClientError::Config(
                "missing OPENAI_API_KEY for the chat client".into(),
            ));
        }
        Ok(Self::new(api_key))
    }

    /// Overrides the API base URL (for proxies or test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config(
                "client config api_key must not be empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn start_stream(
        &self,
        request: &ChatRequest,
        options: &RequestOptions,
    ) -> Result<ByteStream, TransportError> {
        debug!(model = %request.model, messages = request.messages.len(), "starting chat-completions stream");

        let mut http_req = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request);
        if let Some(timeout) = options.timeout {
            http_req = http_req.timeout(timeout);
        }

        let response = http_req
            .send()
            .await
            .map_err(|e| TransportError::transport(format!("chat request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::endpoint(
                format!("chat-completions request failed with status {status}: {body}"),
                Some(status.as_u16()),
            ));
        }

        let stream = response
            .bytes_stream()
            .map(|item| item.map_err(|e| TransportError::transport(format!("streaming read failed: {e}"))));
        Ok(Box::pin(stream))
    }
}
