//! Remote AI extraction service and the delegation step

use crate::error::RemoteError;
use crate::types::{Delegation, FallbackReason, RemoteJobData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default endpoint of the AI extraction service
pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8001/extract";

/// Default bound on a single remote call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A service able to extract job data from raw text
#[async_trait]
pub trait RemoteExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<RemoteJobData, RemoteError>;
}

/// Request body sent to the AI service
#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

/// Envelope returned by the AI service
#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    data: Option<RemoteJobData>,
}

/// HTTP client for the AI extraction service
#[derive(Debug, Clone)]
pub struct AiServiceClient {
    url: String,
    client: reqwest::Client,
}

impl AiServiceClient {
    /// Create a client posting to `url`, each call bounded by `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteExtractor for AiServiceClient {
    async fn extract(&self, text: &str) -> Result<RemoteJobData, RemoteError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ExtractRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: ExtractResponse =
            serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(parsed.data.unwrap_or_default())
    }
}

/// Remote extractor that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl RemoteExtractor for Disabled {
    async fn extract(&self, _text: &str) -> Result<RemoteJobData, RemoteError> {
        Err(RemoteError::Disabled)
    }
}

/// Ask `remote` for the job data once; any failure selects the local fallback
pub async fn delegate<R>(remote: &R, text: &str) -> Delegation
where
    R: RemoteExtractor + ?Sized,
{
    match remote.extract(text).await {
        Ok(data) => {
            info!("AI extraction succeeded");
            Delegation::Remote(data)
        }
        Err(RemoteError::Disabled) => {
            Delegation::LocalFallback(FallbackReason(RemoteError::Disabled))
        }
        Err(error) => {
            warn!(error = %error, "AI service not available, falling back to local extraction");
            Delegation::LocalFallback(FallbackReason(error))
        }
    }
}
