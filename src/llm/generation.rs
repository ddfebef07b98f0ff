//! Client for an Ollama-compatible generation endpoint.
//!
//! One generation attempt per turn, bounded by the configured timeout, with
//! the outcome classified rather than propagated as an error:
//! - 200 with generated text is a success;
//! - 200 without the expected field degrades to a sentinel success, so a
//!   backend contract drift never surfaces as a parse error mid-conversation;
//! - non-200 carries the status code;
//! - unreachable endpoints and everything else get their own variants.
//!
//! No retries are performed; callers decide what a failed turn looks like.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::config::ChatConfig;
use crate::chat::errors::ChatResult;

/// Sentinel reply used when the backend returns 200 without generated text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "The model returned no response.";

/// Wire payload for `POST /api/generate`.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationRequest {
    /// Model identifier as installed on the backend.
    pub model: String,
    /// Fully assembled prompt text.
    pub prompt: String,
    /// Streaming is always disabled; replies are delivered whole.
    pub stream: bool,
}

/// Success-response body; `response` is absent on some backend versions.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Outcome of a single generation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Generated text (or the sentinel fallback).
    Success {
        /// The reply text.
        text: String,
    },
    /// Endpoint reachable but returned a non-success status.
    BackendError {
        /// HTTP status code returned by the backend.
        status: u16,
    },
    /// Endpoint unreachable: connection refused, reset, or no route.
    ConnectionFailure,
    /// Any other failure during the call or response handling.
    UnknownFailure {
        /// Human-readable description of what went wrong.
        description: String,
    },
}

/// Seam between the conversation controller and the real backend.
///
/// Implementations never panic and never retry; every failure mode is folded
/// into a [`GenerationOutcome`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Perform one generation attempt.
    async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome;
}

/// HTTP client for an Ollama-compatible generation endpoint.
pub struct OllamaGenerationClient {
    client: reqwest::Client,
    generate_url: String,
}

impl OllamaGenerationClient {
    /// Build a client with the configured connect and request timeouts.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ChatConfig) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            generate_url: config.generate_url(),
        })
    }

    fn classify_send_error(err: &reqwest::Error) -> GenerationOutcome {
        if err.is_connect() {
            GenerationOutcome::ConnectionFailure
        } else {
            GenerationOutcome::UnknownFailure {
                description: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        let response = match self
            .client
            .post(&self.generate_url)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return Self::classify_send_error(&err),
        };

        let status = response.status();
        if !status.is_success() {
            return GenerationOutcome::BackendError {
                status: status.as_u16(),
            };
        }

        match response.json::<GenerateResponse>().await {
            Ok(GenerateResponse {
                response: Some(text),
            }) => GenerationOutcome::Success { text },
            Ok(GenerateResponse { response: None }) => {
                warn!("generation endpoint returned 200 without a response field");
                GenerationOutcome::Success {
                    text: EMPTY_RESPONSE_FALLBACK.to_string(),
                }
            }
            Err(err) => GenerationOutcome::UnknownFailure {
                description: err.to_string(),
            },
        }
    }
}
