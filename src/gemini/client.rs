use crate::config::GeminiConfig;
use crate::error::{NextChapterError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use url::Url;

use super::{CompletionClient, RetryPolicy};

/// Credential header. The endpoint URL must not carry the key: reqwest
/// errors include the request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Request body for `generateContent`
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response envelope from `generateContent`
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first part.
    fn into_first_text(self) -> Result<Option<String>> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(None);
        };

        candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(Some)
            .ok_or_else(|| {
                NextChapterError::MalformedEnvelope("first candidate has no text part".to_string())
            })
    }
}

/// Gemini completion client
///
/// Sends one prompt per call with a bounded wait, retrying transient
/// failures on the configured backoff schedule. Rate limiting (429) is
/// reported immediately.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key, sent in the `x-goog-api-key` header
    /// * `config` - endpoint, model, timeout and retry settings
    pub fn new(api_key: &str, config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        ))
        .map_err(|e| NextChapterError::Config(format!("Invalid Gemini endpoint: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            retry: RetryPolicy::new(config.max_attempts, config.retry_delays()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Make a single API request
    async fn send_once(&self, prompt: &str) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NextChapterError::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(NextChapterError::ServiceUnavailable(body));
            }
            return Err(NextChapterError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            NextChapterError::MalformedEnvelope(format!("Failed to parse response: {}", e))
        })?;

        envelope.into_first_text()
    }

    /// Send the prompt, retrying transient failures
    pub async fn complete_with_retry(&self, prompt: &str) -> Result<Option<String>> {
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.send_once(prompt).await {
                Ok(text) => {
                    log::debug!(
                        "Gemini call took {:?} (attempt {})",
                        start.elapsed(),
                        attempt
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && self.retry.can_retry(attempt) => {
                    let delay = self.retry.delay_after(attempt);
                    log::warn!(
                        "Retry {}/{} in {:?} after error: {}",
                        attempt,
                        self.retry.max_attempts - 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(NextChapterError::RateLimited) => {
                    log::warn!("Gemini rate limit hit on attempt {}, not retrying", attempt);
                    return Err(NextChapterError::RateLimited);
                }
                Err(e) => {
                    log::error!("Gemini request failed after {} attempt(s): {}", attempt, e);
                    return Err(NextChapterError::Communication(e.to_string()));
                }
            }
        }
    }
}

impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        self.complete_with_retry(prompt).await
    }
}
