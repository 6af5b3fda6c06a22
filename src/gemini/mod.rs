//! Remote completion client for the Gemini `generateContent` endpoint.

mod client;
mod retry;

pub use client::GeminiClient;
pub use retry::RetryPolicy;

use crate::error::Result;
use std::future::Future;

/// One completion: instruction text in, the model's raw answer out.
///
/// `Ok(None)` means the provider answered but produced no candidates, which
/// callers treat as "no data" rather than as a transport failure.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}
