//! Title triple in, raw model answer out, with an optional result cache.

use crate::error::Result;
use crate::gemini::CompletionClient;
use crate::prompt::{build_prompt, SeedTitles};
use std::sync::Arc;

/// Wraps a completion client so repeated identical requests within the
/// cache's freshness window reuse the earlier answer.
///
/// Only successful answers are cached. Failures and empty responses always
/// go back to the client on the next request. Callers that reject a cached
/// answer downstream use [`CachedRecommender::forget`].
pub struct CachedRecommender<C> {
    client: C,
    cache: Option<Arc<super::ResponseCache>>,
}

impl<C: CompletionClient> CachedRecommender<C> {
    pub fn new(client: C, cache: Option<Arc<super::ResponseCache>>) -> Self {
        Self { client, cache }
    }

    /// Fetch the raw answer for these seeds.
    ///
    /// Checks the cache first, then builds the prompt and calls the client.
    pub async fn fetch(&self, titles: &SeedTitles) -> Result<Option<String>> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(titles) {
                log::debug!("Cache hit for seeds: {}", titles);
                return Ok(Some(cached));
            }
        }

        let prompt = build_prompt(titles);
        let answer = self.client.complete(&prompt).await?;

        if let (Some(cache), Some(text)) = (&self.cache, &answer) {
            cache.put(titles.clone(), text.clone());
        }

        Ok(answer)
    }

    /// Discard the cached answer for these seeds so the next fetch asks
    /// the client again.
    pub fn forget(&self, titles: &SeedTitles) {
        if let Some(cache) = &self.cache {
            if cache.remove(titles) {
                log::debug!("Dropped cached answer for seeds: {}", titles);
            }
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::error::NextChapterError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted client that counts calls and records prompts.
    struct ScriptedClient {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        answer: fn() -> Result<Option<String>>,
    }

    impl ScriptedClient {
        fn new(answer: fn() -> Result<Option<String>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                answer,
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        async fn complete(&self, prompt: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.answer)()
        }
    }

    fn seeds() -> SeedTitles {
        SeedTitles::new("Dune", "Solaris", "Hyperion").unwrap()
    }

    fn cache() -> Option<Arc<ResponseCache>> {
        Some(Arc::new(ResponseCache::new(16, 3600)))
    }

    #[tokio::test]
    async fn test_fetch_sends_built_prompt() {
        let recommender = CachedRecommender::new(
            ScriptedClient::new(|| Ok(Some("answer".to_string()))),
            None,
        );

        let answer = recommender.fetch(&seeds()).await.unwrap();
        assert_eq!(answer.as_deref(), Some("answer"));

        let prompts = recommender.client().prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), &[build_prompt(&seeds())]);
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let recommender = CachedRecommender::new(
            ScriptedClient::new(|| Ok(Some("answer".to_string()))),
            cache(),
        );

        recommender.fetch(&seeds()).await.unwrap();
        let second = recommender.fetch(&seeds()).await.unwrap();

        assert_eq!(second.as_deref(), Some("answer"));
        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_order_is_a_cache_miss() {
        let recommender = CachedRecommender::new(
            ScriptedClient::new(|| Ok(Some("answer".to_string()))),
            cache(),
        );

        recommender.fetch(&seeds()).await.unwrap();
        let reordered = SeedTitles::new("Solaris", "Dune", "Hyperion").unwrap();
        recommender.fetch(&reordered).await.unwrap();

        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let recommender = CachedRecommender::new(
            ScriptedClient::new(|| Err(NextChapterError::RateLimited)),
            cache(),
        );

        assert!(recommender.fetch(&seeds()).await.is_err());
        assert!(recommender.fetch(&seeds()).await.is_err());
        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_answers_are_not_cached() {
        let recommender = CachedRecommender::new(ScriptedClient::new(|| Ok(None)), cache());

        assert!(recommender.fetch(&seeds()).await.unwrap().is_none());
        assert!(recommender.fetch(&seeds()).await.unwrap().is_none());
        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_forces_refetch() {
        let recommender = CachedRecommender::new(
            ScriptedClient::new(|| Ok(Some("answer".to_string()))),
            cache(),
        );

        recommender.fetch(&seeds()).await.unwrap();
        recommender.forget(&seeds());
        recommender.fetch(&seeds()).await.unwrap();

        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_forget_without_cache_is_noop() {
        let recommender = CachedRecommender::new(ScriptedClient::new(|| Ok(None)), None);
        recommender.forget(&seeds());
        assert_eq!(recommender.client().calls.load(Ordering::SeqCst), 0);
    }
}
