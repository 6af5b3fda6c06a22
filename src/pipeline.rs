//! One analysis run: seeds → raw answer → JSON → graph → document.
//!
//! Every failure is absorbed here and turned into a fixed user-facing message.

use crate::cache::{CachedRecommender, ResponseCache};
use crate::config::Config;
use crate::error::{NextChapterError, Result};
use crate::extract::extract_json;
use crate::gemini::{CompletionClient, GeminiClient};
use crate::graph::normalize;
use crate::prompt::SeedTitles;
use crate::render::{render_document, RenderOptions};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// A successfully rendered reading map.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedGraph {
    pub html: String,
    pub nodes: usize,
    pub edges: usize,
    pub seeds: usize,
}

/// Why an analysis produced no graph, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    /// The API answered 429
    RateLimited,
    /// Retries exhausted; carries the underlying detail
    Communication(String),
    /// No candidates, or no JSON recoverable from the answer
    NoResponse,
    /// Graph parsed but has no edges
    NoConnections,
    /// The answer was not graph-shaped, or the renderer refused it
    VisualizationFailed,
}

impl AnalysisFailure {
    /// Stable machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisFailure::RateLimited => "rate_limited",
            AnalysisFailure::Communication(_) => "communication",
            AnalysisFailure::NoResponse => "no_response",
            AnalysisFailure::NoConnections => "no_connections",
            AnalysisFailure::VisualizationFailed => "visualization_failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            AnalysisFailure::RateLimited => {
                "API rate limit exceeded (429). Please wait a moment and try again.".to_string()
            }
            AnalysisFailure::Communication(detail) => format!("Communication error: {}", detail),
            AnalysisFailure::NoResponse => {
                "No response from AI. Please wait a moment and try again.".to_string()
            }
            AnalysisFailure::NoConnections => {
                "The AI could not generate connections between books. Please try again."
                    .to_string()
            }
            AnalysisFailure::VisualizationFailed => "Failed to generate visualization.".to_string(),
        }
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of one analysis run.
pub type AnalysisOutcome = std::result::Result<RenderedGraph, AnalysisFailure>;

/// Runs the five stages for one set of seed titles.
pub struct Analyzer<C> {
    recommender: CachedRecommender<C>,
    render_options: RenderOptions,
}

impl Analyzer<GeminiClient> {
    /// Build the production analyzer: Gemini client behind the result cache.
    pub fn from_config(config: &Config, api_key: &str) -> Result<Self> {
        let client = GeminiClient::new(api_key, &config.gemini)?;
        let cache = Arc::new(ResponseCache::new(config.cache.capacity, config.cache.ttl_secs));

        Ok(Analyzer::new(
            CachedRecommender::new(client, Some(cache)),
            config.render.options(),
        ))
    }
}

impl<C: CompletionClient> Analyzer<C> {
    pub fn new(recommender: CachedRecommender<C>, render_options: RenderOptions) -> Self {
        Self {
            recommender,
            render_options,
        }
    }

    /// Run the whole pipeline. Never fails; failures come back as
    /// `AnalysisFailure` values.
    pub async fn analyze(&self, titles: &SeedTitles) -> AnalysisOutcome {
        let start = Instant::now();
        log::info!("Analyzing seeds: {}", titles);

        let text = match self.recommender.fetch(titles).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::warn!("Model returned no candidates");
                return Err(AnalysisFailure::NoResponse);
            }
            Err(NextChapterError::RateLimited) => return Err(AnalysisFailure::RateLimited),
            Err(NextChapterError::Communication(detail)) => {
                return Err(AnalysisFailure::Communication(detail))
            }
            Err(e) => return Err(AnalysisFailure::Communication(e.to_string())),
        };

        let Some(value) = extract_json(&text) else {
            log::warn!("No JSON recoverable from model answer");
            self.recommender.forget(titles);
            return Err(AnalysisFailure::NoResponse);
        };

        let graph = match normalize(&value) {
            Ok(graph) => graph,
            Err(e) => {
                log::error!("Model answer is not a graph: {}", e);
                self.recommender.forget(titles);
                return Err(AnalysisFailure::VisualizationFailed);
            }
        };

        if !graph.has_edges() {
            log::warn!("Graph has {} node(s) but no edges", graph.nodes.len());
            self.recommender.forget(titles);
            return Err(AnalysisFailure::NoConnections);
        }

        if graph.seed_count() != 3 {
            log::debug!("Expected 3 seed nodes, model returned {}", graph.seed_count());
        }

        let html = match render_document(&graph, &self.render_options) {
            Ok(html) => html,
            Err(e) => {
                log::error!("Rendering failed: {}", e);
                self.recommender.forget(titles);
                return Err(AnalysisFailure::VisualizationFailed);
            }
        };

        log::info!(
            "Rendered {} nodes and {} edges in {:?}",
            graph.nodes.len(),
            graph.edges.len(),
            start.elapsed()
        );

        Ok(RenderedGraph {
            html,
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            seeds: graph.seed_count(),
        })
    }
}
