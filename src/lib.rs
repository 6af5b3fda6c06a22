pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod graph;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod web;

pub use config::Config;
pub use error::{NextChapterError, Result};
pub use graph::{normalize, BookGraph, Edge, Group, Node};
pub use pipeline::{AnalysisFailure, AnalysisOutcome, Analyzer, RenderedGraph};
pub use prompt::{build_prompt, SeedTitles};
