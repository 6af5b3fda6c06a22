pub mod recommender;
pub mod response_cache;

pub use recommender::CachedRecommender;
pub use response_cache::ResponseCache;
