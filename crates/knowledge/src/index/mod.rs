//! Similarity index abstraction.
//!
//! The index is built elsewhere; this crate only reads from it.

pub mod lance;

pub use lance::LanceDbIndex;

use crate::types::ScoredPassage;
use grounded_core::AppResult;

/// Trait for nearest-neighbour passage lookup.
///
/// Implementations must:
/// - Return at most `k` passages
/// - Order results by ascending raw distance (closest first)
/// - Be safe to query concurrently
#[async_trait::async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Find up to `k` passages closest to `query`, with their raw distances.
    async fn search_with_scores(&self, query: &str, k: usize) -> AppResult<Vec<ScoredPassage>>;
}
