//! Query embedding providers.
//!
//! The index stores vectors produced by some embedding model; queries must be
//! embedded by the same model before a nearest-neighbour search.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
