//! Error types for scene loading and frame composition.

use thiserror::Error;

/// Result type for engine operations.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Fatal conditions. Everything else in the engine clamps instead of failing.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("texture `{texture}` for body `{body}` not found")]
    TextureNotFound { body: String, texture: String },

    #[error("transform stack unbalanced at frame end ({depth} model matrices still pushed)")]
    TransformStackImbalance { depth: usize },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
