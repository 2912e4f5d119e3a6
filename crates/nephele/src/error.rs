//! # Stage Error Types
//!
//! All errors that can occur while loading a scene document or
//! assembling a stage from it. Once a stage is built, ticking it
//! never fails.

use nephele_effects::EffectError;
use thiserror::Error;

/// Errors that can occur while building a stage.
#[derive(Error, Debug)]
pub enum StageError {
    /// The scene document is not valid TOML or has mistyped fields.
    #[error("scene document rejected: {0}")]
    Parse(#[from] toml::de::Error),

    /// The scene could not be written back out as TOML.
    #[error("scene document serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An effect section was well formed TOML but semantically invalid.
    #[error("effect rejected: {0}")]
    Effect(#[from] EffectError),
}

/// Result type for stage assembly.
pub type StageResult<T> = Result<T, StageError>;
