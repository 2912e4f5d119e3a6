//! # NEPHELE
//!
//! The main atmosphere crate, integrating all layers.
//!
//! ## Architecture (The Three Layers)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       NEPHELE ATMOSPHERE STACK                      │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌─────────────────┐  │
//! │  │   LAYER 1        │   │   LAYER 2        │   │   LAYER 3       │  │
//! │  │   Foundations    │──>│   Procedural     │──>│   Effects       │  │
//! │  │                  │   │                  │   │                 │  │
//! │  │  • Vectors       │   │  • EffectSeed    │   │  • Dust Field   │  │
//! │  │  • Colors        │   │  • GradientNoise │   │  • Steam Ribbon │  │
//! │  │  • Curves        │   │                  │   │  • God Ray      │  │
//! │  └──────────────────┘   └──────────────────┘   │  • Wind / Drift │  │
//! │                                                │  • Blink Timer  │  │
//! │                                                └────────┬────────┘  │
//! │                                                         │           │
//! │                          ┌──────────────────┐           │           │
//! │                          │   THE STAGE      │<──────────┘           │
//! │                          │                  │                       │
//! │                          │  • Scene files   │                       │
//! │                          │  • Shared clock  │                       │
//! │                          │  • Teardown      │                       │
//! │                          └──────────────────┘                       │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML scene documents
//! - `error`: Stage assembly errors
//! - `stage`: Frame orchestration and teardown

pub mod config;
pub mod error;
pub mod stage;

// Re-export the layers
pub use nephele_effects as effects;
pub use nephele_procedural as procedural;
pub use nephele_shared as shared;

// Re-export commonly used types
pub use config::{SceneConfig, DEFAULT_SEED};
pub use error::{StageError, StageResult};
pub use stage::{Stage, StageStats};
