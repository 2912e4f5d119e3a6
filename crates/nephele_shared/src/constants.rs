//! # Shared Tuning Constants
//!
//! Values every crate in the stack agrees on.
//!
//! **CRITICAL:** Scene files are authored against these defaults.
//! Changes reshuffle every shipped scene.

// =============================================================================
// CLOCK CONFIGURATION
// =============================================================================

/// Updates per second the host is expected to drive
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at [`TICK_RATE`]
pub const TICK_SECONDS: f32 = 1.0 / 60.0;

// =============================================================================
// VIEWPORT CONVENTIONS
// =============================================================================

/// Lower edge of normalized viewport space, inclusive
pub const VIEWPORT_MIN: f32 = 0.0;

/// Upper edge of normalized viewport space, inclusive
pub const VIEWPORT_MAX: f32 = 1.0;
