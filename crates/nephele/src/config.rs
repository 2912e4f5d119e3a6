//! # Scene Documents
//!
//! One TOML file describes one dressed stage: the observer frustum, the
//! root seed, and a section per effect. Absent sections leave that
//! effect unmounted; present sections fill unnamed fields from the
//! effect's defaults.

use nephele_effects::{
    BlinkTimerConfig, BubbleDriftConfig, DustFieldConfig, GodRayBeamConfig, ObserverConfig,
    SteamRibbonConfig, WindSwayConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::StageResult;

/// Root seed used when a scene document does not name one.
///
/// Kept below `i64::MAX` so the document stays representable as a TOML
/// integer.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE_D057_B007;

/// A complete scene document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Root seed every effect derives its random streams from.
    pub seed: u64,
    /// Frustum of the fixed observer the scene is staged for.
    pub observer: ObserverConfig,
    /// Drifting dust particle field.
    pub dust: Option<DustFieldConfig>,
    /// Scrolling steam ribbon.
    pub steam: Option<SteamRibbonConfig>,
    /// Pulsing light beam quad.
    pub god_ray: Option<GodRayBeamConfig>,
    /// Wind sway orientation channel.
    pub wind: Option<WindSwayConfig>,
    /// Bubble drift position channel.
    pub drift: Option<BubbleDriftConfig>,
    /// Sleep and wake blink timer.
    pub blink: Option<BlinkTimerConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            observer: ObserverConfig::default(),
            dust: None,
            steam: None,
            god_ray: None,
            wind: None,
            drift: None,
            blink: None,
        }
    }
}

impl SceneConfig {
    /// A scene with every effect mounted at its defaults.
    ///
    /// Used by the demo binary and the integration tests; production
    /// hosts load a document instead.
    #[must_use]
    pub fn showcase() -> Self {
        Self {
            dust: Some(DustFieldConfig::default()),
            steam: Some(SteamRibbonConfig::default()),
            god_ray: Some(GodRayBeamConfig::default()),
            wind: Some(WindSwayConfig::default()),
            drift: Some(BubbleDriftConfig::default()),
            blink: Some(BlinkTimerConfig::default()),
            ..Self::default()
        }
    }

    /// Parses a scene document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StageError::Parse`] when the text is not valid
    /// TOML or a field has the wrong type.
    pub fn from_toml_str(text: &str) -> StageResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Renders the scene back out as a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StageError::Serialize`] when a value cannot be
    /// represented in TOML, such as a seed above `i64::MAX`.
    pub fn to_toml_string(&self) -> StageResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of effect sections present in this scene.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        usize::from(self.dust.is_some())
            + usize::from(self.steam.is_some())
            + usize::from(self.god_ray.is_some())
            + usize::from(self.wind.is_some())
            + usize::from(self.drift.is_some())
            + usize::from(self.blink.is_some())
    }
}
