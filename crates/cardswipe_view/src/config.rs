//! Swipeable view configuration (`cardswipe.toml`)
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes:
//!
//! ```toml
//! swipe_duration_ms = 350
//! bottom_card_scale = 0.9
//! curve = { preset = "ease_out_cubic" }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use cardswipe_animation::EaseCurve;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Animation tuning shared by every card of a view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeableViewConfig {
    /// Length of the commit and snap-back animations
    pub swipe_duration_ms: u32,
    /// Scale of the card waiting behind the front card
    pub bottom_card_scale: f32,
    /// Tilt in degrees reached when a card is dragged half its width
    pub max_inclination_angle: i32,
    /// Shapes card motion and the back card's growth
    pub curve: EaseCurve,
}

impl Default for SwipeableViewConfig {
    fn default() -> Self {
        Self {
            swipe_duration_ms: 280,
            bottom_card_scale: 0.92,
            max_inclination_angle: 10,
            curve: EaseCurve::default(),
        }
    }
}

impl SwipeableViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the commit/snap-back duration
    pub fn swipe_duration_ms(mut self, ms: u32) -> Self {
        self.swipe_duration_ms = ms;
        self
    }

    /// Set the back card scale
    pub fn bottom_card_scale(mut self, scale: f32) -> Self {
        self.bottom_card_scale = scale;
        self
    }

    /// Set the maximum tilt in degrees
    pub fn max_inclination_angle(mut self, degrees: i32) -> Self {
        self.max_inclination_angle = degrees;
        self
    }

    /// Set the ease curve
    pub fn curve(mut self, curve: impl Into<EaseCurve>) -> Self {
        self.curve = curve.into();
        self
    }

    pub fn swipe_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.swipe_duration_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bottom_card_scale.is_finite() || self.bottom_card_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bottom_card_scale must be a positive number, got {}",
                self.bottom_card_scale
            )));
        }
        if !(-90..=90).contains(&self.max_inclination_angle) {
            return Err(ConfigError::Invalid(format!(
                "max_inclination_angle must be within [-90, 90], got {}",
                self.max_inclination_angle
            )));
        }
        self.curve.validate()?;
        Ok(())
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SwipeableViewConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("loaded view config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Size of the surface the stack is shown on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Distance a committed card travels from neutral
    pub fn short_side(&self) -> f32 {
        self.width.min(self.height)
    }
}
