//! Effect configuration.
//!
//! An [`EffectConfig`] is supplied once when a [`Field`](crate::Field) is built
//! and never changes afterwards. Every option has a default, so a config can be
//! assembled with the `with_*` builder methods or loaded from a JSON document in
//! which every key is optional:
//!
//! ```ignore
//! use pixeldust::prelude::*;
//!
//! let config = EffectConfig::new()
//!     .with_particle_spacing(3)
//!     .with_gap(0.01)
//!     .with_brightness(2.0)
//!     .with_vibrate(Vibrate { chance: 0.1, velocity: 0.2 });
//!
//! let same = EffectConfig::from_json_str(r#"{
//!     "psize": 3, "gap": 0.01, "brightness": 2,
//!     "vibrate": { "chance": 0.1, "velocity": 0.2 }
//! }"#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Random jitter applied to resting particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vibrate {
    /// Probability per update step that jitter is considered, in `[0, 1]`.
    pub chance: f32,
    /// Width of the uniform jitter band, centered on zero.
    pub velocity: f32,
}

/// Resolved configuration for a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    /// Fraction of each cell left blank around the block.
    pub gap: f32,
    /// Grid stride in pixels, also the base block size.
    #[serde(alias = "psize")]
    pub particle_spacing: u32,
    /// Fixed RGB color for every particle, overriding sampled colors.
    pub color: Option<[u8; 3]>,
    /// Pointer repulsion radius, in squared-distance units.
    #[serde(alias = "radius")]
    pub influence_radius: f32,
    /// Multiplier applied to sampled RGB channels.
    pub brightness: f32,
    /// Optional jitter for resting particles.
    pub vibrate: Option<Vibrate>,
    /// Random range added on top of the base elasticity.
    pub ease: f32,
    /// Scale factor used when drawing the source image.
    pub scale: f32,
    /// Seed for the field's random source. Entropy is used when unset.
    pub seed: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            gap: 0.0,
            particle_spacing: 5,
            color: None,
            influence_radius: 20_000.0,
            brightness: 1.0,
            vibrate: None,
            ease: 0.1,
            scale: 1.0,
            seed: None,
        }
    }
}

impl EffectConfig {
    /// Create a config with every option at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON string. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_particle_spacing(mut self, spacing: u32) -> Self {
        self.particle_spacing = spacing;
        self
    }

    pub fn with_color(mut self, rgb: [u8; 3]) -> Self {
        self.color = Some(rgb);
        self
    }

    pub fn with_influence_radius(mut self, radius: f32) -> Self {
        self.influence_radius = radius;
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_vibrate(mut self, vibrate: Vibrate) -> Self {
        self.vibrate = Some(vibrate);
        self
    }

    pub fn with_ease(mut self, ease: f32) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Seed the random source so particle trajectories are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Edge length of a rendered block: `floor(spacing * (1 - gap))`.
    pub fn block_size(&self) -> u32 {
        (self.particle_spacing as f32 * (1.0 - self.gap)).floor() as u32
    }

    /// Check that every option is inside its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_spacing == 0 {
            return Err(ConfigError::invalid("particle_spacing", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.gap) {
            return Err(ConfigError::invalid("gap", format!("{} is not in [0, 1)", self.gap)));
        }
        non_negative("influence_radius", self.influence_radius)?;
        non_negative("brightness", self.brightness)?;
        non_negative("ease", self.ease)?;
        non_negative("scale", self.scale)?;

        if let Some(vibrate) = &self.vibrate {
            if !(0.0..=1.0).contains(&vibrate.chance) {
                return Err(ConfigError::invalid(
                    "vibrate.chance",
                    format!("{} is not in [0, 1]", vibrate.chance),
                ));
            }
            non_negative("vibrate.velocity", vibrate.velocity)?;
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and >= 0")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EffectConfig::default();
        assert_eq!(config.gap, 0.0);
        assert_eq!(config.particle_spacing, 5);
        assert_eq!(config.color, None);
        assert_eq!(config.influence_radius, 20_000.0);
        assert_eq!(config.brightness, 1.0);
        assert_eq!(config.vibrate, None);
        assert_eq!(config.ease, 0.1);
        assert_eq!(config.scale, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_block_size() {
        assert_eq!(EffectConfig::new().block_size(), 5);
        assert_eq!(EffectConfig::new().with_particle_spacing(3).with_gap(0.01).block_size(), 2);
        assert_eq!(EffectConfig::new().with_particle_spacing(10).with_gap(0.5).block_size(), 5);
    }

    #[test]
    fn test_json_uses_defaults_and_aliases() {
        let config = EffectConfig::from_json_str(
            r#"{ "psize": 3, "radius": 500, "vibrate": { "chance": 0.1, "velocity": 0.2 } }"#,
        )
        .unwrap();
        assert_eq!(config.particle_spacing, 3);
        assert_eq!(config.influence_radius, 500.0);
        assert_eq!(config.vibrate, Some(Vibrate { chance: 0.1, velocity: 0.2 }));
        assert_eq!(config.ease, 0.1);
    }

    #[test]
    fn test_json_rejects_unknown_keys() {
        assert!(matches!(
            EffectConfig::from_json_str(r#"{ "sparkle": true }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(EffectConfig::new().with_particle_spacing(0).validate().is_err());
        assert!(EffectConfig::new().with_gap(1.0).validate().is_err());
        assert!(EffectConfig::new().with_brightness(-1.0).validate().is_err());
        assert!(EffectConfig::new().with_scale(f32::NAN).validate().is_err());
        assert!(EffectConfig::new()
            .with_vibrate(Vibrate { chance: 1.5, velocity: 0.2 })
            .validate()
            .is_err());
    }
}
