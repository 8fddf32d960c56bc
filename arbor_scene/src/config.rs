// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Color;

/// Largest surface side the engine will allocate, in pixels.
pub const DEFAULT_MAX_SURFACE_EXTENT: u32 = 8192;

/// Display and drawing settings for a [`Scene`](crate::Scene).
///
/// Every field has a default, so a partial JSON object is accepted:
///
/// ```rust
/// use arbor_scene::EngineConfig;
///
/// let config = EngineConfig::from_json(
///     r#"{ "display_width": 1280, "display_height": 720, "entry_scene": "Menu" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.display_width, 1280);
/// assert_eq!(config.entry_scene.as_deref(), Some("Menu"));
/// assert_eq!(config.max_surface_extent, 8192);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Screen width in pixels.
    pub display_width: u32,
    /// Screen height in pixels.
    pub display_height: u32,
    /// Name of the scene a host should open first; queued as the first
    /// [`SceneRequest`](crate::SceneRequest) of a new [`Scene`](crate::Scene).
    pub entry_scene: Option<String>,
    /// Color under every repainted area; `None` leaves the screen as is.
    pub background: Option<Color>,
    /// Surface sizes are clamped to this extent on each side.
    pub max_surface_extent: u32,
    /// Fill used for nodes whose update or paint failed.
    pub placeholder: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_width: 800,
            display_height: 600,
            entry_scene: None,
            background: Some(Color::BLACK),
            max_surface_extent: DEFAULT_MAX_SURFACE_EXTENT,
            placeholder: Color::PLACEHOLDER,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        if self.max_surface_extent == 0 {
            return Err(ConfigError::Invalid(
                "max_surface_extent must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use crate::error::ConfigError;
    use crate::types::Color;

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn colors_parse_with_optional_alpha() {
        let config =
            EngineConfig::from_json(r#"{ "background": { "r": 20, "g": 20, "b": 24 } }"#).unwrap();
        assert_eq!(config.background, Some(Color::rgb(20, 20, 24)));
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "display_width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "display_width": "wide" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
