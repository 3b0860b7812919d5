//! Carousel configuration, loaded from RON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::*;
use crate::tween::Easing;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("the carousel needs at least one item")]
    NoItems,
    #[error("item '{0}' has a non-positive size")]
    BadSize(String),
    #[error("{0} must be a positive duration")]
    BadDuration(&'static str),
    #[error("window size {0}x{1} is not usable")]
    BadWindow(i32, i32),
}

/// One sprite in the ring. Order in the config defines the ring index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub sprite: PathBuf,
    pub size: [f32; 2],
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripConfig {
    pub sprite: PathBuf,
    pub size: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTimings {
    /// Outgoing and incoming slide / fade duration, seconds
    pub phase: f32,
    /// Background color cross-fade, seconds
    pub color_fade: f32,
    /// Vertical scale of the strip during the outgoing phase
    pub strip_stretch: f32,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            phase: PHASE_DURATION,
            color_fade: COLOR_FADE_DURATION,
            strip_stretch: STRIP_STRETCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub assets: PathBuf,
    pub window: (i32, i32),
    pub fps: u32,
    pub easing: Easing,
    pub timings: TransitionTimings,
    pub strip: StripConfig,
    pub items: Vec<ItemConfig>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let item = |name: &str, color: [u8; 3]| ItemConfig {
            name: name.to_string(),
            sprite: PathBuf::from(format!("{}.png", name)),
            size: [140.0, 80.0],
            color,
        };

        Self {
            assets: PathBuf::from("assets"),
            window: (WINDOW_WIDTH, WINDOW_HEIGHT),
            fps: FPS,
            easing: Easing::CircularInOut,
            timings: TransitionTimings::default(),
            strip: StripConfig {
                sprite: PathBuf::from("LongShape.png"),
                size: [90.0, 30.0],
            },
            items: vec![
                item("Cube", [228, 215, 146]),
                item("Cone", [225, 187, 171]),
                item("Torus", [176, 212, 206]),
                item("Sphere", [218, 160, 152]),
                item("Dollos", [136, 163, 146]),
            ],
        }
    }
}

impl CarouselConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_ron(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let config: CarouselConfig = ron::from_str(content).context("Failed to parse RON config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize config to RON")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items.is_empty() {
            return Err(ConfigError::NoItems);
        }
        if let Some(item) = self.items.iter().find(|i| i.size[0] <= 0.0 || i.size[1] <= 0.0) {
            return Err(ConfigError::BadSize(item.name.clone()));
        }
        if self.strip.size[0] <= 0.0 || self.strip.size[1] <= 0.0 {
            return Err(ConfigError::BadSize("strip".to_string()));
        }
        if self.timings.phase <= 0.0 {
            return Err(ConfigError::BadDuration("timings.phase"));
        }
        if self.timings.color_fade <= 0.0 {
            return Err(ConfigError::BadDuration("timings.color_fade"));
        }
        if self.window.0 <= 0 || self.window.1 <= 0 {
            return Err(ConfigError::BadWindow(self.window.0, self.window.1));
        }
        Ok(())
    }

    pub fn sprite_path(&self, sprite: &Path) -> PathBuf {
        self.assets.join(sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_showcase() {
        let config = CarouselConfig::default();
        assert!(config.validate().is_ok());
        let names: Vec<&str> = config.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Cube", "Cone", "Torus", "Sphere", "Dollos"]);
        assert_eq!(config.items[0].color, [228, 215, 146]);
        assert_eq!(config.items[4].color, [136, 163, 146]);
        assert_eq!(config.timings.phase, 1.0);
        assert_eq!(config.timings.color_fade, 1.5);
        assert_eq!(config.sprite_path(&config.items[2].sprite), PathBuf::from("assets/Torus.png"));
    }

    #[test]
    fn partial_ron_falls_back_to_defaults() {
        let config = CarouselConfig::from_ron("(fps: 30, timings: (color_fade: 2.0))").unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.timings.color_fade, 2.0);
        assert_eq!(config.timings.phase, 1.0);
        assert_eq!(config.items.len(), 5);
    }

    #[test]
    fn dumped_config_parses_back() {
        let config = CarouselConfig::default();
        let ron = config.to_ron().unwrap();
        assert!(ron.contains("Dollos"));
        assert_eq!(CarouselConfig::from_ron(&ron).unwrap(), config);
    }

    #[test]
    fn validation_rejects_broken_configs() {
        let mut config = CarouselConfig::default();
        config.items.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoItems));

        let mut config = CarouselConfig::default();
        config.items[1].size = [0.0, 80.0];
        assert_eq!(config.validate(), Err(ConfigError::BadSize("Cone".to_string())));

        let mut config = CarouselConfig::default();
        config.timings.color_fade = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::BadDuration("timings.color_fade")));

        assert!(CarouselConfig::from_ron("(items: [])").is_err());
    }
}
