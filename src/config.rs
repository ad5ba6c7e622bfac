use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::display::{OpacityMode, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};

/// Largest frame buffer side accepted
pub const MAX_DIMENSION: u32 = 16384;
/// Largest window pixels per buffer pixel accepted
pub const MAX_PIXEL_SCALE: u32 = 16;

/// Engine settings, persisted as JSON. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    /// Frame buffer resolution in pixels
    pub width: u32,
    pub height: u32,
    /// Window pixels per buffer pixel
    pub pixel_scale: u32,
    pub vsync: bool,
    pub show_fps: bool,
    /// `#RRGGBB`, applied at the start of every frame
    pub clear_color: String,
    /// Opacity mode the frame canvas starts in
    pub opacity_mode: OpacityMode,
}

impl EngineConfig {
    pub fn clear_color(&self) -> Color {
        Color::from_hex(&self.clear_color)
    }

    /// Reject sizes the engine can't allocate a buffer or window for
    pub fn validate(&self) -> Result<()> {
        let side_ok = |side: u32| (1..=MAX_DIMENSION).contains(&side);
        if side_ok(self.width)
            && side_ok(self.height)
            && (1..=MAX_PIXEL_SCALE).contains(&self.pixel_scale)
        {
            Ok(())
        } else {
            Err(Error::Resolution {
                width: self.width,
                height: self.height,
                scale: self.pixel_scale,
            })
        }
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "pixelforge".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_scale: 3,
            vsync: true,
            show_fps: false,
            clear_color: "#000000".to_string(),
            opacity_mode: OpacityMode::Normal,
        }
    }
}
