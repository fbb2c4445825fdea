// SPDX-License-Identifier: GPL-3.0-only

use crate::app::CameraMode;
use crate::backends::camera::types::{FacingMode, Resolution};
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inbound configuration of a camera session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raster width used when the track does not report one
    pub width: u32,
    /// Raster height used when the track does not report one
    pub height: u32,
    /// MIME type of captured images (e.g. "image/png", "image/jpeg")
    pub image_type: String,
    /// Encoder quality between 0 and 1 (JPEG only)
    pub image_quality: f32,
    /// Start the stream as soon as cameras are enumerated
    pub autoplay: bool,
    /// Advisory image limit, 0 for unlimited
    pub max_images: usize,
    /// Facing mode requested on first start
    pub facing_mode: FacingMode,
    /// Resolution hint requested on first start
    pub resolution: Resolution,
    /// Frame rate hint
    pub frame_rate: u32,
    /// Photo capture only, or continuous QR scanning
    pub mode: CameraMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            image_type: defaults::IMAGE_TYPE.to_string(),
            image_quality: defaults::IMAGE_QUALITY,
            autoplay: false,
            max_images: defaults::MAX_IMAGES,
            facing_mode: FacingMode::default(),
            resolution: defaults::RESOLUTION,
            frame_rate: defaults::FRAME_RATE,
            mode: CameraMode::default(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/camera-session/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("camera-session").join("config.json"))
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> AppResult<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "Loading configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> AppResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Reject values no session can work with
    pub fn validate(&self) -> AppResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "fallback size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frame_rate == 0 {
            return Err(AppError::Config("frame rate must be positive".to_string()));
        }
        if !self.image_quality.is_finite() {
            return Err(AppError::Config("image quality must be a number".to_string()));
        }
        Ok(())
    }

    /// Fallback raster size
    pub fn fallback_size(&self) -> Resolution {
        Resolution::new(self.width, self.height).unwrap_or(defaults::RESOLUTION)
    }

    /// Quality clamped into 0..=1
    pub fn clamped_quality(&self) -> f32 {
        self.image_quality.clamp(0.0, 1.0)
    }
}
