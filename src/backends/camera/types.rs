// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Kind of a media device reported by enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Camera
    VideoInput,
    /// Microphone
    AudioInput,
    /// Speaker or headset
    AudioOutput,
}

/// A device as reported by one enumeration pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDescriptor {
    /// Platform device identifier
    pub id: String,
    /// Device kind; only `VideoInput` entries are usable as cameras
    pub kind: DeviceKind,
    /// Opaque human-readable label (may be empty before permission is granted)
    pub label: String,
}

impl CameraDescriptor {
    /// Describe a video input device
    pub fn video_input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DeviceKind::VideoInput,
            label: label.into(),
        }
    }

    /// Whether this device can be used as a camera
    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }
}

/// Which physical direction a camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Selfie camera
    User,
    /// Rear camera
    #[default]
    Environment,
}

impl FacingMode {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    /// User-facing frames are shown and captured mirrored
    pub fn is_mirrored(self) -> bool {
        self == FacingMode::User
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::User => write!(f, "user"),
            FacingMode::Environment => write!(f, "environment"),
        }
    }
}

impl std::str::FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(FacingMode::User),
            "environment" => Ok(FacingMode::Environment),
            other => Err(format!("unknown facing mode '{}'", other)),
        }
    }
}

/// Frame size in pixels; both sides are always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawResolution", into = "RawResolution")]
pub struct Resolution {
    width: u32,
    height: u32,
}

#[derive(Serialize, Deserialize)]
struct RawResolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Create a resolution, rejecting zero-sized sides
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Catalog entries are known to be positive
    pub(crate) const fn from_catalog(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Same area with width and height exchanged
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Number of bytes an RGBA raster of this size occupies
    pub fn rgba_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl TryFrom<RawResolution> for Resolution {
    type Error = String;

    fn try_from(raw: RawResolution) -> Result<Self, Self::Error> {
        Resolution::new(raw.width, raw.height)
            .ok_or_else(|| format!("invalid resolution {}x{}", raw.width, raw.height))
    }
}

impl From<Resolution> for RawResolution {
    fn from(res: Resolution) -> Self {
        Self {
            width: res.width,
            height: res.height,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
        let height = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
        Resolution::new(width, height).ok_or_else(|| format!("invalid resolution '{}'", s))
    }
}

/// Parameters of one stream request
///
/// Width, height and frame rate are hints: the platform may negotiate
/// different values, which are reported back through [`TrackSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Specific camera to open, if one was chosen
    pub device_id: Option<String>,
    /// Facing-mode hint, used when no device is chosen
    pub facing_mode: FacingMode,
    pub width_hint: u32,
    pub height_hint: u32,
    pub frame_rate_hint: u32,
}

/// Values the active track actually negotiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<u32>,
}

/// Capabilities reported by the active track
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackCapabilities {
    /// Facing modes the track reports, most relevant first
    pub facing_modes: Vec<FacingMode>,
    /// Whether the torch constraint is supported
    pub torch: bool,
}

/// Capability snapshot derived once per acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamCapability {
    pub torch_supported: bool,
}

impl From<&TrackCapabilities> for StreamCapability {
    fn from(caps: &TrackCapabilities) -> Self {
        Self {
            torch_supported: caps.torch,
        }
    }
}

/// A single RGBA video frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (`width * height * 4` bytes)
    pub data: Arc<[u8]>,
    /// When the frame was produced
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap tightly packed RGBA data
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            captured_at: Instant::now(),
        }
    }

    /// Whether the data length matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * 4
    }
}
