// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use crate::backends::camera::types::Resolution;

/// Named resolution catalog
///
/// A pure lookup table: every entry is passed around by value.
pub mod resolutions {
    use super::Resolution;

    pub const VGA: Resolution = Resolution::from_catalog(640, 480);
    pub const HD_720: Resolution = Resolution::from_catalog(1280, 720);
    pub const FULL_HD: Resolution = Resolution::from_catalog(1920, 1080);
    pub const QHD: Resolution = Resolution::from_catalog(2560, 1440);
    pub const UHD_4K: Resolution = Resolution::from_catalog(3840, 2160);
    pub const DCI_4K: Resolution = Resolution::from_catalog(4096, 2160);

    /// Every catalog entry, smallest first
    pub const ALL: [(&str, Resolution); 6] = [
        ("640x480", VGA),
        ("1280x720", HD_720),
        ("1920x1080", FULL_HD),
        ("2560x1440", QHD),
        ("3840x2160", UHD_4K),
        ("4096x2160", DCI_4K),
    ];

    /// Cheapest entry to decode; used while scanning
    pub const SMALLEST: Resolution = VGA;

    /// Look up a catalog entry by name, e.g. `"1920x1080"`
    pub fn named(name: &str) -> Option<Resolution> {
        ALL.iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name.trim()))
            .map(|(_, res)| *res)
    }
}

/// Frame rate hints in frames per second
pub mod frame_rates {
    pub const LOW: u32 = 15;
    pub const STANDARD: u32 = 30;
    pub const HIGH: u32 = 60;

    pub const ALL: [u32; 3] = [LOW, STANDARD, HIGH];
}

/// Default values for inbound configuration
pub mod defaults {
    use super::Resolution;
    use super::resolutions;

    /// Fallback raster width when the track does not report one
    pub const WIDTH: u32 = 320;
    /// Fallback raster height when the track does not report one
    pub const HEIGHT: u32 = 500;
    pub const IMAGE_TYPE: &str = "image/png";
    /// Encoder quality in 0..=1
    pub const IMAGE_QUALITY: f32 = 0.92;
    pub const RESOLUTION: Resolution = resolutions::HD_720;
    pub const FRAME_RATE: u32 = super::frame_rates::HIGH;
    /// 0 means no limit
    pub const MAX_IMAGES: usize = 0;
}

/// Supported import file extensions
pub mod file_formats {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Payload type reported with every QR scan event
pub const QR_CODE_TYPE: &str = "qrcode";
