// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use camera_session::constants::{frame_rates, resolutions};

#[test]
fn test_resolution_catalog_values() {
    assert_eq!(resolutions::ALL.len(), 6);
    assert_eq!(resolutions::named("1920x1080"), Some(resolutions::FULL_HD));
    assert_eq!(resolutions::named("nonexistent"), None);
}

#[test]
fn test_resolution_catalog_ordering() {
    // Catalog runs from lowest to highest pixel count
    let mut prev_pixels = 0u64;
    for (name, resolution) in resolutions::ALL {
        let pixels = resolution.width() as u64 * resolution.height() as u64;
        assert!(
            pixels > prev_pixels,
            "{} should be larger than the entry before it",
            name
        );
        prev_pixels = pixels;
    }
}

#[test]
fn test_smallest_is_first_entry() {
    assert_eq!(resolutions::SMALLEST, resolutions::ALL[0].1);
    assert_eq!(resolutions::SMALLEST.width(), 640);
    assert_eq!(resolutions::SMALLEST.height(), 480);
}

#[test]
fn test_frame_rate_presets() {
    assert_eq!(frame_rates::ALL, [15, 30, 60]);
}
