// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking photos
//! - Scanning QR codes
//!
//! Cameras are backed by image files given with `--image`, or by two
//! generated test patterns when none are given.

use camera_session::backends::camera::types::{FacingMode, Resolution};
use camera_session::backends::camera::{MediaSource, StillCamera, StillImageSource};
use camera_session::pipelines::photo::{ImageType, parse_data_uri};
use camera_session::{CameraMode, CameraModel, Config};
use chrono::Local;
use std::path::{Path, PathBuf};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Build the media source for a CLI run
pub fn build_source(images: &[PathBuf]) -> Result<StillImageSource, Box<dyn std::error::Error>> {
    if images.is_empty() {
        return Ok(StillImageSource::new(vec![
            StillCamera::pattern("pattern-front", "Front test pattern", 640, 480)
                .with_facing_modes(vec![FacingMode::User]),
            StillCamera::pattern("pattern-back", "Back test pattern", 1280, 720)
                .with_facing_modes(vec![FacingMode::Environment])
                .with_torch(true),
        ]));
    }

    let cameras = images
        .iter()
        .enumerate()
        .map(|(index, path)| {
            StillCamera::from_image_file(format!("image-{}", index), path)
                .map(|camera| camera.with_facing_modes(vec![FacingMode::Environment]))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StillImageSource::new(cameras))
}

/// Load configuration from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config)
}

/// List all available cameras
pub async fn list_cameras(source: StillImageSource) -> CliResult {
    let devices = source.enumerate_devices().await?;
    let cameras: Vec<_> = devices.iter().filter(|d| d.is_video_input()).collect();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {} ({})", index, camera.label, camera.id);
    }
    println!();
    Ok(())
}

/// Take a photo using the specified camera
pub async fn take_photo(
    source: StillImageSource,
    mut config: Config,
    camera_index: Option<usize>,
    resolution: Option<Resolution>,
    output: Option<PathBuf>,
) -> CliResult {
    config.mode = CameraMode::Photo;
    if let Some(resolution) = resolution {
        config.resolution = resolution;
    }

    let (mut model, _events) = CameraModel::new(config, source)?;
    model.init().await?;
    if let Some(index) = camera_index {
        model.select_camera(index)?;
    }
    model.play().await?;

    let payload = model.capture()?;
    model.stop();

    let (mime, bytes) = parse_data_uri(&payload).ok_or("Capture produced no image data")?;
    let extension = ImageType::from_mime(&mime).extension();
    let output = match output {
        Some(path) => path,
        None => default_photo_path(extension)?,
    };
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, &bytes)?;

    println!("Photo saved: {}", output.display());
    Ok(())
}

/// Run the scan loop over `frames` presented frames and print every code
pub async fn scan(
    source: StillImageSource,
    mut config: Config,
    camera_index: Option<usize>,
    frames: u32,
) -> CliResult {
    config.mode = CameraMode::QrCode;

    let (mut model, mut events) = CameraModel::new(config, source)?;
    model.init().await?;
    if let Some(index) = camera_index {
        model.select_camera(index)?;
    }
    model.play().await?;

    for _ in 0..frames {
        model.on_playback_progress();
    }
    model.stop();
    drop(model);

    let mut found = 0;
    while let Some(event) = events.recv().await {
        if let camera_session::CameraEvent::Scan(scan) = event {
            println!("{}", serde_json::to_string(&scan)?);
            found += 1;
        }
    }
    if found == 0 {
        println!("No QR code detected.");
    }
    Ok(())
}

fn default_photo_path(extension: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = dirs::picture_dir()
        .or_else(dirs::home_dir)
        .ok_or("Could not determine a pictures directory")?
        .join("camera-session");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("photo_{}.{}", timestamp, extension)))
}
