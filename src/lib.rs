// SPDX-License-Identifier: GPL-3.0-only

//! Camera session - live camera capture for embedding applications
//!
//! This library provides camera selection and stream lifecycle, still
//! capture with mirroring, continuous QR scanning and an in-memory image
//! collection.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: The consumer-facing [`CameraModel`] and frame processing
//! - [`backends`]: Media source abstraction and the stream session
//! - [`pipelines`]: Still capture and image encoding
//! - [`gallery`]: Captured image collection
//! - [`import`]: File import
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! let source = StillImageSource::new(vec![StillCamera::pattern("cam0", "Test", 640, 480)]);
//! let (mut model, mut events) = CameraModel::new(Config::default(), source)?;
//! model.init().await?;
//! model.play().await?;
//! let payload = model.capture()?;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod feedback;
pub mod gallery;
pub mod import;
pub mod pipelines;

// Re-export commonly used types
pub use app::frame_processor::{ScanEvent, ScanState};
pub use app::{CameraEvent, CameraMode, CameraModel, SessionId};
pub use backends::camera::{StillCamera, StillImageSource, StreamSession};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use gallery::{CapturedImage, ImageCollection, ObjectKey};
