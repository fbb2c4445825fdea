// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The session only talks to the platform through two narrow traits:
//!
//! ```text
//! ┌─────────────────────┐
//! │    CameraModel      │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   StreamSession     │  ← one live stream, renegotiation, torch
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ MediaSource trait   │  ← enumeration + acquisition
//! │ MediaStream trait   │  ← track introspection, frames, stop
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │ StillImage  │  ← in-process implementation
//!     └─────────────┘
//! ```

pub mod session;
pub mod still;
pub mod types;

pub use session::{AcquisitionTicket, PreviewSurface, StreamSession, StreamTarget};
pub use still::{SourceActivity, SourceEvent, StillCamera, StillImageSource};
pub use types::*;

use crate::errors::CameraError;
use std::future::Future;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, CameraError>;

/// Platform camera enumeration and stream acquisition
pub trait MediaSource {
    /// Handle type for an acquired stream
    type Stream: MediaStream;

    /// List every media device the platform exposes
    ///
    /// The result may include non-camera devices; callers filter on
    /// [`DeviceKind::VideoInput`]. An empty list is not an error.
    fn enumerate_devices(&self) -> impl Future<Output = BackendResult<Vec<CameraDescriptor>>> + Send;

    /// Request a stream matching the given hints
    ///
    /// Fails with [`CameraError::Acquisition`] when the platform denies or
    /// cannot satisfy the request.
    fn acquire(
        &self,
        request: &StreamRequest,
    ) -> impl Future<Output = BackendResult<Self::Stream>> + Send;
}

/// An acquired stream and its single video track
pub trait MediaStream {
    /// Values the track actually negotiated
    fn settings(&self) -> TrackSettings;

    /// Capabilities the track reports
    fn capabilities(&self) -> TrackCapabilities;

    /// Apply the torch as an advanced constraint on the track
    fn apply_torch(&mut self, enabled: bool) -> BackendResult<()>;

    /// Most recently presented frame, if any
    fn current_frame(&self) -> Option<CameraFrame>;

    /// Halt every track and release the hardware; calling twice is harmless
    fn stop(&mut self);

    /// Whether the tracks are still running
    fn is_live(&self) -> bool;
}
