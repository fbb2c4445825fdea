// SPDX-License-Identifier: GPL-3.0-only

//! Stream session lifecycle
//!
//! A [`StreamSession`] owns at most one live stream. Every path that starts a
//! stream goes through the same replace step: the current stream is stopped
//! synchronously, a new request token is issued, and only the completion that
//! still holds the newest token may install its stream. Completions that lost
//! the race are stopped and dropped.

use super::types::*;
use super::{BackendResult, MediaSource, MediaStream};
use crate::errors::CameraError;
use tracing::{debug, info, warn};

/// What the next acquisition will ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTarget {
    /// Requested facing mode; replaced by the negotiated one after each start
    pub facing_mode: FacingMode,
    /// Resolution hint
    pub resolution: Resolution,
    /// Frame rate hint
    pub frame_rate: u32,
}

/// Presentation state of the live preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewSurface {
    /// Playback is running
    pub playing: bool,
    /// Preview is drawn with a horizontal flip
    pub mirrored: bool,
}

/// An issued acquisition that has not completed yet
#[must_use = "a ticket must be completed or the acquisition is lost"]
#[derive(Debug, Clone)]
pub struct AcquisitionTicket {
    token: u64,
    request: StreamRequest,
}

impl AcquisitionTicket {
    /// The request to hand to [`MediaSource::acquire`]
    pub fn request(&self) -> &StreamRequest {
        &self.request
    }
}

/// Owner of one camera stream and its renegotiation
pub struct StreamSession<T: MediaStream> {
    stream: Option<T>,
    target: StreamTarget,
    cameras: Vec<CameraDescriptor>,
    camera_index: usize,
    /// Next acquisition asks for the target facing mode instead of the
    /// selected camera
    follow_facing: bool,
    surface: PreviewSurface,
    capability: StreamCapability,
    torch_enabled: bool,
    /// Bumped by every stop; a ticket is current iff it carries this value
    generation: u64,
}

impl<T: MediaStream> StreamSession<T> {
    /// Create a stopped session
    pub fn new(target: StreamTarget) -> Self {
        Self {
            stream: None,
            target,
            cameras: Vec::new(),
            camera_index: 0,
            follow_facing: false,
            surface: PreviewSurface::default(),
            capability: StreamCapability::default(),
            torch_enabled: false,
            generation: 0,
        }
    }

    // ===== Enumeration =====

    /// Replace the camera list with the video inputs from `devices`
    ///
    /// The selection moves to the last camera, which on phones is usually
    /// the rear one.
    pub fn set_cameras(&mut self, devices: Vec<CameraDescriptor>) {
        self.cameras = devices.into_iter().filter(|d| d.is_video_input()).collect();
        self.camera_index = self.cameras.len().saturating_sub(1);
        info!(
            count = self.cameras.len(),
            selected = self.camera_index,
            "Camera list updated"
        );
    }

    /// Re-enumerate devices from the source
    pub async fn refresh_cameras<S>(&mut self, source: &S) -> BackendResult<&[CameraDescriptor]>
    where
        S: MediaSource<Stream = T>,
    {
        let devices = source.enumerate_devices().await?;
        debug!(total = devices.len(), "Enumerated media devices");
        self.set_cameras(devices);
        Ok(&self.cameras)
    }

    pub fn cameras(&self) -> &[CameraDescriptor] {
        &self.cameras
    }

    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    /// Camera the next [`play`](Self::play) will open
    pub fn selected_camera(&self) -> Option<&CameraDescriptor> {
        self.cameras.get(self.camera_index)
    }

    /// Select a camera by index without restarting
    pub fn select_camera(&mut self, index: usize) -> BackendResult<()> {
        if index >= self.cameras.len() {
            warn!(index, count = self.cameras.len(), "Camera index out of range");
            return Err(CameraError::NoCameraFound);
        }
        self.camera_index = index;
        self.follow_facing = false;
        Ok(())
    }

    /// Camera the next acquisition is pinned to; `None` when it goes by
    /// facing mode
    fn pinned_camera(&self) -> Option<CameraDescriptor> {
        if self.follow_facing {
            None
        } else {
            self.selected_camera().cloned()
        }
    }

    // ===== Acquisition =====

    /// Stop the current stream and issue a new request token
    ///
    /// Pass the ticket's request to the source, then hand the outcome to
    /// [`complete_acquisition`](Self::complete_acquisition).
    pub fn begin_acquisition(&mut self, camera: Option<&CameraDescriptor>) -> AcquisitionTicket {
        self.stop();
        let request = StreamRequest {
            device_id: camera.map(|c| c.id.clone()),
            facing_mode: self.target.facing_mode,
            width_hint: self.target.resolution.width(),
            height_hint: self.target.resolution.height(),
            frame_rate_hint: self.target.frame_rate,
        };
        info!(
            token = self.generation,
            device = ?request.device_id,
            facing = %request.facing_mode,
            width = request.width_hint,
            height = request.height_hint,
            fps = request.frame_rate_hint,
            "Requesting camera stream"
        );
        AcquisitionTicket {
            token: self.generation,
            request,
        }
    }

    /// Install the outcome of an acquisition if it is still the newest one
    ///
    /// A stale ticket's stream is stopped and discarded, and the call
    /// returns [`CameraError::Superseded`]. A failed acquisition leaves the
    /// session stopped.
    pub fn complete_acquisition(
        &mut self,
        ticket: AcquisitionTicket,
        result: BackendResult<T>,
    ) -> BackendResult<()> {
        if ticket.token != self.generation {
            if let Ok(mut stale) = result {
                stale.stop();
            }
            warn!(
                token = ticket.token,
                current = self.generation,
                "Discarding superseded camera stream"
            );
            return Err(CameraError::Superseded);
        }

        match result {
            Ok(stream) => {
                self.install(stream);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Camera stream acquisition failed");
                Err(e)
            }
        }
    }

    fn install(&mut self, stream: T) {
        let caps = stream.capabilities();
        let settings = stream.settings();
        let facing = caps.facing_modes.first().copied().unwrap_or(FacingMode::User);

        self.target.facing_mode = facing;
        self.surface = PreviewSurface {
            playing: true,
            mirrored: facing.is_mirrored(),
        };
        self.capability = StreamCapability::from(&caps);
        self.torch_enabled = false;
        self.stream = Some(stream);

        info!(
            facing = %facing,
            mirrored = self.surface.mirrored,
            width = ?settings.width,
            height = ?settings.height,
            torch = self.capability.torch_supported,
            "Camera stream started"
        );
    }

    /// Acquire a stream for `camera` with the current target
    async fn replace<S>(&mut self, source: &S, camera: Option<CameraDescriptor>) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        let ticket = self.begin_acquisition(camera.as_ref());
        let result = source.acquire(ticket.request()).await;
        self.complete_acquisition(ticket, result)
    }

    /// Start a stream for `camera`, or for the facing-mode hint when no
    /// camera is given
    pub async fn start<S>(
        &mut self,
        source: &S,
        camera: Option<CameraDescriptor>,
        facing_mode: FacingMode,
        resolution: Resolution,
    ) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        self.target.facing_mode = facing_mode;
        self.target.resolution = resolution;
        self.follow_facing = camera.is_none();
        self.replace(source, camera).await
    }

    /// Start the selected camera with the current target
    ///
    /// After a facing-mode switch the request carries no device id and the
    /// source picks a camera by facing mode. With no cameras enumerated this
    /// does nothing and the session stays stopped.
    pub async fn play<S>(&mut self, source: &S) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        if self.cameras.is_empty() {
            info!("No camera available, staying stopped");
            return Ok(());
        }
        let camera = self.pinned_camera();
        self.replace(source, camera).await
    }

    /// Pause playback and halt every track
    ///
    /// Also invalidates any acquisition still in flight. Safe to call at any
    /// time, any number of times.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.surface.playing = false;
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Camera stream stopped");
        }
    }

    // ===== Renegotiation =====

    /// Flip between user and environment facing and restart
    pub async fn toggle_facing_mode<S>(&mut self, source: &S) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        let next = self.target.facing_mode.flipped();
        self.set_facing_mode(source, next).await
    }

    /// Restart with an explicit facing mode
    ///
    /// The selected camera is released; later restarts keep asking for this
    /// facing mode until a camera is selected again.
    pub async fn set_facing_mode<S>(&mut self, source: &S, facing_mode: FacingMode) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        self.stop();
        info!(facing = %facing_mode, "Switching facing mode");
        self.target.facing_mode = facing_mode;
        self.follow_facing = true;
        self.play(source).await
    }

    /// Restart with a new resolution hint
    pub async fn set_resolution<S>(&mut self, source: &S, resolution: Resolution) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        self.stop();
        info!(resolution = %resolution, "Switching resolution");
        self.target.resolution = resolution;
        self.play(source).await
    }

    /// Advance to the next enumerated camera and restart
    pub async fn cycle_camera<S>(&mut self, source: &S) -> BackendResult<()>
    where
        S: MediaSource<Stream = T>,
    {
        if self.cameras.is_empty() {
            info!("No camera to cycle to");
            return Ok(());
        }
        self.camera_index = (self.camera_index + 1) % self.cameras.len();
        self.follow_facing = false;
        info!(index = self.camera_index, "Cycling camera");
        self.stop();
        self.play(source).await
    }

    // ===== Torch =====

    /// Flip the torch if the live track supports it
    ///
    /// Returns the resulting torch state. Without support, or without a
    /// live stream, nothing happens.
    pub fn toggle_torch(&mut self) -> bool {
        if !self.capability.torch_supported {
            debug!("Torch not supported by the active track");
            return self.torch_enabled;
        }
        let Some(stream) = self.stream.as_mut() else {
            return self.torch_enabled;
        };

        let next = !self.torch_enabled;
        match stream.apply_torch(next) {
            Ok(()) => {
                self.torch_enabled = next;
                info!(enabled = next, "Torch toggled");
            }
            Err(e) => warn!(error = %e, "Track rejected torch constraint"),
        }
        self.torch_enabled
    }

    // ===== State =====

    pub fn is_playing(&self) -> bool {
        self.surface.playing && self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    /// Whether preview and capture are horizontally mirrored
    pub fn is_mirrored(&self) -> bool {
        self.surface.mirrored
    }

    pub fn surface(&self) -> PreviewSurface {
        self.surface
    }

    pub fn target(&self) -> StreamTarget {
        self.target
    }

    /// Force the resolution hint without restarting
    pub(crate) fn set_target_resolution(&mut self, resolution: Resolution) {
        self.target.resolution = resolution;
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.target.facing_mode
    }

    /// Capability snapshot of the live track; all false when stopped
    pub fn capability(&self) -> StreamCapability {
        if self.stream.is_some() {
            self.capability
        } else {
            StreamCapability::default()
        }
    }

    pub fn torch_enabled(&self) -> bool {
        self.torch_enabled
    }

    /// Negotiated settings of the live track
    pub fn negotiated(&self) -> Option<TrackSettings> {
        self.stream.as_ref().map(|s| s.settings())
    }

    /// Most recent frame of the live track
    pub fn current_frame(&self) -> Option<CameraFrame> {
        self.stream.as_ref().and_then(|s| s.current_frame())
    }

    pub fn stream(&self) -> Option<&T> {
        self.stream.as_ref()
    }
}

impl<T: MediaStream> Drop for StreamSession<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: MediaStream> std::fmt::Debug for StreamSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("target", &self.target)
            .field("cameras", &self.cameras.len())
            .field("camera_index", &self.camera_index)
            .field("follow_facing", &self.follow_facing)
            .field("surface", &self.surface)
            .field("torch_enabled", &self.torch_enabled)
            .finish()
    }
}
