// SPDX-License-Identifier: GPL-3.0-only

//! Still-image media source
//!
//! Serves fixed RGBA frames as if they came from cameras. Each
//! [`StillCamera`] behaves like one device: it reports a facing mode and
//! torch capability, can be told to refuse acquisition, and negotiates its
//! own frame size regardless of the requested hints.
//!
//! Every grant and stop is recorded in a shared [`SourceActivity`] so the
//! number of concurrently live streams can be inspected.

use super::types::*;
use super::{BackendResult, MediaSource, MediaStream};
use crate::errors::{AcquisitionError, CameraError};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// One recorded source interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A stream was granted for the request
    Acquired { device_id: String, request: StreamRequest },
    /// A request was refused
    Denied { request: StreamRequest },
    /// A granted stream was halted
    Stopped { device_id: String },
    /// Torch constraint applied
    Torch { device_id: String, enabled: bool },
}

/// Shared record of grants and stops
#[derive(Debug, Clone, Default)]
pub struct SourceActivity {
    pub events: Vec<SourceEvent>,
    /// Streams currently live
    pub live: usize,
    /// Highest number of simultaneously live streams seen
    pub peak_live: usize,
}

type SharedActivity = Arc<Mutex<SourceActivity>>;

fn lock(activity: &SharedActivity) -> MutexGuard<'_, SourceActivity> {
    activity.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A fake camera backed by one frame
#[derive(Debug, Clone)]
pub struct StillCamera {
    descriptor: CameraDescriptor,
    frame: CameraFrame,
    facing_modes: Vec<FacingMode>,
    torch: bool,
    deny: Option<AcquisitionError>,
}

impl StillCamera {
    /// Camera that serves `frame`
    pub fn new(id: impl Into<String>, label: impl Into<String>, frame: CameraFrame) -> Self {
        Self {
            descriptor: CameraDescriptor::video_input(id, label),
            frame,
            facing_modes: Vec::new(),
            torch: false,
            deny: None,
        }
    }

    /// Camera that serves a color-bar test pattern
    pub fn pattern(id: impl Into<String>, label: impl Into<String>, width: u32, height: u32) -> Self {
        Self::new(id, label, color_bars(width, height))
    }

    /// Camera that serves an image file
    pub fn from_image_file(id: impl Into<String>, path: &Path) -> BackendResult<Self> {
        info!(path = %path.display(), "Loading image file");

        let img = image::open(path).map_err(|e| {
            CameraError::Acquisition(AcquisitionError::Other(format!(
                "Failed to load image '{}': {}",
                path.display(),
                e
            )))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(width, height, "Image loaded successfully");

        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(id, label, CameraFrame::from_rgba(width, height, rgba.into_raw())))
    }

    /// Facing modes the track will report
    pub fn with_facing_modes(mut self, modes: Vec<FacingMode>) -> Self {
        self.facing_modes = modes;
        self
    }

    /// Whether the track will report torch support
    pub fn with_torch(mut self, torch: bool) -> Self {
        self.torch = torch;
        self
    }

    /// Refuse every acquisition with `error`
    pub fn denying(mut self, error: AcquisitionError) -> Self {
        self.deny = Some(error);
        self
    }

    pub fn descriptor(&self) -> &CameraDescriptor {
        &self.descriptor
    }
}

/// Media source over a fixed set of still cameras
#[derive(Debug, Clone)]
pub struct StillImageSource {
    cameras: Vec<StillCamera>,
    /// Devices reported by enumeration that are not cameras
    other_devices: Vec<CameraDescriptor>,
    activity: SharedActivity,
}

impl StillImageSource {
    pub fn new(cameras: Vec<StillCamera>) -> Self {
        Self {
            cameras,
            other_devices: Vec::new(),
            activity: SharedActivity::default(),
        }
    }

    /// Also report a non-camera device during enumeration
    pub fn with_device(mut self, device: CameraDescriptor) -> Self {
        self.other_devices.push(device);
        self
    }

    /// Snapshot of every grant and stop so far
    pub fn activity(&self) -> SourceActivity {
        lock(&self.activity).clone()
    }

    /// Pick the camera for a request: exact id first, then facing mode,
    /// then the first camera when nothing specific was asked for
    fn resolve(&self, request: &StreamRequest) -> Option<&StillCamera> {
        match &request.device_id {
            Some(id) => self.cameras.iter().find(|c| &c.descriptor.id == id),
            None => self
                .cameras
                .iter()
                .find(|c| c.facing_modes.first() == Some(&request.facing_mode))
                .or_else(|| self.cameras.first()),
        }
    }
}

impl MediaSource for StillImageSource {
    type Stream = StillStream;

    async fn enumerate_devices(&self) -> BackendResult<Vec<CameraDescriptor>> {
        Ok(self
            .cameras
            .iter()
            .map(|c| c.descriptor.clone())
            .chain(self.other_devices.iter().cloned())
            .collect())
    }

    async fn acquire(&self, request: &StreamRequest) -> BackendResult<StillStream> {
        let mut activity = lock(&self.activity);

        let camera = match self.resolve(request) {
            Some(camera) => camera,
            None => {
                activity.events.push(SourceEvent::Denied {
                    request: request.clone(),
                });
                let wanted = request
                    .device_id
                    .clone()
                    .unwrap_or_else(|| request.facing_mode.to_string());
                return Err(AcquisitionError::NoMatchingDevice(wanted).into());
            }
        };

        if let Some(error) = &camera.deny {
            activity.events.push(SourceEvent::Denied {
                request: request.clone(),
            });
            return Err(error.clone().into());
        }

        activity.events.push(SourceEvent::Acquired {
            device_id: camera.descriptor.id.clone(),
            request: request.clone(),
        });
        activity.live += 1;
        activity.peak_live = activity.peak_live.max(activity.live);

        Ok(StillStream {
            device_id: camera.descriptor.id.clone(),
            frame: camera.frame.clone(),
            settings: TrackSettings {
                width: Some(camera.frame.width),
                height: Some(camera.frame.height),
                frame_rate: Some(request.frame_rate_hint),
            },
            capabilities: TrackCapabilities {
                facing_modes: camera.facing_modes.clone(),
                torch: camera.torch,
            },
            activity: Arc::clone(&self.activity),
            live: true,
        })
    }
}

/// A granted still-image stream
#[derive(Debug)]
pub struct StillStream {
    device_id: String,
    frame: CameraFrame,
    settings: TrackSettings,
    capabilities: TrackCapabilities,
    activity: SharedActivity,
    live: bool,
}

impl StillStream {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl MediaStream for StillStream {
    fn settings(&self) -> TrackSettings {
        self.settings
    }

    fn capabilities(&self) -> TrackCapabilities {
        self.capabilities.clone()
    }

    fn apply_torch(&mut self, enabled: bool) -> BackendResult<()> {
        if !self.live {
            return Err(CameraError::NotStreaming);
        }
        if !self.capabilities.torch {
            return Err(CameraError::ConstraintRejected("torch".to_string()));
        }
        lock(&self.activity).events.push(SourceEvent::Torch {
            device_id: self.device_id.clone(),
            enabled,
        });
        Ok(())
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        self.live.then(|| self.frame.clone())
    }

    fn stop(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        let mut activity = lock(&self.activity);
        activity.live = activity.live.saturating_sub(1);
        activity.events.push(SourceEvent::Stopped {
            device_id: self.device_id.clone(),
        });
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for StillStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Generate an RGBA color-bar frame
///
/// Eight vertical bars: white, yellow, cyan, green, magenta, red, blue, black.
pub fn color_bars(width: u32, height: u32) -> CameraFrame {
    const BARS: [[u8; 4]; 8] = [
        [255, 255, 255, 255],
        [255, 255, 0, 255],
        [0, 255, 255, 255],
        [0, 255, 0, 255],
        [255, 0, 255, 255],
        [255, 0, 0, 255],
        [0, 0, 255, 255],
        [0, 0, 0, 255],
    ];

    let width = width.max(1);
    let height = height.max(1);
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..height {
        for x in 0..width {
            let bar = ((x as usize * BARS.len()) / width as usize).min(BARS.len() - 1);
            data.extend_from_slice(&BARS[bar]);
        }
    }
    CameraFrame::from_rgba(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(device_id: Option<&str>, facing_mode: FacingMode) -> StreamRequest {
        StreamRequest {
            device_id: device_id.map(str::to_string),
            facing_mode,
            width_hint: 640,
            height_hint: 480,
            frame_rate_hint: 30,
        }
    }

    #[test]
    fn test_color_bars_layout() {
        let frame = color_bars(16, 2);
        assert!(frame.is_well_formed());
        assert_eq!(&frame.data[0..4], &[255, 255, 255, 255]);
        let last = (16 - 1) * 4;
        assert_eq!(&frame.data[last..last + 4], &[0, 0, 0, 255]);
    }

    #[tokio::test]
    async fn test_enumeration_includes_other_devices() {
        let source = StillImageSource::new(vec![StillCamera::pattern("a", "A", 4, 4)]).with_device(
            CameraDescriptor {
                id: "mic".to_string(),
                kind: DeviceKind::AudioInput,
                label: "Mic".to_string(),
            },
        );
        let devices = source.enumerate_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices.iter().filter(|d| d.is_video_input()).count(), 1);
    }

    #[tokio::test]
    async fn test_acquire_resolves_by_facing_hint() {
        let source = StillImageSource::new(vec![
            StillCamera::pattern("front", "Front", 4, 4).with_facing_modes(vec![FacingMode::User]),
            StillCamera::pattern("back", "Back", 4, 4)
                .with_facing_modes(vec![FacingMode::Environment]),
        ]);
        let stream = source
            .acquire(&request(None, FacingMode::Environment))
            .await
            .unwrap();
        assert_eq!(stream.device_id(), "back");
    }

    #[tokio::test]
    async fn test_unknown_device_is_denied() {
        let source = StillImageSource::new(vec![StillCamera::pattern("a", "A", 4, 4)]);
        let err = source
            .acquire(&request(Some("missing"), FacingMode::User))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CameraError::Acquisition(AcquisitionError::NoMatchingDevice("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_stop_and_drop_release_grant() {
        let source = StillImageSource::new(vec![StillCamera::pattern("a", "A", 4, 4)]);
        let mut stream = source.acquire(&request(None, FacingMode::User)).await.unwrap();
        assert_eq!(source.activity().live, 1);

        stream.stop();
        stream.stop();
        assert_eq!(source.activity().live, 0);
        assert!(stream.current_frame().is_none());

        {
            let _second = source.acquire(&request(None, FacingMode::User)).await.unwrap();
            assert_eq!(source.activity().live, 1);
        }
        let activity = source.activity();
        assert_eq!(activity.live, 0);
        assert_eq!(activity.peak_live, 1);
    }
}
