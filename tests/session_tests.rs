// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the stream session lifecycle

use camera_session::backends::camera::types::FacingMode;
use camera_session::backends::camera::{
    MediaSource, SourceEvent, StillCamera, StillImageSource, StreamSession, StreamTarget,
};
use camera_session::backends::camera::still::StillStream;
use camera_session::constants::resolutions;
use camera_session::errors::{AcquisitionError, CameraError};

fn two_cameras() -> StillImageSource {
    StillImageSource::new(vec![
        StillCamera::pattern("front", "Front", 64, 48).with_facing_modes(vec![FacingMode::User]),
        StillCamera::pattern("back", "Back", 64, 48)
            .with_facing_modes(vec![FacingMode::Environment])
            .with_torch(true),
    ])
}

fn session() -> StreamSession<StillStream> {
    StreamSession::new(StreamTarget {
        facing_mode: FacingMode::Environment,
        resolution: resolutions::HD_720,
        frame_rate: 60,
    })
}

#[tokio::test]
async fn test_set_resolution_stops_then_reacquires() {
    let source = two_cameras();
    let mut session = session();

    let cameras = session.refresh_cameras(&source).await.unwrap().to_vec();
    assert_eq!(cameras.len(), 2);

    session
        .start(
            &source,
            Some(cameras[1].clone()),
            FacingMode::Environment,
            resolutions::HD_720,
        )
        .await
        .unwrap();
    session
        .set_resolution(&source, resolutions::FULL_HD)
        .await
        .unwrap();

    let activity = source.activity();
    assert_eq!(activity.events.len(), 3, "{:?}", activity.events);
    match &activity.events[0] {
        SourceEvent::Acquired { device_id, request } => {
            assert_eq!(device_id, "back");
            assert_eq!((request.width_hint, request.height_hint), (1280, 720));
        }
        other => panic!("expected first acquisition, got {:?}", other),
    }
    assert_eq!(
        activity.events[1],
        SourceEvent::Stopped {
            device_id: "back".to_string()
        }
    );
    match &activity.events[2] {
        SourceEvent::Acquired { device_id, request } => {
            assert_eq!(device_id, "back");
            assert_eq!((request.width_hint, request.height_hint), (1920, 1080));
            assert_eq!(request.frame_rate_hint, 60);
        }
        other => panic!("expected second acquisition, got {:?}", other),
    }
    assert_eq!(activity.peak_live, 1);
    assert!(session.is_playing());
}

#[tokio::test]
async fn test_toggle_facing_renegotiates_by_facing_mode() {
    let source = two_cameras();
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();

    session.play(&source).await.unwrap();
    assert_eq!(session.facing_mode(), FacingMode::Environment);
    assert!(!session.is_mirrored());

    session.toggle_facing_mode(&source).await.unwrap();
    assert_eq!(session.facing_mode(), FacingMode::User);
    assert!(session.is_mirrored());

    // Restarts keep following the facing mode, not the selected camera
    session
        .set_resolution(&source, resolutions::VGA)
        .await
        .unwrap();
    assert_eq!(session.stream().map(|s| s.device_id()), Some("front"));

    let acquired: Vec<_> = source
        .activity()
        .events
        .into_iter()
        .filter_map(|e| match e {
            SourceEvent::Acquired { device_id, request } => Some((device_id, request)),
            _ => None,
        })
        .collect();
    assert_eq!(acquired.len(), 3);
    assert_eq!(acquired[0].0, "back");
    assert_eq!(acquired[0].1.device_id.as_deref(), Some("back"));
    for (device_id, request) in &acquired[1..] {
        assert_eq!(device_id, "front");
        assert_eq!(request.device_id, None);
        assert_eq!(request.facing_mode, FacingMode::User);
    }

    // Picking a camera pins the device again
    session.select_camera(1).unwrap();
    session.play(&source).await.unwrap();
    assert_eq!(session.stream().map(|s| s.device_id()), Some("back"));
    assert_eq!(session.facing_mode(), FacingMode::Environment);
}

#[tokio::test]
async fn test_select_camera_out_of_range() {
    let source = two_cameras();
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();

    assert_eq!(session.select_camera(2), Err(CameraError::NoCameraFound));
    assert_eq!(session.camera_index(), 1);
}

#[tokio::test]
async fn test_at_most_one_live_stream() {
    let source = two_cameras();
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();

    session.play(&source).await.unwrap();
    session.toggle_facing_mode(&source).await.unwrap();
    session
        .set_resolution(&source, resolutions::VGA)
        .await
        .unwrap();
    session.cycle_camera(&source).await.unwrap();
    session.stop();
    session.play(&source).await.unwrap();
    session.cycle_camera(&source).await.unwrap();

    let activity = source.activity();
    assert_eq!(activity.peak_live, 1);
    assert_eq!(activity.live, 1);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let source = two_cameras();
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();
    session.play(&source).await.unwrap();

    session.stop();
    let after_first = source.activity();
    session.stop();
    let after_second = source.activity();

    assert_eq!(after_first.events, after_second.events);
    assert_eq!(after_second.live, 0);
    assert!(!session.is_playing());
}

#[tokio::test]
async fn test_superseded_completion_is_discarded() {
    let source = two_cameras();
    let mut session = session();
    let cameras = session.refresh_cameras(&source).await.unwrap().to_vec();

    let older = session.begin_acquisition(Some(&cameras[0]));
    let older_result = source.acquire(older.request()).await;
    let newer = session.begin_acquisition(Some(&cameras[1]));
    let newer_result = source.acquire(newer.request()).await;

    session.complete_acquisition(newer, newer_result).unwrap();
    assert_eq!(
        session.complete_acquisition(older, older_result),
        Err(CameraError::Superseded)
    );

    assert_eq!(session.stream().map(|s| s.device_id()), Some("back"));
    assert_eq!(source.activity().live, 1);
    assert!(!session.is_mirrored());
}

#[tokio::test]
async fn test_denied_acquisition_leaves_session_stopped() {
    let source = StillImageSource::new(vec![
        StillCamera::pattern("cam", "Denied", 32, 32).denying(AcquisitionError::PermissionDenied),
    ]);
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();

    let result = session.play(&source).await;
    assert_eq!(
        result,
        Err(CameraError::Acquisition(AcquisitionError::PermissionDenied))
    );
    assert!(!session.is_playing());
    assert!(session.current_frame().is_none());
    assert!(!session.capability().torch_supported);
    assert_eq!(source.activity().live, 0);
}

#[tokio::test]
async fn test_torch_follows_capability() {
    let source = two_cameras();
    let mut session = session();
    session.refresh_cameras(&source).await.unwrap();

    // Last camera is the torch-capable rear one
    session.play(&source).await.unwrap();
    assert!(session.capability().torch_supported);
    assert!(session.toggle_torch());
    assert!(!session.toggle_torch());

    session.cycle_camera(&source).await.unwrap();
    assert!(!session.capability().torch_supported);
    assert!(!session.toggle_torch(), "unsupported torch must be a no-op");
}

#[tokio::test]
async fn test_no_cameras_stays_stopped() {
    let source = StillImageSource::new(Vec::new());
    let mut session = session();
    assert!(session.refresh_cameras(&source).await.unwrap().is_empty());

    session.play(&source).await.unwrap();
    session.cycle_camera(&source).await.unwrap();
    assert!(!session.is_playing());
    assert!(source.activity().events.is_empty());
}
