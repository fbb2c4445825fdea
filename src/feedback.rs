// SPDX-License-Identifier: GPL-3.0-only

//! Fire-and-forget cues for the animation layer

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    EnterPreview,
    LeavePreview,
    CaptureFlash,
}

/// Receiver of UI feedback cues
///
/// Implementations must return immediately; the camera never waits for an
/// animation to finish.
pub trait UiFeedback: Send {
    fn notify(&self, cue: FeedbackCue);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl UiFeedback for NoFeedback {
    fn notify(&self, cue: FeedbackCue) {
        trace!(?cue, "Feedback cue dropped");
    }
}

impl UiFeedback for UnboundedSender<FeedbackCue> {
    fn notify(&self, cue: FeedbackCue) {
        // A closed receiver only means nobody is animating anymore
        let _ = self.send(cue);
    }
}
