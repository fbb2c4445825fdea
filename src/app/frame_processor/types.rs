// SPDX-License-Identifier: GPL-3.0-only

//! Core types for frame processing results

use crate::constants::QR_CODE_TYPE;
use serde::{Deserialize, Serialize};

/// A decoded symbol reported to the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// Symbology, always `"qrcode"` for now
    pub code_type: String,
    /// Decoded text
    pub code_data: String,
}

impl ScanEvent {
    /// Event for a decoded QR code
    pub fn qr(code_data: impl Into<String>) -> Self {
        Self {
            code_type: QR_CODE_TYPE.to_string(),
            code_data: code_data.into(),
        }
    }
}

/// Last payload the scan loop emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    last_emitted: Option<String>,
}

impl ScanState {
    pub fn last_emitted(&self) -> Option<&str> {
        self.last_emitted.as_deref()
    }

    /// Feed one frame's detection result
    ///
    /// Returns the payload to emit, or `None` when it repeats the last
    /// emission. A frame without a code clears the state, so a code that
    /// leaves the view and comes back is reported again.
    pub fn observe(&mut self, detection: Option<String>) -> Option<String> {
        match detection {
            Some(text) if text.is_empty() => None,
            Some(text) => {
                if self.last_emitted.as_deref() == Some(text.as_str()) {
                    None
                } else {
                    self.last_emitted = Some(text.clone());
                    Some(text)
                }
            }
            None => {
                self.last_emitted = None;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}
