// SPDX-License-Identifier: GPL-3.0-only

//! In-memory collection of captured and imported images
//!
//! Images are kept newest-first. The preview selection is stored as an
//! [`ObjectKey`] rather than a second owner of the image, and always refers
//! to a current member.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info};

/// Unique, time-derived identifier of a captured image
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An encoded image plus its key
///
/// Immutable once created; the payload is a base64 `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedImage {
    encoded_payload: String,
    object_key: ObjectKey,
}

impl CapturedImage {
    pub fn new(payload: String, key: ObjectKey) -> Self {
        Self {
            encoded_payload: payload,
            object_key: key,
        }
    }

    pub fn payload(&self) -> &str {
        &self.encoded_payload
    }

    pub fn key(&self) -> &ObjectKey {
        &self.object_key
    }
}

/// Result of [`ImageCollection::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// A preview was open and has been dismissed
    PreviewCleared,
    /// Nothing was selected; the consumer should close the session
    Closed,
}

/// Ordered image collection with a preview selection
#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    images: VecDeque<CapturedImage>,
    selected: Option<ObjectKey>,
    max_images: usize,
}

impl ImageCollection {
    /// `max_images` of 0 means unlimited
    pub fn new(max_images: usize) -> Self {
        Self {
            images: VecDeque::new(),
            selected: None,
            max_images,
        }
    }

    /// Insert at the head; identical payloads are kept as separate entries
    pub fn add(&mut self, image: CapturedImage) {
        debug!(key = %image.key(), count = self.images.len() + 1, "Image added");
        self.images.push_front(image);
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&CapturedImage> {
        self.images.iter().find(|image| image.key() == key)
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.get(key).is_some()
    }

    /// Point the preview at a member; returns false for unknown keys
    pub fn select(&mut self, key: &ObjectKey) -> bool {
        if !self.contains(key) {
            debug!(key = %key, "Ignoring selection of unknown image");
            return false;
        }
        self.selected = Some(key.clone());
        true
    }

    pub fn selected(&self) -> Option<&CapturedImage> {
        self.selected.as_ref().and_then(|key| self.get(key))
    }

    /// Clear the preview; returns whether a selection was active
    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Remove every listed member, matched by key
    ///
    /// Returns the removed images in collection order. Keys that are not
    /// members are ignored. If the selected image is removed the selection
    /// moves to the new head, or clears when the collection is empty.
    pub fn remove(&mut self, keys: &[ObjectKey]) -> Vec<CapturedImage> {
        let mut removed = Vec::new();
        let mut kept = VecDeque::with_capacity(self.images.len());
        for image in self.images.drain(..) {
            if keys.contains(image.key()) {
                removed.push(image);
            } else {
                kept.push_back(image);
            }
        }
        self.images = kept;

        let selection_removed = self
            .selected
            .as_ref()
            .is_some_and(|key| removed.iter().any(|image| image.key() == key));
        if selection_removed {
            self.selected = self.images.front().map(|image| image.key().clone());
        }

        if !removed.is_empty() {
            info!(
                removed = removed.len(),
                remaining = self.images.len(),
                "Images removed"
            );
        }
        removed
    }

    /// Dismiss the preview if one is open, otherwise signal a full close
    pub fn close(&mut self) -> CloseOutcome {
        if self.clear_selection() {
            CloseOutcome::PreviewCleared
        } else {
            CloseOutcome::Closed
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &CapturedImage> {
        self.images.iter()
    }

    /// Owned copy of the collection, newest-first
    pub fn snapshot(&self) -> Vec<CapturedImage> {
        self.images.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn set_max_images(&mut self, max_images: usize) {
        self.max_images = max_images;
    }

    /// Advisory limit check; the collection never refuses an `add`
    pub fn has_reached_limit(&self) -> bool {
        self.max_images > 0 && self.images.len() >= self.max_images
    }
}
