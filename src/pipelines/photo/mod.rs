// SPDX-License-Identifier: GPL-3.0-only

//! Still photo pipeline
//!
//! ```text
//! Live frame → Raster (size, mirror) → Encoding → data: URI → ImageCollection
//! ```
//!
//! Everything here is synchronous; no storage or network I/O happens during
//! a capture.

pub mod capture;
pub mod encoding;

pub use capture::{CaptureEngine, ObjectKeyGenerator, Orientation, capture_size};
pub use encoding::{ImageType, PhotoEncoder, parse_data_uri, to_data_uri};
