// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing
//!
//! Sampling of live frames into an off-screen raster and QR scanning on
//! top of it.

pub mod raster;
pub mod tasks;
pub mod types;

pub use raster::RasterBuffer;
pub use tasks::{QrDecoder, RqrrDecoder, ScanLoop};
pub use types::{ScanEvent, ScanState};
