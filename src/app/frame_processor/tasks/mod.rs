// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks

pub mod qr_detector;
pub mod scan_loop;

pub use qr_detector::{QrDecoder, RqrrDecoder};
pub use scan_loop::ScanLoop;
