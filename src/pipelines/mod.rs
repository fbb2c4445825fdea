// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! - [`photo`]: still capture, mirroring and data URI encoding

pub mod photo;
