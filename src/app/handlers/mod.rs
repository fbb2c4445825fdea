// SPDX-License-Identifier: GPL-3.0-only

//! Operation handlers
//!
//! Handlers are grouped by functional domain, each adding methods to
//! `CameraModel`.

pub mod camera;
pub mod capture;
pub mod gallery;
