// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera session

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Top-level error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera stream errors
    Camera(CameraError),
    /// Still capture errors
    Photo(PhotoError),
    /// File import errors
    Import(ImportError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Why the platform refused or could not satisfy a stream request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// The user or platform denied camera access
    PermissionDenied,
    /// No device matches the requested identifier or facing mode
    NoMatchingDevice(String),
    /// The device is held by another consumer
    DeviceBusy,
    /// Any other platform failure
    Other(String),
}

/// Camera stream errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No enumerated video input matches the requested index
    NoCameraFound,
    /// Stream acquisition failed; the session stays stopped
    Acquisition(AcquisitionError),
    /// A newer start or stop replaced this acquisition before it completed
    Superseded,
    /// The active track rejected a constraint
    ConstraintRejected(String),
    /// The operation needs a live stream
    NotStreaming,
}

/// Still capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// No frame is available from the live stream
    NoFrameAvailable,
    /// Frame data does not match its declared dimensions
    InvalidFrame(String),
    /// Encoding the raster failed
    EncodingFailed(String),
}

/// File import errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Import was invoked with zero files
    NoFilesSelected,
    /// File content is not a recognised image
    UnsupportedType(String),
    /// File could not be read
    ReadFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Import(e) => write!(f, "Import error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::PermissionDenied => write!(f, "Permission denied"),
            AcquisitionError::NoMatchingDevice(what) => write!(f, "No matching device: {}", what),
            AcquisitionError::DeviceBusy => write!(f, "Device is busy"),
            AcquisitionError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::Acquisition(e) => write!(f, "Stream acquisition failed: {}", e),
            CameraError::Superseded => write!(f, "Acquisition superseded by a newer request"),
            CameraError::ConstraintRejected(msg) => write!(f, "Constraint rejected: {}", msg),
            CameraError::NotStreaming => write!(f, "No live stream"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoFilesSelected => write!(f, "No files selected"),
            ImportError::UnsupportedType(name) => write!(f, "Unsupported image type: {}", name),
            ImportError::ReadFailed(msg) => write!(f, "Failed to read file: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for AcquisitionError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ImportError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<AcquisitionError> for CameraError {
    fn from(err: AcquisitionError) -> Self {
        CameraError::Acquisition(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::Import(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::ReadFailed(err.to_string())
    }
}
