//! Error types and handling for the Crownpeak Access API SDK.
//!
//! This module provides the error taxonomy for every failure the client can
//! surface. Errors are deliberately not retried anywhere in the crate: a
//! failed call is reported immediately with enough context (the failing
//! endpoint path, the rejected value, the protocol stage) for the caller to
//! decide what to do.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: network or envelope-decode failures on a REST call
//! - **Validation Errors**: requests rejected locally before any network call
//! - **Permission Errors**: operations restricted to the bot identity
//! - **Ambiguous Name Errors**: duplicate folder labels the remote should
//!   never have produced
//! - **Upload Failures**: any step of the multi-step publish protocol, with
//!   the root cause attached
//! - **File / JSON / Config Errors**: local collaborators

use crate::upload::UploadStage;
use std::fmt;

/// Result type alias for Crownpeak SDK operations.
pub type Result<T> = std::result::Result<T, CrownpeakError>;

/// Comprehensive error type for Crownpeak SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum CrownpeakError {
    /// Network-layer or envelope-decode failure on a REST call. Never
    /// retried; carries the endpoint path that failed.
    #[error("error calling {path}: {reason}")]
    Transport { path: String, reason: String },

    /// Request rejected locally, before any network call was issued.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Operation restricted to the fixed bot identity.
    #[error("permission denied: {message}")]
    Permission { message: String },

    /// More than one folder carries the same label under one parent. The
    /// remote system should keep folder names unique per parent; the client
    /// can only detect the violation, not repair it.
    #[error("more than one folder named {label:?} under folder {folder_id}")]
    AmbiguousName { label: String, folder_id: i64 },

    /// A step of the publish protocol failed. Remaining steps were skipped;
    /// no remote-side cleanup is attempted.
    #[error("upload protocol failed during {stage}: {source}")]
    UploadFailed {
        stage: UploadStage,
        #[source]
        source: Box<CrownpeakError>,
    },

    /// File system errors (source file for an upload)
    #[error("failed to read file: {path}, reason: {reason}")]
    FileRead { path: String, reason: String },

    /// JSON serialization/deserialization errors
    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Generic errors for wrapping other error types
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CrownpeakError {
    /// Gets the severity level of the error for logging purposes.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Network trouble is usually transient; the caller may simply run
            // the operation again.
            CrownpeakError::Transport { .. } => ErrorSeverity::Warning,

            // A failed publish can leave a dangling upload ticket remote-side.
            CrownpeakError::UploadFailed { .. } => ErrorSeverity::Critical,

            CrownpeakError::Validation { .. }
            | CrownpeakError::Permission { .. }
            | CrownpeakError::AmbiguousName { .. }
            | CrownpeakError::FileRead { .. }
            | CrownpeakError::Json(_)
            | CrownpeakError::Io(_)
            | CrownpeakError::Config { .. }
            | CrownpeakError::Internal(_) => ErrorSeverity::Error,
        }
    }

    /// Creates a transport error for a failed endpoint call.
    pub fn transport_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CrownpeakError::Transport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        CrownpeakError::Validation {
            message: message.into(),
        }
    }

    /// Creates a permission error.
    pub fn permission_error(message: impl Into<String>) -> Self {
        CrownpeakError::Permission {
            message: message.into(),
        }
    }

    /// Creates a file-related error.
    pub fn file_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CrownpeakError::FileRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        CrownpeakError::Config {
            message: message.into(),
        }
    }

    /// Wraps a lower-level error as a publish-protocol failure at `stage`.
    pub fn upload_failed(stage: UploadStage, source: CrownpeakError) -> Self {
        CrownpeakError::UploadFailed {
            stage,
            source: Box::new(source),
        }
    }
}

/// Error severity levels for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Low impact errors that don't affect core functionality
    Warning,
    /// Standard errors that affect specific operations
    Error,
    /// High impact errors that affect core functionality
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
