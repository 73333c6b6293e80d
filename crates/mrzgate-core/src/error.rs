// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for mrzgate.

use thiserror::Error;

/// Top-level error type for all mrzgate operations.
#[derive(Debug, Error)]
pub enum MrzgateError {
    // -- Selection errors --
    #[error("not an image: {0}")]
    InvalidSelection(String),

    #[error("image decoding failed: {0}")]
    Decode(String),

    // -- Crop errors --
    #[error("crop tool error: {0}")]
    CropTool(String),

    #[error("region encoding failed: {0}")]
    Encode(String),

    // -- Verification --
    #[error("{0}")]
    Transport(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MrzgateError {
    /// Whether this error is a rejection the user must never see.
    ///
    /// Invalid or undecodable selections are dropped without touching the
    /// flow state or the display.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::InvalidSelection(_) | Self::Decode(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MrzgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_silent() {
        assert!(MrzgateError::InvalidSelection("text/plain".into()).is_silent());
        assert!(MrzgateError::Decode("truncated".into()).is_silent());
    }

    #[test]
    fn transport_error_displays_raw_text() {
        let err = MrzgateError::Transport("Failed to fetch".into());
        assert!(!err.is_silent());
        assert_eq!(err.to_string(), "Failed to fetch");
    }
}
