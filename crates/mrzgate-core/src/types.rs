// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the mrzgate capture flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a candidate file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateOrigin {
    /// Chosen through a file picker.
    Picker,
    /// Dropped onto the upload area.
    Drop,
}

/// A file offered by the user, before any validation.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    /// Declared media type. May be empty when the picker does not report one.
    pub media_type: String,
    pub bytes: Vec<u8>,
    pub origin: CandidateOrigin,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
        origin: CandidateOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
            origin,
        }
    }
}

/// An accepted image selection. Superseded by later selections, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedImage {
    /// Build a selection. The media type must already be known to be `image/*`.
    pub fn new(name: String, media_type: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            media_type,
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Crop rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The initial rectangle for an image: the largest `aspect_ratio`
    /// rectangle that fits, scaled by `coverage` (0..=1), centered.
    pub fn auto_crop(img_width: u32, img_height: u32, aspect_ratio: f32, coverage: f32) -> Self {
        let (img_w, img_h) = (img_width as f32, img_height as f32);
        let (mut width, mut height) = if img_w / img_h > aspect_ratio {
            (img_h * aspect_ratio, img_h)
        } else {
            (img_w, img_w / aspect_ratio)
        };
        let coverage = coverage.clamp(0.0, 1.0);
        width *= coverage;
        height *= coverage;
        Self {
            x: (img_w - width) / 2.0,
            y: (img_h - height) / 2.0,
            width,
            height,
        }
    }

    /// Shift the rectangle by `(dx, dy)`, then clamp it inside the image.
    pub fn translated(self, dx: f32, dy: f32, img_width: u32, img_height: u32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
        .clamped(img_width, img_height)
    }

    /// Scale around the center by `factor`, keeping the aspect ratio, then
    /// clamp inside the image.
    pub fn scaled(self, factor: f32, img_width: u32, img_height: u32) -> Self {
        let (cx, cy) = self.center();
        let mut width = (self.width * factor).max(1.0);
        let mut height = (self.height * factor).max(1.0);

        // Shrink uniformly when the scaled box no longer fits the canvas.
        let fit = (img_width as f32 / width).min(img_height as f32 / height).min(1.0);
        width *= fit;
        height *= fit;

        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
        .clamped(img_width, img_height)
    }

    /// Keep the rectangle inside `[0, img_width] x [0, img_height]`.
    ///
    /// The position moves first; the size only shrinks when the rectangle is
    /// larger than the image itself.
    pub fn clamped(self, img_width: u32, img_height: u32) -> Self {
        let (img_w, img_h) = (img_width as f32, img_height as f32);
        let width = self.width.clamp(1.0, img_w.max(1.0));
        let height = self.height.clamp(1.0, img_h.max(1.0));
        Self {
            x: self.x.clamp(0.0, (img_w - width).max(0.0)),
            y: self.y.clamp(0.0, (img_h - height).max(0.0)),
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Round to whole pixels for cropping: `(x, y, width, height)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_pixel_rect(&self) -> (u32, u32, u32, u32) {
        (
            self.x.round().max(0.0) as u32,
            self.y.round().max(0.0) as u32,
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// A rendered crop region, encoded as a JPEG data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedRegion {
    width: u32,
    height: u32,
    data_uri: String,
}

impl ExportedRegion {
    pub fn new(width: u32, height: u32, data_uri: String) -> Self {
        Self {
            width,
            height,
            data_uri,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Body of the verification request: `{"image": "<data URI>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRequest {
    image: String,
}

impl VerificationRequest {
    pub fn new(region: ExportedRegion) -> Self {
        Self {
            image: region.data_uri,
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Where a failure reason came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The service answered with a non-success discriminator.
    Service,
    /// The request never produced a readable response.
    Transport,
}

/// Normalized result of one verification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Success {
        payload: serde_json::Value,
    },
    Failure {
        reason: String,
        kind: FailureKind,
    },
}

impl VerificationOutcome {
    pub fn service_failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
            kind: FailureKind::Service,
        }
    }

    pub fn transport_failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
            kind: FailureKind::Transport,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// States of the capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowState {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// An image is loaded into a live crop session.
    Selected,
    /// A submission is in flight.
    Scanning,
    /// The last settled submission has been rendered.
    Resulted,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Scanning => "scanning",
            Self::Resulted => "resulted",
        };
        f.write_str(name)
    }
}
