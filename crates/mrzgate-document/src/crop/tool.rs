// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop-tool capability.
//
// The flow never edits crop rectangles itself. It drives whatever widget
// implements `CropTool`: bind an image, decorate it once it is ready, read or
// adjust the rectangle, render the region, and release it.

use image::DynamicImage;
use mrzgate_core::config::CropOptions;
use mrzgate_core::error::Result;
use mrzgate_core::types::CropRect;

/// Extra elements layered on top of the crop box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Band marking where the machine-readable zone must sit.
    Guide { label: String },
    /// Anchor for the animated scanning overlay shown while verifying.
    ScanOverlay,
}

/// One-shot callback fired when a freshly initialized tool can take decorations.
pub type ReadyCallback = Box<dyn FnOnce(&mut dyn CropTool) + Send>;

/// A crop-editing widget bound to at most one image.
pub trait CropTool: Send {
    /// Bind `image` and configure the crop box from `options`.
    ///
    /// Implementations call `ready` exactly once, after the crop box exists.
    /// Later viewport changes must not call it again.
    fn initialize(
        &mut self,
        image: DynamicImage,
        options: &CropOptions,
        ready: ReadyCallback,
    ) -> Result<()>;

    /// Layer a decoration on the crop box.
    fn append_decoration(&mut self, decoration: Decoration);

    /// Decorations added so far, in insertion order.
    fn decorations(&self) -> &[Decoration];

    /// Size of the bound image, if any.
    fn image_size(&self) -> Option<(u32, u32)>;

    /// Current crop rectangle, if an image is bound.
    fn crop_rect(&self) -> Option<CropRect>;

    /// Replace the crop rectangle. The tool keeps it inside the image and at
    /// its configured aspect ratio.
    fn set_crop_rect(&mut self, rect: CropRect) -> Result<()>;

    /// The on-screen area changed size.
    fn resize_viewport(&mut self, width: u32, height: u32);

    /// Render the current crop rectangle at exactly `width` x `height`.
    fn render(&self, width: u32, height: u32) -> Result<DynamicImage>;

    /// Render the whole image scaled to fit `max_width` x `max_height`, with
    /// the crop box and decorations drawn on top.
    fn preview(&self, max_width: u32, max_height: u32, scanning: bool) -> Result<DynamicImage>;

    /// Release the bound image and all editing state.
    fn destroy(&mut self);
}

/// Creates a fresh tool for every crop session.
pub trait CropToolFactory: Send + Sync {
    fn create(&self) -> Box<dyn CropTool>;
}

impl<F> CropToolFactory for F
where
    F: Fn() -> Box<dyn CropTool> + Send + Sync,
{
    fn create(&self) -> Box<dyn CropTool> {
        self()
    }
}
