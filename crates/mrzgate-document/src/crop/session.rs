// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop session lifecycle.
//
// A `CropSession` binds one selected image to one live crop tool. `CropHost`
// owns the only session slot: opening a new session always destroys the
// previous tool before the next one is created, so two tools never hold
// images at the same time.

use std::sync::Arc;

use image::DynamicImage;
use mrzgate_core::config::CropOptions;
use mrzgate_core::error::Result;
use mrzgate_core::messages::{MessageCatalog, MessageKey};
use mrzgate_core::types::{CropRect, ExportedRegion, SelectedImage, SessionId};
use tracing::{debug, info, instrument};

use super::tool::{CropTool, CropToolFactory, Decoration};
use crate::export::encode_region;
use crate::source::DecodedImage;

/// One selected image bound to one live crop tool.
pub struct CropSession {
    id: SessionId,
    selection: SelectedImage,
    tool: Box<dyn CropTool>,
    options: CropOptions,
    live: bool,
}

impl CropSession {
    /// Bind `image` to `tool` and decorate it once the tool is ready.
    #[instrument(skip_all, fields(name = %image.selection.name()))]
    pub fn open(
        image: DecodedImage,
        mut tool: Box<dyn CropTool>,
        options: &CropOptions,
        catalog: &MessageCatalog,
    ) -> Result<Self> {
        let label = catalog.get(MessageKey::GuideLabel).to_string();
        let DecodedImage { selection, image } = image;

        tool.initialize(
            image,
            options,
            Box::new(move |tool: &mut dyn CropTool| {
                tool.append_decoration(Decoration::Guide { label });
                tool.append_decoration(Decoration::ScanOverlay);
            }),
        )?;

        let id = SessionId::new();
        info!(session_id = %id, "Crop session opened");
        Ok(Self {
            id,
            selection,
            tool,
            options: options.clone(),
            live: true,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn selection(&self) -> &SelectedImage {
        &self.selection
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.tool.crop_rect()
    }

    pub fn decorations(&self) -> &[Decoration] {
        self.tool.decorations()
    }

    /// Move the crop box by `(dx, dy)` source pixels.
    pub fn nudge(&mut self, dx: f32, dy: f32) -> Result<()> {
        let (Some(rect), Some((w, h))) = (self.tool.crop_rect(), self.tool.image_size()) else {
            return Ok(());
        };
        self.tool.set_crop_rect(rect.translated(dx, dy, w, h))
    }

    /// Scale the crop box around its center.
    pub fn zoom(&mut self, factor: f32) -> Result<()> {
        let (Some(rect), Some((w, h))) = (self.tool.crop_rect(), self.tool.image_size()) else {
            return Ok(());
        };
        self.tool.set_crop_rect(rect.scaled(factor, w, h))
    }

    pub fn set_crop_rect(&mut self, rect: CropRect) -> Result<()> {
        self.tool.set_crop_rect(rect)
    }

    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        self.tool.resize_viewport(width, height);
    }

    /// Render and encode the crop region at the configured export size.
    ///
    /// # Panics
    ///
    /// Panics if the session has been closed. Exporting from a dead session
    /// is a caller bug, not a user-facing condition.
    pub fn export_region(&self) -> Result<ExportedRegion> {
        self.export_region_sized(self.options.export_width, self.options.export_height)
    }

    /// Render and encode the crop region at exactly `width` x `height`.
    ///
    /// # Panics
    ///
    /// Panics if the session has been closed.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn export_region_sized(&self, width: u32, height: u32) -> Result<ExportedRegion> {
        assert!(self.live, "export_region called on closed crop session {}", self.id);
        let rendered = self.tool.render(width, height)?;
        encode_region(&rendered, self.options.jpeg_quality)
    }

    /// Whole image with the crop box drawn on top, for display.
    pub fn preview(&self, max_width: u32, max_height: u32, scanning: bool) -> Result<DynamicImage> {
        self.tool.preview(max_width, max_height, scanning)
    }

    /// Release the crop tool. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.live {
            return;
        }
        self.tool.destroy();
        self.live = false;
        info!(session_id = %self.id, "Crop session closed");
    }
}

impl Drop for CropSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for CropSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSession")
            .field("id", &self.id)
            .field("selection", &self.selection.name())
            .field("live", &self.live)
            .finish()
    }
}

/// Owner of the single crop-session slot.
pub struct CropHost {
    factory: Arc<dyn CropToolFactory>,
    options: CropOptions,
    catalog: MessageCatalog,
    live: Option<CropSession>,
}

impl CropHost {
    pub fn new(
        factory: Arc<dyn CropToolFactory>,
        options: CropOptions,
        catalog: MessageCatalog,
    ) -> Self {
        Self {
            factory,
            options,
            catalog,
            live: None,
        }
    }

    /// Replace the live session with one bound to `image`.
    ///
    /// The previous session is closed before the new tool is created. If the
    /// new tool fails to initialize, no session is live afterwards.
    pub fn open(&mut self, image: DecodedImage) -> Result<&mut CropSession> {
        if let Some(mut previous) = self.live.take() {
            debug!(session_id = %previous.id(), "Replacing crop session");
            previous.close();
        }
        let tool = self.factory.create();
        let session = CropSession::open(image, tool, &self.options, &self.catalog)?;
        Ok(self.live.insert(session))
    }

    /// Close the live session, if any.
    pub fn close(&mut self) {
        if let Some(mut session) = self.live.take() {
            session.close();
        }
    }

    /// The session in the slot, unless it has been closed directly.
    pub fn live(&self) -> Option<&CropSession> {
        self.live.as_ref().filter(|session| session.is_live())
    }

    pub fn live_mut(&mut self) -> Option<&mut CropSession> {
        self.live.as_mut().filter(|session| session.is_live())
    }
}
