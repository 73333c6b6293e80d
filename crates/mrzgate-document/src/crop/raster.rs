// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process crop tool operating on a decoded bitmap with the `image` and
// `imageproc` crates.
//
// The crop box keeps a fixed aspect ratio and never leaves the image. Its
// initial size covers `auto_crop_area` of the largest box that fits.

use image::imageops::FilterType;
use image::{DynamicImage, Rgba};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use mrzgate_core::config::CropOptions;
use mrzgate_core::error::{MrzgateError, Result};
use mrzgate_core::types::CropRect;
use tracing::{debug, info, instrument};

use super::tool::{CropTool, CropToolFactory, Decoration, ReadyCallback};

/// Share of the crop box height, from the bottom, where the MRZ lines sit.
/// Matches the band the verification service reads (rows 350..600 of 600).
const MRZ_BAND_FRACTION: f32 = 250.0 / 600.0;

const CROP_BOX_COLOUR: Rgba<u8> = Rgba([225, 123, 71, 255]);
const GUIDE_COLOUR: Rgba<u8> = Rgba([59, 130, 246, 255]);
const SCAN_LINE_COLOUR: Rgba<u8> = Rgba([34, 197, 94, 255]);

/// Crop tool backed by an in-memory `DynamicImage`.
#[derive(Default)]
pub struct RasterCropTool {
    image: Option<DynamicImage>,
    rect: Option<CropRect>,
    aspect_ratio: f32,
    guides: bool,
    decorations: Vec<Decoration>,
    viewport: Option<(u32, u32)>,
}

impl RasterCropTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory producing a fresh raster tool per session.
    pub fn factory() -> impl CropToolFactory {
        || -> Box<dyn CropTool> { Box::new(RasterCropTool::new()) }
    }

    /// Last viewport size reported by the UI.
    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    fn bound(&self) -> Result<(&DynamicImage, CropRect)> {
        match (&self.image, self.rect) {
            (Some(image), Some(rect)) => Ok((image, rect)),
            _ => Err(MrzgateError::CropTool("no image bound".into())),
        }
    }

    /// Force `rect` to the configured ratio around its own center.
    fn conform(&self, rect: CropRect, img_w: u32, img_h: u32) -> CropRect {
        let (cx, cy) = rect.center();
        let height = rect.height.max(rect.width / self.aspect_ratio);
        let width = height * self.aspect_ratio;
        CropRect::new(cx - width / 2.0, cy - height / 2.0, width, height)
            .scaled(1.0, img_w, img_h)
    }
}

impl CropTool for RasterCropTool {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn initialize(
        &mut self,
        image: DynamicImage,
        options: &CropOptions,
        ready: ReadyCallback,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(MrzgateError::CropTool("image has no pixels".into()));
        }
        let rect = CropRect::auto_crop(
            image.width(),
            image.height(),
            options.aspect_ratio,
            options.auto_crop_area,
        );
        debug!(?rect, "initial crop box");

        self.aspect_ratio = options.aspect_ratio;
        self.guides = options.guides;
        self.rect = Some(rect);
        self.image = Some(image);
        self.decorations.clear();

        ready(self);
        Ok(())
    }

    fn append_decoration(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width(), img.height()))
    }

    fn crop_rect(&self) -> Option<CropRect> {
        self.rect
    }

    fn set_crop_rect(&mut self, rect: CropRect) -> Result<()> {
        let (img_w, img_h) = self
            .image_size()
            .ok_or_else(|| MrzgateError::CropTool("no image bound".into()))?;
        self.rect = Some(self.conform(rect, img_w, img_h));
        Ok(())
    }

    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    #[instrument(skip(self))]
    fn render(&self, width: u32, height: u32) -> Result<DynamicImage> {
        let (image, rect) = self.bound()?;
        let (x, y, w, h) = rect.as_pixel_rect();
        let w = w.min(image.width() - x.min(image.width() - 1));
        let h = h.min(image.height() - y.min(image.height() - 1));

        let region = image
            .crop_imm(x, y, w, h)
            .resize_exact(width, height, FilterType::Lanczos3);
        info!(x, y, w, h, width, height, "Crop region rendered");
        Ok(region)
    }

    fn preview(&self, max_width: u32, max_height: u32, scanning: bool) -> Result<DynamicImage> {
        let (image, rect) = self.bound()?;
        let scale = (max_width as f32 / image.width() as f32)
            .min(max_height as f32 / image.height() as f32);
        let mut canvas = image
            .resize(max_width, max_height, FilterType::Triangle)
            .to_rgba8();

        let scaled = CropRect::new(
            rect.x * scale,
            rect.y * scale,
            rect.width * scale,
            rect.height * scale,
        );
        let (x, y, w, h) = scaled.as_pixel_rect();
        let crop_box = Rect::at(x as i32, y as i32).of_size(w, h);
        draw_hollow_rect_mut(&mut canvas, crop_box, CROP_BOX_COLOUR);

        for decoration in &self.decorations {
            match decoration {
                Decoration::Guide { .. } if self.guides => {
                    let band_h = ((h as f32) * MRZ_BAND_FRACTION).round().max(1.0) as u32;
                    let band = Rect::at(x as i32, (y + h - band_h) as i32).of_size(w, band_h);
                    draw_hollow_rect_mut(&mut canvas, band, GUIDE_COLOUR);
                }
                Decoration::ScanOverlay if scanning => {
                    let line = Rect::at(x as i32, (y + h / 2) as i32).of_size(w, 2);
                    draw_filled_rect_mut(&mut canvas, line, SCAN_LINE_COLOUR);
                }
                _ => {}
            }
        }

        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn destroy(&mut self) {
        if self.image.take().is_some() {
            debug!("Raster crop tool released");
        }
        self.rect = None;
        self.decorations.clear();
        self.viewport = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn initialized(width: u32, height: u32) -> RasterCropTool {
        let mut tool = RasterCropTool::new();
        tool.initialize(
            gradient(width, height),
            &CropOptions::default(),
            Box::new(|tool: &mut dyn CropTool| {
                tool.append_decoration(Decoration::Guide {
                    label: "MRZ AREA".into(),
                });
                tool.append_decoration(Decoration::ScanOverlay);
            }),
        )
        .unwrap();
        tool
    }

    #[test]
    fn initial_box_has_configured_ratio() {
        let tool = initialized(1600, 1200);
        let rect = tool.crop_rect().unwrap();
        assert!((rect.aspect_ratio() - 10.0 / 6.0).abs() < 0.01);
        assert!((rect.width - 1600.0 * 0.8).abs() < 0.5);
    }

    #[test]
    fn ready_fires_once_and_resize_does_not_refire() {
        let mut tool = initialized(800, 600);
        assert_eq!(tool.decorations().len(), 2);
        tool.resize_viewport(400, 300);
        tool.resize_viewport(1200, 900);
        assert_eq!(tool.decorations().len(), 2);
        assert_eq!(tool.viewport(), Some((1200, 900)));
    }

    #[test]
    fn render_is_exact_size_for_any_source() {
        for (w, h) in [(300, 200), (4000, 3000), (640, 1200), (50, 50)] {
            let tool = initialized(w, h);
            let region = tool.render(1000, 600).unwrap();
            assert_eq!(region.dimensions(), (1000, 600), "source {w}x{h}");
        }
    }

    #[test]
    fn set_crop_rect_conforms_to_ratio_and_bounds() {
        let mut tool = initialized(1000, 1000);
        tool.set_crop_rect(CropRect::new(900.0, 900.0, 500.0, 100.0)).unwrap();
        let rect = tool.crop_rect().unwrap();
        assert!((rect.aspect_ratio() - 10.0 / 6.0).abs() < 0.01);
        assert!(rect.x + rect.width <= 1000.01);
        assert!(rect.y + rect.height <= 1000.01);
        assert!(tool.render(1000, 600).is_ok());
    }

    #[test]
    fn preview_fits_requested_box() {
        let tool = initialized(2000, 1000);
        let preview = tool.preview(500, 500, true).unwrap();
        assert_eq!(preview.dimensions(), (500, 250));
    }

    #[test]
    fn destroy_releases_image() {
        let mut tool = initialized(100, 100);
        tool.destroy();
        assert!(tool.image_size().is_none());
        assert!(tool.decorations().is_empty());
        assert!(tool.render(1000, 600).is_err());
        tool.destroy();
    }

    #[test]
    fn factory_creates_unbound_tools() {
        let factory = RasterCropTool::factory();
        let tool = factory.create();
        assert!(tool.crop_rect().is_none());
    }
}
