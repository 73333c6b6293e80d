// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image source — validates user-supplied files (picker or drag-and-drop) and
// decodes the accepted one into a displayable bitmap.
//
// Validation is synchronous and cheap; decoding runs on the blocking pool.
// Neither step touches flow state: callers decide what an accepted image
// means.

use image::DynamicImage;
use mrzgate_core::error::{MrzgateError, Result};
use mrzgate_core::types::{FileCandidate, SelectedImage};
use tracing::{debug, info, instrument};

/// An accepted selection together with its decoded bitmap.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub selection: SelectedImage,
    pub image: DynamicImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Pick the selection out of the offered files.
///
/// Only the first file counts, as with a single-file picker. It is rejected
/// when nothing is offered or when its media type is not `image/*`.
pub fn accept(candidates: Vec<FileCandidate>) -> Result<SelectedImage> {
    let Some(candidate) = candidates.into_iter().next() else {
        return Err(MrzgateError::InvalidSelection("no file offered".into()));
    };

    let media_type = effective_media_type(&candidate)
        .ok_or_else(|| MrzgateError::InvalidSelection(describe(&candidate)))?;

    debug!(
        name = %candidate.name,
        media_type = %media_type,
        origin = ?candidate.origin,
        bytes = candidate.bytes.len(),
        "candidate accepted"
    );
    Ok(SelectedImage::new(candidate.name, media_type, candidate.bytes))
}

/// Decode an accepted selection off the async executor.
#[instrument(skip_all, fields(name = %selection.name(), bytes = selection.len()))]
pub async fn decode(selection: SelectedImage) -> Result<DecodedImage> {
    tokio::task::spawn_blocking(move || decode_blocking(selection))
        .await
        .map_err(|e| MrzgateError::Decode(format!("decoder task failed: {e}")))?
}

/// Validate and decode in one step.
pub async fn load(candidates: Vec<FileCandidate>) -> Result<DecodedImage> {
    let selection = accept(candidates)?;
    decode(selection).await
}

fn decode_blocking(selection: SelectedImage) -> Result<DecodedImage> {
    let image = image::load_from_memory(selection.bytes()).map_err(|err| {
        MrzgateError::Decode(format!("failed to decode {}: {}", selection.name(), err))
    })?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image decoded"
    );
    Ok(DecodedImage { selection, image })
}

/// The media type to trust for a candidate, or `None` if it is not an image.
///
/// A declared type wins. An empty declaration falls back to the extension.
fn effective_media_type(candidate: &FileCandidate) -> Option<String> {
    let declared = candidate.media_type.trim().to_ascii_lowercase();
    if !declared.is_empty() {
        return declared.starts_with("image/").then_some(declared);
    }
    let ext = candidate.name.rsplit_once('.')?.1;
    media_type_from_extension(ext).map(str::to_string)
}

/// Infer an image media type from a file extension.
pub fn media_type_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

fn describe(candidate: &FileCandidate) -> String {
    if candidate.media_type.is_empty() {
        candidate.name.clone()
    } else {
        format!("{} ({})", candidate.name, candidate.media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use mrzgate_core::types::CandidateOrigin;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 180, 90])));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn candidate(name: &str, media_type: &str, bytes: Vec<u8>) -> FileCandidate {
        FileCandidate::new(name, media_type, bytes, CandidateOrigin::Picker)
    }

    #[test]
    fn empty_offer_is_rejected() {
        let err = accept(Vec::new()).unwrap_err();
        assert!(err.is_silent());
    }

    #[test]
    fn non_image_type_is_rejected() {
        let err = accept(vec![candidate("notes.txt", "text/plain", b"hi".to_vec())]).unwrap_err();
        assert!(matches!(err, MrzgateError::InvalidSelection(_)));
    }

    #[test]
    fn media_type_check_ignores_case() {
        let selected = accept(vec![candidate("doc.jpg", "IMAGE/JPEG", vec![1])]).unwrap();
        assert_eq!(selected.media_type(), "image/jpeg");
        assert_eq!(selected.name(), "doc.jpg");
    }

    #[test]
    fn declared_type_beats_extension() {
        let err = accept(vec![candidate("photo.jpg", "application/pdf", vec![1])]);
        assert!(err.is_err());
    }

    #[test]
    fn missing_type_falls_back_to_extension() {
        let selected = accept(vec![candidate("scan.PNG", "", vec![1])]).unwrap();
        assert_eq!(selected.media_type(), "image/png");
        assert!(accept(vec![candidate("scan.heic", "", vec![1])]).is_err());
        assert!(accept(vec![candidate("README", "", vec![1])]).is_err());
    }

    #[test]
    fn only_first_dropped_file_counts() {
        let dropped = vec![
            FileCandidate::new("a.txt", "text/plain", vec![1], CandidateOrigin::Drop),
            FileCandidate::new("b.png", "image/png", vec![1], CandidateOrigin::Drop),
        ];
        assert!(accept(dropped).is_err());
    }

    #[tokio::test]
    async fn load_decodes_valid_image() {
        let decoded = load(vec![candidate("doc.png", "image/png", png_bytes(40, 30))])
            .await
            .unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
        assert_eq!(decoded.selection.name(), "doc.png");
    }

    #[tokio::test]
    async fn corrupt_image_fails_to_decode_silently() {
        let err = load(vec![candidate("doc.jpg", "image/jpeg", b"not a jpeg".to_vec())])
            .await
            .unwrap_err();
        assert!(matches!(err, MrzgateError::Decode(_)));
        assert!(err.is_silent());
    }
}
