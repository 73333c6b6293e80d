// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region export — encode rendered bitmaps as self-contained data URIs that
// travel inside JSON text fields.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use mrzgate_core::error::{MrzgateError, Result};
use mrzgate_core::types::ExportedRegion;
use tracing::debug;

/// Encode a rendered region as a JPEG data URI.
pub fn encode_region(image: &DynamicImage, quality: u8) -> Result<ExportedRegion> {
    let jpeg = to_jpeg_bytes(image, quality)?;
    let data_uri = data_uri("image/jpeg", &jpeg);
    debug!(
        width = image.width(),
        height = image.height(),
        jpeg_bytes = jpeg.len(),
        uri_len = data_uri.len(),
        "Region encoded"
    );
    Ok(ExportedRegion::new(image.width(), image.height(), data_uri))
}

/// Encode an image as a PNG data URI, for on-screen previews.
pub fn png_data_uri(image: &DynamicImage) -> Result<String> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| MrzgateError::Encode(format!("PNG encoding failed: {}", err)))?;
    Ok(data_uri("image/png", cursor.get_ref()))
}

/// Split a base64 data URI into its media type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MrzgateError::Encode("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MrzgateError::Encode("data URI has no payload".into()))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| MrzgateError::Encode("data URI is not base64".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| MrzgateError::Encode(format!("invalid base64 payload: {}", err)))?;
    Ok((media_type.to_string(), bytes))
}

fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// JPEG has no alpha channel, so the image is flattened to RGB first.
fn to_jpeg_bytes(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = image.to_rgb8();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| MrzgateError::Encode(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    #[test]
    fn region_is_jpeg_data_uri_with_source_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1000, 600, image::Rgba([10, 20, 30, 128])));
        let region = encode_region(&img, 92).unwrap();
        assert_eq!((region.width(), region.height()), (1000, 600));
        assert!(region.data_uri().starts_with("data:image/jpeg;base64,"));

        let (media_type, bytes) = decode_data_uri(region.data_uri()).unwrap();
        assert_eq!(media_type, "image/jpeg");
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (1000, 600));
    }

    #[test]
    fn preview_uri_is_png() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        assert!(png_data_uri(&img).unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn malformed_data_uris_are_rejected() {
        assert!(decode_data_uri("image/jpeg;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/jpeg;base64").is_err());
        assert!(decode_data_uri("data:image/jpeg,AAAA").is_err());
        assert!(decode_data_uri("data:image/jpeg;base64,@@@").is_err());
    }
}
