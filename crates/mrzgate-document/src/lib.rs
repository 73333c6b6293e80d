// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mrzgate-document — Everything between the user's file and the exported
// region: image selection and decoding, the crop-tool capability with its
// in-process raster implementation, crop session lifecycle, and encoding the
// cropped region as a transportable data URI.

pub mod crop;
pub mod export;
pub mod source;

// Re-export the primary types so callers can use `mrzgate_document::CropHost` etc.
pub use crop::raster::RasterCropTool;
pub use crop::session::{CropHost, CropSession};
pub use crop::tool::{CropTool, CropToolFactory, Decoration};
pub use source::DecodedImage;
