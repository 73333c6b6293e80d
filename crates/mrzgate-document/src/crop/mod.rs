// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop module — the crop-tool capability, its raster implementation, and the
// session that owns one tool instance at a time.

pub mod raster;
pub mod session;
pub mod tool;

pub use raster::RasterCropTool;
pub use session::{CropHost, CropSession};
pub use tool::{CropTool, CropToolFactory, Decoration};
