// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mrzgate — Core types, error definitions, configuration, and the message
// catalog shared across all crates.

pub mod config;
pub mod error;
pub mod messages;
pub mod types;

pub use config::{CropOptions, FlowConfig, ResponseSchema};
pub use error::MrzgateError;
pub use messages::{MessageCatalog, MessageKey};
pub use types::*;
