// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport seam between submission timing and the wire.

use async_trait::async_trait;
use mrzgate_core::error::Result;
use mrzgate_core::types::VerificationRequest;

/// Delivers one verification request and returns the raw JSON reply.
///
/// Implementations make exactly one attempt. Anything that prevents a JSON
/// reply from being read (connection refused, timeout, unparseable body) is
/// reported as `MrzgateError::Transport`.
#[async_trait]
pub trait VerificationTransport: Send + Sync {
    async fn send(&self, request: &VerificationRequest) -> Result<serde_json::Value>;
}
