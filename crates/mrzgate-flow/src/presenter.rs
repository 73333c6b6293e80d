// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result presenter — turns a settled outcome into result-area content.

use mrzgate_core::messages::{MessageCatalog, MessageKey};
use mrzgate_core::types::{FailureKind, VerificationOutcome};

use crate::surface::{DisplaySurface, ResultArea};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter {
    catalog: MessageCatalog,
}

impl ResultPresenter {
    pub fn new(catalog: MessageCatalog) -> Self {
        Self { catalog }
    }

    /// Result-area content for `outcome`.
    pub fn present(&self, outcome: &VerificationOutcome) -> ResultArea {
        match outcome {
            VerificationOutcome::Success { payload } => ResultArea::Success {
                title: self.catalog.get(MessageKey::SuccessTitle).to_string(),
                body: serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
            },
            VerificationOutcome::Failure { reason, kind } => {
                let prefix = match kind {
                    FailureKind::Service => self.catalog.get(MessageKey::ErrorPrefix),
                    FailureKind::Transport => self.catalog.get(MessageKey::ConnectionErrorPrefix),
                };
                ResultArea::Failure {
                    message: format!("{prefix}: {reason}"),
                }
            }
        }
    }

    pub fn render(&self, outcome: &VerificationOutcome, surface: &mut dyn DisplaySurface) {
        surface.set_result(self.present(outcome));
    }
}
