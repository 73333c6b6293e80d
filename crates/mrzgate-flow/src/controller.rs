// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow controller — the capture state machine.
//
//   Idle ──ImageDecoded──▶ Selected ──VerifyRequested──▶ Scanning
//                             ▲                             │
//                             └──ImageDecoded── Resulted ◀──┘ SubmissionSettled
//
// A valid selection moves any state to Selected. Rejected selections change
// nothing. Submissions are never cancelled: a result that settles after a
// reselection still renders.

use std::sync::Arc;

use mrzgate_client::{PendingSubmission, SubmissionController, VerificationTransport};
use mrzgate_core::config::FlowConfig;
use mrzgate_core::error::Result;
use mrzgate_core::messages::{MessageCatalog, MessageKey};
use mrzgate_core::types::{FileCandidate, FlowState, VerificationOutcome};
use mrzgate_document::source::{self, DecodedImage};
use mrzgate_document::{CropHost, CropSession, CropToolFactory};
use tracing::{debug, error, info, warn};

use crate::presenter::ResultPresenter;
use crate::surface::{DisplaySurface, ResultArea};

/// Events that move the flow between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTrigger {
    /// An accepted image finished decoding.
    ImageDecoded,
    /// The user asked to verify the current crop.
    VerifyRequested,
    /// A submission produced its outcome.
    SubmissionSettled,
    /// The flow was shut down.
    TornDown,
}

/// Owns the flow state, the crop-session slot, and the display surface.
pub struct FlowController<S: DisplaySurface> {
    state: FlowState,
    host: CropHost,
    submitter: SubmissionController,
    presenter: ResultPresenter,
    catalog: MessageCatalog,
    surface: S,
}

impl<S: DisplaySurface> FlowController<S> {
    pub fn new(
        host: CropHost,
        submitter: SubmissionController,
        catalog: MessageCatalog,
        surface: S,
    ) -> Self {
        Self {
            state: FlowState::Idle,
            host,
            submitter,
            presenter: ResultPresenter::new(catalog),
            catalog,
            surface,
        }
    }

    /// Wire a flow from validated settings.
    pub fn from_config(
        config: &FlowConfig,
        factory: Arc<dyn CropToolFactory>,
        transport: Arc<dyn VerificationTransport>,
        surface: S,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = MessageCatalog::for_locale(&config.locale);
        let host = CropHost::new(factory, config.crop.clone(), catalog);
        let submitter = SubmissionController::from_config(transport, config, &catalog);
        Ok(Self::new(host, submitter, catalog, surface))
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// The live crop session, if an image is selected.
    pub fn session(&self) -> Option<&CropSession> {
        self.host.live()
    }

    pub fn session_mut(&mut self) -> Option<&mut CropSession> {
        self.host.live_mut()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Validate and decode the offered files, then select the result.
    ///
    /// Returns `true` when a new crop session is live.
    pub async fn on_selection(&mut self, candidates: Vec<FileCandidate>) -> bool {
        let decoded = source::load(candidates).await;
        self.apply_selection(decoded)
    }

    /// Apply the outcome of loading a selection.
    ///
    /// Split from `on_selection` so callers that decode elsewhere do not hold
    /// the controller across the decode.
    pub fn apply_selection(&mut self, decoded: Result<DecodedImage>) -> bool {
        let image = match decoded {
            Ok(image) => image,
            Err(err) => {
                warn!(error = %err, silent = err.is_silent(), state = %self.state, "Selection rejected");
                return false;
            }
        };

        let name = image.selection.name().to_string();
        match self.host.open(image) {
            Ok(session) => {
                debug!(session_id = %session.id(), "crop session ready");
            }
            Err(err) => {
                error!(error = %err, name = %name, "Failed to open crop session");
                self.surface.set_overlay_visible(false);
                self.surface.set_result(ResultArea::Empty);
                self.surface.set_selection_label(None);
                self.transition(FlowState::Idle, FlowTrigger::ImageDecoded);
                return false;
            }
        }

        self.surface.set_overlay_visible(false);
        self.surface.set_result(ResultArea::Empty);
        self.surface
            .set_selection_label(Some(self.catalog.file_selected(&name)));
        self.transition(FlowState::Selected, FlowTrigger::ImageDecoded);
        true
    }

    /// Start verifying the current crop.
    ///
    /// Returns `None` without any effect when no crop session is live. When
    /// the region cannot be exported the failure is rendered immediately and
    /// `None` is returned. Otherwise the caller awaits the returned
    /// submission and passes its outcome to [`Self::on_submission_settled`].
    pub fn on_verify(&mut self) -> Option<PendingSubmission> {
        let Some(session) = self.host.live() else {
            debug!(state = %self.state, "verify ignored: no live crop session");
            return None;
        };
        let exported = session.export_region();

        self.surface.set_overlay_visible(true);
        self.surface.set_result(ResultArea::Loading(
            self.catalog.get(MessageKey::Loading).to_string(),
        ));
        self.transition(FlowState::Scanning, FlowTrigger::VerifyRequested);

        match exported {
            Ok(region) => Some(self.submitter.submit(region)),
            Err(err) => {
                error!(error = %err, "Region export failed");
                self.on_submission_settled(VerificationOutcome::service_failure(err.to_string()));
                None
            }
        }
    }

    /// Render a settled submission.
    ///
    /// Outcomes arriving after `teardown` are dropped.
    pub fn on_submission_settled(&mut self, outcome: VerificationOutcome) {
        if self.state == FlowState::Idle {
            debug!(success = outcome.is_success(), "outcome dropped: flow is idle");
            return;
        }
        self.surface.set_overlay_visible(false);
        self.presenter.render(&outcome, &mut self.surface);
        self.transition(FlowState::Resulted, FlowTrigger::SubmissionSettled);
    }

    /// Verify and wait for the result in one step.
    ///
    /// Returns the settled outcome, or `None` when nothing was submitted.
    pub async fn verify(&mut self) -> Option<VerificationOutcome> {
        let pending = self.on_verify()?;
        let outcome = pending.await;
        self.on_submission_settled(outcome.clone());
        Some(outcome)
    }

    /// Release the crop session and return to `Idle`.
    pub fn teardown(&mut self) {
        self.host.close();
        self.surface.set_overlay_visible(false);
        self.surface.set_result(ResultArea::Empty);
        self.surface.set_selection_label(None);
        self.transition(FlowState::Idle, FlowTrigger::TornDown);
    }

    fn transition(&mut self, to: FlowState, trigger: FlowTrigger) {
        let from = self.state;
        self.state = to;
        info!(%from, %to, ?trigger, "Flow transition");
    }
}

impl<S: DisplaySurface> Drop for FlowController<S> {
    fn drop(&mut self) {
        self.host.close();
    }
}
