// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Display surface — the sink for everything the flow shows.

/// Contents of the result area below the crop tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultArea {
    #[default]
    Empty,
    /// Shown while a submission is in flight.
    Loading(String),
    /// Success title and the pretty-printed payload.
    Success { title: String, body: String },
    /// Prefixed failure reason.
    Failure { message: String },
}

/// Where the flow writes user-visible state.
pub trait DisplaySurface {
    /// Show or hide the scanning overlay on the crop box.
    fn set_overlay_visible(&mut self, visible: bool);

    /// Replace the result area.
    fn set_result(&mut self, area: ResultArea);

    /// Label under the upload area naming the current file.
    fn set_selection_label(&mut self, label: Option<String>);
}

/// Plain in-memory surface. The desktop app renders from it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayModel {
    pub overlay_visible: bool,
    pub result: ResultArea,
    pub selection_label: Option<String>,
}

impl DisplaySurface for DisplayModel {
    fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    fn set_result(&mut self, area: ResultArea) {
        self.result = area;
    }

    fn set_selection_label(&mut self, label: Option<String>) {
        self.selection_label = label;
    }
}
