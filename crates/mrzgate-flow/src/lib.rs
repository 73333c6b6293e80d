// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mrzgate-flow — The capture flow. `FlowController` sequences image
// selection, the crop session, submission, and presentation, and writes
// everything the user sees through a `DisplaySurface`.

pub mod controller;
pub mod presenter;
pub mod surface;

pub use controller::{FlowController, FlowTrigger};
pub use presenter::ResultPresenter;
pub use surface::{DisplayModel, DisplaySurface, ResultArea};
