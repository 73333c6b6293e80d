// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mrzgate-client — Talks to the verification service. Sends the exported
// region, reads the reply into a normalized outcome, and holds every attempt
// on screen for a minimum duration so the scanning state never flickers.

pub mod http;
pub mod normalize;
pub mod submission;
pub mod transport;

pub use http::HttpTransport;
pub use normalize::normalize;
pub use submission::{PendingSubmission, SubmissionController};
pub use transport::VerificationTransport;
