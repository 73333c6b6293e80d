// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Submission controller — one verification attempt per call, held open for at
// least the configured minimum duration.
//
// The floor applies to every outcome: service success, service failure, and
// transport failure all settle no earlier than `min_duration` after submit.
// There are no retries and no cancellation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use mrzgate_core::config::{FlowConfig, ResponseSchema};
use mrzgate_core::messages::MessageCatalog;
use mrzgate_core::types::{ExportedRegion, VerificationOutcome, VerificationRequest};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::normalize::normalize;
use crate::transport::VerificationTransport;

/// A submission in flight. Always resolves to an outcome.
pub struct PendingSubmission {
    inner: Pin<Box<dyn Future<Output = VerificationOutcome> + Send + 'static>>,
}

impl PendingSubmission {
    fn new(future: impl Future<Output = VerificationOutcome> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(future),
        }
    }
}

impl Future for PendingSubmission {
    type Output = VerificationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission").finish_non_exhaustive()
    }
}

/// Turns exported regions into settled verification outcomes.
#[derive(Clone)]
pub struct SubmissionController {
    transport: Arc<dyn VerificationTransport>,
    schema: ResponseSchema,
    default_reason: String,
    min_duration: Duration,
}

impl SubmissionController {
    pub fn new(
        transport: Arc<dyn VerificationTransport>,
        schema: ResponseSchema,
        default_reason: impl Into<String>,
        min_duration: Duration,
    ) -> Self {
        Self {
            transport,
            schema,
            default_reason: default_reason.into(),
            min_duration,
        }
    }

    /// Build a controller from persisted settings and the active catalog.
    pub fn from_config(
        transport: Arc<dyn VerificationTransport>,
        config: &FlowConfig,
        catalog: &MessageCatalog,
    ) -> Self {
        Self::new(
            transport,
            config.response.clone(),
            config.response.default_reason_or(catalog),
            config.min_scan_duration(),
        )
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// Start one verification attempt for `region`.
    ///
    /// The clock starts now, not when the returned future is first polled.
    pub fn submit(&self, region: ExportedRegion) -> PendingSubmission {
        let transport = Arc::clone(&self.transport);
        let schema = self.schema.clone();
        let default_reason = self.default_reason.clone();
        let min_duration = self.min_duration;
        let started = Instant::now();

        PendingSubmission::new(async move {
            let request = VerificationRequest::new(region);
            let outcome = match transport.send(&request).await {
                Ok(body) => normalize(&body, &schema, &default_reason),
                Err(err) => {
                    warn!(error = %err, "verification transport failed");
                    VerificationOutcome::transport_failure(err.to_string())
                }
            };

            let elapsed = started.elapsed();
            if let Some(remaining) = min_duration.checked_sub(elapsed).filter(|d| !d.is_zero()) {
                debug!(?elapsed, ?remaining, "holding result for minimum scan duration");
                sleep(remaining).await;
            }

            info!(
                success = outcome.is_success(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Submission settled"
            );
            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mrzgate_core::error::{MrzgateError, Result};
    use mrzgate_core::types::FailureKind;
    use serde_json::{Value, json};

    struct ScriptedTransport {
        delay: Duration,
        reply: std::result::Result<Value, String>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(delay_ms: u64, reply: std::result::Result<Value, String>) -> Arc<Self> {
            Arc::new(Self {
                delay: Duration::from_millis(delay_ms),
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VerificationTransport for ScriptedTransport {
        async fn send(&self, request: &VerificationRequest) -> Result<Value> {
            self.seen.lock().unwrap().push(request.image().to_string());
            sleep(self.delay).await;
            self.reply.clone().map_err(MrzgateError::Transport)
        }
    }

    fn controller(transport: Arc<ScriptedTransport>) -> SubmissionController {
        SubmissionController::new(
            transport,
            ResponseSchema::default(),
            "unknown error",
            Duration::from_millis(3000),
        )
    }

    fn region() -> ExportedRegion {
        ExportedRegion::new(1000, 600, "data:image/jpeg;base64,QUJD".into())
    }

    fn assert_settled_at(started: Instant, expected_ms: u64) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(expected_ms)
                && elapsed < Duration::from_millis(expected_ms + 50),
            "settled after {elapsed:?}, expected ~{expected_ms}ms"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fast_success_waits_for_floor() {
        let transport = ScriptedTransport::new(200, Ok(json!({"status": "success", "id": 1})));
        let started = Instant::now();
        let outcome = controller(Arc::clone(&transport)).submit(region()).await;

        assert_settled_at(started, 3000);
        assert_eq!(
            outcome,
            VerificationOutcome::Success {
                payload: json!({"status": "success", "id": 1})
            }
        );
        assert_eq!(transport.seen.lock().unwrap().clone(), vec!["data:image/jpeg;base64,QUJD"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_response_is_not_padded() {
        let transport = ScriptedTransport::new(4500, Ok(json!({"status": "error", "message": "MRZ not found"})));
        let started = Instant::now();
        let outcome = controller(transport).submit(region()).await;

        assert_settled_at(started, 4500);
        assert_eq!(outcome, VerificationOutcome::service_failure("MRZ not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_also_waits_for_floor() {
        let transport = ScriptedTransport::new(10, Err("connection refused".into()));
        let started = Instant::now();
        let outcome = controller(transport).submit(region()).await;

        assert_settled_at(started, 3000);
        match outcome {
            VerificationOutcome::Failure { reason, kind } => {
                assert_eq!(kind, FailureKind::Transport);
                assert_eq!(reason, "connection refused");
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clock_starts_at_submit() {
        let transport = ScriptedTransport::new(0, Ok(json!({"status": "success"})));
        let started = Instant::now();
        let pending = controller(transport).submit(region());
        sleep(Duration::from_millis(1000)).await;
        let _ = pending.await;

        assert_settled_at(started, 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_submission_can_be_spawned() {
        let transport = ScriptedTransport::new(100, Ok(json!({"status": "success"})));
        let pending = controller(transport).submit(region());
        let outcome = tokio::spawn(pending).await.unwrap();
        assert!(outcome.is_success());
    }

    #[test]
    fn from_config_uses_catalog_default_reason() {
        let transport = ScriptedTransport::new(0, Ok(Value::Null));
        let config = FlowConfig {
            min_scan_duration_ms: 1500,
            ..FlowConfig::default()
        };
        let controller =
            SubmissionController::from_config(transport, &config, &MessageCatalog::for_locale("tr"));
        assert_eq!(controller.min_duration(), Duration::from_millis(1500));
        assert_eq!(controller.default_reason, "Bilinmeyen hata");
    }
}
