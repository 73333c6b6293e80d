// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response normalization: service JSON in, `VerificationOutcome` out.

use mrzgate_core::config::ResponseSchema;
use mrzgate_core::types::VerificationOutcome;
use serde_json::Value;

/// Interpret a service reply according to `schema`.
///
/// The reply is a success only when its discriminator field is the string
/// `schema.success_value`; the whole object then becomes the payload. Any
/// other reply is a service failure whose reason is the message field, or
/// `default_reason` when the message is absent, null, or empty.
pub fn normalize(response: &Value, schema: &ResponseSchema, default_reason: &str) -> VerificationOutcome {
    let Some(object) = response.as_object() else {
        return VerificationOutcome::service_failure(default_reason);
    };

    let status = object.get(&schema.status_field).and_then(Value::as_str);
    if status == Some(schema.success_value.as_str()) {
        return VerificationOutcome::Success {
            payload: response.clone(),
        };
    }

    let reason = match object.get(&schema.message_field) {
        None | Some(Value::Null) => default_reason.to_string(),
        Some(Value::String(text)) if text.is_empty() => default_reason.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    VerificationOutcome::service_failure(reason)
}
