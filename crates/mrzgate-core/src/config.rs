// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow configuration: endpoint, timing floor, crop options, and the shape of
// the verification service's response.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MrzgateError, Result};
use crate::messages::{MessageCatalog, MessageKey};

/// Options handed to the crop tool for every new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Fixed width/height ratio of the crop box (10:6 for TD1 cards).
    pub aspect_ratio: f32,
    /// Share of the largest fitting box covered by the initial crop (0..=1).
    pub auto_crop_area: f32,
    /// Draw the MRZ guide band inside the crop box.
    pub guides: bool,
    /// Width of the exported region in pixels.
    pub export_width: u32,
    /// Height of the exported region in pixels.
    pub export_height: u32,
    /// JPEG quality of the exported region (1-100).
    pub jpeg_quality: u8,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: 10.0 / 6.0,
            auto_crop_area: 0.8,
            guides: true,
            export_width: 1000,
            export_height: 600,
            jpeg_quality: 92,
        }
    }
}

/// Field names and values used to interpret a service response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSchema {
    /// Name of the discriminator field.
    pub status_field: String,
    /// Discriminator value meaning success. Anything else is a failure.
    pub success_value: String,
    /// Field carrying the failure message.
    pub message_field: String,
    /// Reason used when a failure carries no message. `None` uses the
    /// catalog's localized "unknown error" text.
    pub default_reason: Option<String>,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self {
            status_field: "status".into(),
            success_value: "success".into(),
            message_field: "message".into(),
            default_reason: None,
        }
    }
}

impl ResponseSchema {
    /// The older service contract: `{"status": "ok"}` / `{"status": "...", "msg": "..."}`.
    pub fn legacy() -> Self {
        Self {
            success_value: "ok".into(),
            message_field: "msg".into(),
            ..Self::default()
        }
    }

    /// The configured default reason, or the catalog's when none is set.
    pub fn default_reason_or(&self, catalog: &MessageCatalog) -> String {
        self.default_reason
            .clone()
            .unwrap_or_else(|| catalog.get(MessageKey::UnknownError).to_string())
    }
}

/// Persistent flow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Base URL of the verification service.
    pub endpoint: String,
    /// Path of the upload route, appended to `endpoint`.
    pub upload_path: String,
    /// Message catalog locale (`en`, `tr`).
    pub locale: String,
    /// Minimum time the scanning state stays visible.
    pub min_scan_duration_ms: u64,
    /// Optional whole-request timeout. `None` waits as long as the server does.
    pub request_timeout_ms: Option<u64>,
    pub crop: CropOptions,
    pub response: ResponseSchema,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5001".into(),
            upload_path: "/upload".into(),
            locale: "en".into(),
            min_scan_duration_ms: 3000,
            request_timeout_ms: None,
            crop: CropOptions::default(),
            response: ResponseSchema::default(),
        }
    }
}

impl FlowConfig {
    /// Full URL of the upload route.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.upload_path.trim_start_matches('/')
        )
    }

    pub fn min_scan_duration(&self) -> Duration {
        Duration::from_millis(self.min_scan_duration_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Reject settings the flow cannot run with.
    pub fn validate(&self) -> Result<()> {
        let crop = &self.crop;
        if !(crop.aspect_ratio.is_finite() && crop.aspect_ratio > 0.0) {
            return Err(MrzgateError::Config(format!(
                "aspect_ratio must be positive, got {}",
                crop.aspect_ratio
            )));
        }
        if !(crop.auto_crop_area > 0.0 && crop.auto_crop_area <= 1.0) {
            return Err(MrzgateError::Config(format!(
                "auto_crop_area must be in (0, 1], got {}",
                crop.auto_crop_area
            )));
        }
        if crop.export_width == 0 || crop.export_height == 0 {
            return Err(MrzgateError::Config(format!(
                "export size must be non-zero, got {}x{}",
                crop.export_width, crop.export_height
            )));
        }
        if !(1..=100).contains(&crop.jpeg_quality) {
            return Err(MrzgateError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                crop.jpeg_quality
            )));
        }
        if self.response.status_field.is_empty() {
            return Err(MrzgateError::Config("status_field must not be empty".into()));
        }
        if self.endpoint.is_empty() {
            return Err(MrzgateError::Config("endpoint must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FlowConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_scan_duration(), Duration::from_millis(3000));
        assert_eq!(config.crop.export_width, 1000);
        assert_eq!(config.crop.export_height, 600);
    }

    #[test]
    fn upload_url_joins_slashes_once() {
        let config = FlowConfig {
            endpoint: "https://verify.example/".into(),
            ..Default::default()
        };
        assert_eq!(config.upload_url(), "https://verify.example/upload");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: FlowConfig =
            serde_json::from_str(r#"{"locale": "tr", "response": {"message_field": "msg"}}"#)
                .unwrap();
        assert_eq!(config.locale, "tr");
        assert_eq!(config.response.message_field, "msg");
        assert_eq!(config.response.status_field, "status");
        assert_eq!(config.crop, CropOptions::default());
    }

    #[test]
    fn legacy_schema_uses_ok_and_msg() {
        let schema = ResponseSchema::legacy();
        assert_eq!(schema.success_value, "ok");
        assert_eq!(schema.message_field, "msg");
        assert_eq!(schema.status_field, "status");
    }

    #[test]
    fn default_reason_comes_from_catalog_unless_set() {
        let mut schema = ResponseSchema::default();
        assert_eq!(
            schema.default_reason_or(&MessageCatalog::default()),
            "unknown error"
        );
        assert_eq!(
            schema.default_reason_or(&MessageCatalog::for_locale("tr")),
            "Bilinmeyen hata"
        );
        schema.default_reason = Some("no MRZ".into());
        assert_eq!(schema.default_reason_or(&MessageCatalog::default()), "no MRZ");
    }

    #[test]
    fn validate_rejects_zero_export_size() {
        let mut config = FlowConfig::default();
        config.crop.export_height = 0;
        assert!(matches!(config.validate(), Err(MrzgateError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_auto_crop_area() {
        let mut config = FlowConfig::default();
        config.crop.auto_crop_area = 1.5;
        assert!(config.validate().is_err());
    }
}
