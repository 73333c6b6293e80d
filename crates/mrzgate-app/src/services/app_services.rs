// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads settings and builds capture flows for the
// Dioxus UI.
//
// Settings live in `config.json` in the data directory. `MRZGATE_ENDPOINT`
// overrides the stored endpoint for the current run without being persisted.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mrzgate_client::HttpTransport;
use mrzgate_core::FlowConfig;
use mrzgate_core::MessageCatalog;
use mrzgate_core::error::Result;
use mrzgate_document::RasterCropTool;
use mrzgate_flow::{DisplayModel, FlowController};
use tracing::{info, warn};

use super::data_dir;

/// Environment variable overriding the service endpoint.
pub const ENDPOINT_ENV: &str = "MRZGATE_ENDPOINT";

const CONFIG_FILE: &str = "config.json";

/// Shared services accessible from all components via `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<FlowConfig>>,
}

impl AppServices {
    /// Initialise from the platform data directory and the environment.
    pub fn init() -> Self {
        Self::init_in(data_dir::data_dir(), std::env::var(ENDPOINT_ENV).ok())
    }

    fn init_in(dir: PathBuf, endpoint_override: Option<String>) -> Self {
        info!(path = %dir.display(), "initialising app services");

        let mut config = match load_config(&dir) {
            Ok(Some(config)) => config,
            Ok(None) => FlowConfig::default(),
            Err(e) => {
                warn!(error = %e, "stored config unreadable, using defaults");
                FlowConfig::default()
            }
        };
        apply_endpoint_override(&mut config, endpoint_override);

        if let Err(e) = config.validate() {
            warn!(error = %e, "stored config invalid, using defaults");
            config = FlowConfig::default();
        }

        info!(endpoint = %config.endpoint, locale = %config.locale, "settings loaded");
        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    /// Get a clone of the current settings.
    pub fn config(&self) -> FlowConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Message catalog for the configured locale.
    pub fn catalog(&self) -> MessageCatalog {
        MessageCatalog::for_locale(&self.config().locale)
    }

    /// Validate, persist, and adopt new settings.
    pub fn save_config(&self, config: &FlowConfig) -> Result<()> {
        config.validate()?;
        persist_config(&self.data_dir, config)?;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        info!(endpoint = %config.endpoint, "settings saved");
        Ok(())
    }

    /// Build a fresh capture flow from the current settings.
    pub fn new_flow(&self) -> Result<FlowController<DisplayModel>> {
        let config = self.config();
        let transport = Arc::new(HttpTransport::from_config(&config)?);
        FlowController::from_config(
            &config,
            Arc::new(RasterCropTool::factory()),
            transport,
            DisplayModel::default(),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

fn load_config(data_dir: &Path) -> Result<Option<FlowConfig>> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

fn persist_config(data_dir: &Path, config: &FlowConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(data_dir.join(CONFIG_FILE), json)?;
    Ok(())
}

fn apply_endpoint_override(config: &mut FlowConfig, endpoint: Option<String>) {
    if let Some(endpoint) = endpoint.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        info!(endpoint = %endpoint, "endpoint overridden from {}", ENDPOINT_ENV);
        config.endpoint = endpoint;
    }
}
