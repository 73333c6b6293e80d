// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — verification service, locale, and crop options.
//
// Saved settings apply to the next capture flow, i.e. the next time the
// Verify tab is opened.

use dioxus::prelude::*;

use crate::services::app_services::AppServices;

#[component]
pub fn Settings() -> Element {
    let svc = use_context::<AppServices>();
    let mut config = use_signal(|| svc.config());
    let mut save_msg = use_signal(|| Option::<(bool, String)>::None);
    let data_dir = svc.data_dir().display().to_string();
    let version = env!("CARGO_PKG_VERSION");

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Verification service" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Endpoint" }
                    input {
                        r#type: "url",
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{config.read().endpoint}",
                        onchange: move |evt| {
                            config.write().endpoint = evt.value().trim().to_string();
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Upload path" }
                    input {
                        style: "width: 160px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{config.read().upload_path}",
                        onchange: move |evt| {
                            config.write().upload_path = evt.value().trim().to_string();
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Minimum scan time (ms)" }
                    input {
                        r#type: "number",
                        style: "width: 100px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.read().min_scan_duration_ms}",
                        onchange: move |evt| {
                            if let Ok(ms) = evt.value().parse::<u64>() {
                                config.write().min_scan_duration_ms = ms;
                            }
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Request timeout (ms, empty for none)" }
                    input {
                        r#type: "number",
                        style: "width: 100px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: config.read().request_timeout_ms.map(|ms| ms.to_string()).unwrap_or_default(),
                        onchange: move |evt| {
                            let value = evt.value();
                            let value = value.trim();
                            if value.is_empty() {
                                config.write().request_timeout_ms = None;
                            } else if let Ok(ms) = value.parse::<u64>() {
                                config.write().request_timeout_ms = Some(ms);
                            }
                        },
                    }
                }
                SettingRow {
                    label: "Legacy response format (status \"ok\" / msg)",
                    checked: config.read().response.success_value == "ok",
                    on_toggle: move |legacy: bool| {
                        let mut config = config.write();
                        let default_reason = config.response.default_reason.take();
                        config.response = if legacy {
                            mrzgate_core::ResponseSchema::legacy()
                        } else {
                            mrzgate_core::ResponseSchema::default()
                        };
                        config.response.default_reason = default_reason;
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Display" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Language" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: locale_label(&config.read().locale),
                        onchange: move |evt| {
                            config.write().locale = locale_tag(&evt.value()).to_string();
                        },
                        option { value: "English", "English" }
                        option { value: "Türkçe", "Türkçe" }
                    }
                }
                SettingRow {
                    label: "Show MRZ guide",
                    checked: config.read().crop.guides,
                    on_toggle: move |v: bool| { config.write().crop.guides = v; },
                }
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #3b82f6; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let current = config.read().clone();
                        match svc.save_config(&current) {
                            Ok(()) => save_msg.set(Some((true, "Settings saved.".into()))),
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some((false, format!("Save failed: {e}"))));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some((ok, ref msg)) = *save_msg.read() {
                p { style: if ok { "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;" } else { "color: #ff3b30; font-size: 14px; text-align: center; margin-top: 8px;" },
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "mrzgate v{version}"
                    br {}
                    "Data directory: {data_dir}"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

fn locale_label(tag: &str) -> &'static str {
    match mrzgate_core::MessageCatalog::for_locale(tag).locale() {
        "tr" => "Türkçe",
        _ => "English",
    }
}

fn locale_tag(label: &str) -> &'static str {
    match label {
        "Türkçe" => "tr",
        _ => "en",
    }
}
