// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mrzgate — Identity document capture client
//
// Entry point. Initialises logging and app services, and launches the Dioxus
// UI.

mod pages;
mod services;

use dioxus::prelude::*;
use mrzgate_core::MessageKey;

use pages::settings::Settings;
use pages::verify::Verify;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("mrzgate starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Verify {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    // Load settings once; pages read them through context
    let svc = use_hook(AppServices::init);
    use_context_provider(|| svc.clone());

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent bottom tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    let catalog = use_context::<AppServices>().catalog();
    let verify_label = catalog.get(MessageKey::VerifyTab);
    let settings_label = catalog.get(MessageKey::SettingsTab);

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Verify {}, label: verify_label, icon: "V" }
                TabButton { to: Route::Settings {}, label: settings_label, icon: "S" }
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
