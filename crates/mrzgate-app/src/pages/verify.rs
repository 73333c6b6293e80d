// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verify page — choose or drop a document photo, frame the MRZ inside the
// crop box, and send the region to the verification service.
//
// All flow mutations happen on the UI task. Decoding and submissions are
// spawned; their completions write back into the flow signal.

use dioxus::prelude::*;

use mrzgate_core::error::Result;
use mrzgate_core::messages::MessageKey;
use mrzgate_core::types::{CandidateOrigin, FileCandidate};
use mrzgate_document::CropSession;
use mrzgate_document::export::png_data_uri;
use mrzgate_document::source;
use mrzgate_flow::{DisplayModel, FlowController, ResultArea};

use crate::services::app_services::AppServices;

type Flow = FlowController<DisplayModel>;

const PREVIEW_WIDTH: u32 = 720;
const PREVIEW_HEIGHT: u32 = 480;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

#[component]
pub fn Verify() -> Element {
    let svc = use_context::<AppServices>();
    let catalog = svc.catalog();
    let title = catalog.get(MessageKey::VerifyTab);
    let unavailable = catalog.get(MessageKey::CaptureUnavailable);
    let flow = use_hook(move || {
        svc.new_flow().map(Signal::new).map_err(|e| {
            tracing::error!(error = %e, "capture flow could not start");
            e.to_string()
        })
    });

    match flow {
        Ok(flow) => rsx! { CapturePanel { flow } },
        Err(msg) => rsx! {
            div {
                h1 { "{title}" }
                p { style: "color: #ff3b30;", "{unavailable}: {msg}" }
            }
        },
    }
}

#[component]
fn CapturePanel(flow: Signal<Flow>) -> Element {
    let mut flow = flow;
    let mut preview = use_signal(|| Option::<String>::None);
    let mut dragging = use_signal(|| false);

    let catalog = *flow.read().catalog();
    let model = flow.read().surface().clone();
    let has_session = flow.read().session().is_some();
    let title = catalog.get(MessageKey::VerifyTab);
    let verify_label = catalog.get(MessageKey::VerifyAction);
    let start_over_label = catalog.get(MessageKey::StartOver);
    let upload_label = model
        .selection_label
        .clone()
        .unwrap_or_else(|| catalog.get(MessageKey::ChooseFile).to_string());
    let upload_style = if *dragging.read() {
        "padding: 32px; border: 2px dashed #3b82f6; border-radius: 12px; background: rgba(59, 130, 246, 0.05); text-align: center; cursor: pointer;"
    } else {
        "padding: 32px; border: 2px dashed #ccc; border-radius: 12px; background: #fafafa; text-align: center; cursor: pointer;"
    };

    rsx! {
        div {
            h1 { "{title}" }

            // Upload area: click to pick, or drop a file onto it
            div {
                style: "{upload_style}",
                onclick: move |_| {
                    let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file()
                    else {
                        return;
                    };
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let media_type = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .and_then(source::media_type_from_extension)
                        .unwrap_or_default();
                    match std::fs::read(&path) {
                        Ok(bytes) => {
                            tracing::info!(path = %path.display(), bytes = bytes.len(), "image picked");
                            let candidate = FileCandidate::new(name, media_type, bytes, CandidateOrigin::Picker);
                            spawn(select(flow, preview, vec![candidate]));
                        }
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "could not read picked file");
                        }
                    }
                },
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: move |evt| {
                    evt.prevent_default();
                    dragging.set(false);
                    let Some(file) = evt.files().into_iter().next() else {
                        return;
                    };
                    spawn(async move {
                        let name = file.name();
                        let media_type = file.content_type().unwrap_or_default();
                        match file.read_bytes().await {
                            Ok(bytes) => {
                                let candidate = FileCandidate::new(name, media_type, bytes.to_vec(), CandidateOrigin::Drop);
                                select(flow, preview, vec![candidate]).await;
                            }
                            Err(e) => {
                                tracing::warn!(name = %name, error = %e, "could not read dropped file");
                            }
                        }
                    });
                },
                p { style: "margin: 0; font-size: 16px;", "{upload_label}" }
            }

            if let Some(ref uri) = *preview.read() {
                div { style: "margin: 16px 0; text-align: center;",
                    img {
                        src: "{uri}",
                        style: "max-width: 100%; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.15);",
                    }
                }
            }

            if has_session {
                // Crop adjustments
                div { style: "display: flex; gap: 8px; justify-content: center; margin: 8px 0;",
                    AdjustButton { label: "\u{2190}", on_press: move |_| adjust(flow, preview, |s| { let step = nudge_step(s); s.nudge(-step, 0.0) }) }
                    AdjustButton { label: "\u{2191}", on_press: move |_| adjust(flow, preview, |s| { let step = nudge_step(s); s.nudge(0.0, -step) }) }
                    AdjustButton { label: "\u{2193}", on_press: move |_| adjust(flow, preview, |s| { let step = nudge_step(s); s.nudge(0.0, step) }) }
                    AdjustButton { label: "\u{2192}", on_press: move |_| adjust(flow, preview, |s| { let step = nudge_step(s); s.nudge(step, 0.0) }) }
                    AdjustButton { label: "+", on_press: move |_| adjust(flow, preview, |s| s.zoom(1.0 / 1.1)) }
                    AdjustButton { label: "\u{2212}", on_press: move |_| adjust(flow, preview, |s| s.zoom(1.1)) }
                }

                div { style: "display: flex; gap: 8px; margin-top: 8px;",
                    button {
                        style: "flex: 2; padding: 14px; border-radius: 8px; border: none; background: #3b82f6; color: white; font-size: 16px;",
                        onclick: move |_| {
                            let pending = flow.write().on_verify();
                            preview.set(render_preview(&flow.read()));
                            if let Some(pending) = pending {
                                spawn(async move {
                                    let outcome = pending.await;
                                    flow.write().on_submission_settled(outcome);
                                    preview.set(render_preview(&flow.read()));
                                });
                            }
                        },
                        "{verify_label}"
                    }
                    button {
                        style: "flex: 1; padding: 14px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white; font-size: 14px;",
                        onclick: move |_| {
                            flow.write().teardown();
                            preview.set(None);
                        },
                        "{start_over_label}"
                    }
                }
            }

            {result_view(&model.result)}
        }
    }
}

#[component]
fn AdjustButton(label: &'static str, on_press: EventHandler<MouseEvent>) -> Element {
    rsx! {
        button {
            style: "width: 44px; height: 44px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 18px;",
            onclick: move |evt| on_press.call(evt),
            "{label}"
        }
    }
}

fn result_view(area: &ResultArea) -> Element {
    match area {
        ResultArea::Empty => rsx! {},
        ResultArea::Loading(msg) => rsx! {
            div { class: "loading-message",
                style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: #f0f4ff; color: #3b82f6; text-align: center;",
                "{msg}"
            }
        },
        ResultArea::Success { title, body } => rsx! {
            div { class: "success-card",
                style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: #ecfdf5; border: 1px solid #34c759;",
                h3 { style: "margin-top: 0;", "{title}" }
                pre { style: "white-space: pre-wrap; font-size: 13px; margin: 0;", "{body}" }
            }
        },
        ResultArea::Failure { message } => rsx! {
            div { class: "error-card",
                style: "margin-top: 16px; padding: 16px; border-radius: 8px; background: #fef2f2; border: 1px solid #ff3b30; color: #b91c1c;",
                "{message}"
            }
        },
    }
}

/// Decode the candidates and hand the result to the flow.
async fn select(
    mut flow: Signal<Flow>,
    mut preview: Signal<Option<String>>,
    candidates: Vec<FileCandidate>,
) {
    let decoded = source::load(candidates).await;
    let opened = {
        let mut guard = flow.write();
        let opened = guard.apply_selection(decoded);
        if let Some(session) = guard.session_mut() {
            session.resize_viewport(PREVIEW_WIDTH, PREVIEW_HEIGHT);
        }
        opened
    };
    if opened {
        preview.set(render_preview(&flow.read()));
    }
}

fn adjust(
    mut flow: Signal<Flow>,
    mut preview: Signal<Option<String>>,
    op: impl FnOnce(&mut CropSession) -> Result<()>,
) {
    {
        let mut guard = flow.write();
        let Some(session) = guard.session_mut() else {
            return;
        };
        if let Err(e) = op(session) {
            tracing::warn!(error = %e, "crop adjustment failed");
            return;
        }
    }
    preview.set(render_preview(&flow.read()));
}

/// A twentieth of the crop box width per press.
fn nudge_step(session: &CropSession) -> f32 {
    session.crop_rect().map(|r| r.width / 20.0).unwrap_or(10.0)
}

fn render_preview(flow: &Flow) -> Option<String> {
    let session = flow.session()?;
    let scanning = flow.surface().overlay_visible;
    match session
        .preview(PREVIEW_WIDTH, PREVIEW_HEIGHT, scanning)
        .and_then(|image| png_data_uri(&image))
    {
        Ok(uri) => Some(uri),
        Err(e) => {
            tracing::warn!(error = %e, "preview render failed");
            None
        }
    }
}
