// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP transport for the verification service.
//
// One `POST {endpoint}{upload_path}` per request with a JSON body of
// `{"image": "<data URI>"}`. The service reports failures in the body, so the
// HTTP status code is logged but never used to decide the outcome.

use std::time::Duration;

use async_trait::async_trait;
use mrzgate_core::config::FlowConfig;
use mrzgate_core::error::{MrzgateError, Result};
use mrzgate_core::types::VerificationRequest;
use tracing::{debug, instrument, warn};

use crate::transport::VerificationTransport;

/// `reqwest`-backed transport bound to a single upload URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport posting to `url`.
    ///
    /// Without a `timeout` the request waits as long as the server does.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MrzgateError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &FlowConfig) -> Result<Self> {
        Self::new(config.upload_url(), config.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VerificationTransport for HttpTransport {
    #[instrument(skip_all, fields(url = %self.url, image_len = request.image().len()))]
    async fn send(&self, request: &VerificationRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "verification request failed");
                MrzgateError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "verification response received");

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| {
                warn!(error = %e, "verification response was not JSON");
                MrzgateError::Transport(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrzgate_core::types::ExportedRegion;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP/1.1 exchange and hand back the request body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/upload", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buffer = Vec::new();
            let mut chunk = [0u8; 4096];
            let request_body = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                buffer.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buffer).to_string();
                if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                    let length = head
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if rest.len() >= length {
                        break rest.to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            let reply = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request_body
        });

        (url, handle)
    }

    fn request() -> VerificationRequest {
        VerificationRequest::new(ExportedRegion::new(1000, 600, "data:image/jpeg;base64,AAAA".into()))
    }

    #[tokio::test]
    async fn posts_image_field_and_parses_reply() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"status":"success","name":"ANNA"}"#).await;
        let transport = HttpTransport::new(url, None).unwrap();

        let reply = transport.send(&request()).await.unwrap();
        assert_eq!(reply, json!({"status": "success", "name": "ANNA"}));

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent, json!({"image": "data:image/jpeg;base64,AAAA"}));
    }

    #[tokio::test]
    async fn error_status_body_is_still_returned() {
        let (url, _server) =
            serve_once("HTTP/1.1 500 Internal Server Error", r#"{"status":"error","message":"MRZ unreadable"}"#).await;
        let transport = HttpTransport::new(url, None).unwrap();

        let reply = transport.send(&request()).await.unwrap();
        assert_eq!(reply["message"], "MRZ unreadable");
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let (url, _server) = serve_once("HTTP/1.1 502 Bad Gateway", "<html>bad gateway</html>").await;
        let transport = HttpTransport::new(url, None).unwrap();

        let err = transport.send(&request()).await.unwrap_err();
        let MrzgateError::Transport(text) = &err else {
            panic!("expected transport error, got {err:?}");
        };
        assert!(text.starts_with("error decoding response body"), "{text}");
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/upload", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(url, Some(Duration::from_secs(5))).unwrap();
        let err = transport.send(&request()).await.unwrap_err();
        assert!(matches!(err, MrzgateError::Transport(_)));
    }

    #[test]
    fn url_comes_from_config() {
        let config = FlowConfig {
            endpoint: "http://verify.local:5001/".into(),
            ..FlowConfig::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.url(), "http://verify.local:5001/upload");
    }
}
