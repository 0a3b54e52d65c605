#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chromastudio::{ChromaClient, ClientConfig, MediaKind, Phase, StatusSink};
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

pub const TEST_USER: &str = "user-1";
pub const TEST_EFFECT: &str = "photoToVectorArt";

/// A client pointed at the mock server, with a fast polling cadence so
/// multi-attempt tests stay quick.
pub fn test_client(server: &MockServer, kind: MediaKind) -> ChromaClient {
    test_client_with_polling(server, kind, Duration::from_millis(10), 60)
}

pub fn test_client_with_polling(
    server: &MockServer,
    kind: MediaKind,
    interval: Duration,
    max_polls: u32,
) -> ChromaClient {
    let config = ClientConfig::new(TEST_USER, TEST_EFFECT, kind)
        .unwrap()
        .with_urls(&server.uri(), &format!("{}/cdn/", server.uri()))
        .unwrap()
        .with_polling(interval, max_polls);
    ChromaClient::new(config).unwrap()
}

/// Responds `processing` for the first `pending` queries, then the given
/// terminal body.
pub struct StagedResponder {
    hits: AtomicUsize,
    pending: usize,
    terminal: serde_json::Value,
}

impl StagedResponder {
    pub fn new(pending: usize, terminal: serde_json::Value) -> Self {
        Self {
            hits: AtomicUsize::new(0),
            pending,
            terminal,
        }
    }
}

impl wiremock::Respond for StagedResponder {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let count = self.hits.fetch_add(1, Ordering::SeqCst);
        let body = if count < self.pending {
            json!({ "status": "processing" })
        } else {
            self.terminal.clone()
        };
        ResponseTemplate::new(200).set_body_json(body)
    }
}

/// Records every notification for ordering assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub phases: Mutex<Vec<String>>,
    pub results: Mutex<Vec<(String, MediaKind)>>,
}

impl StatusSink for RecordingSink {
    fn phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase.to_string());
    }

    fn result_ready(&self, url: &str, kind: MediaKind) {
        self.results
            .lock()
            .unwrap()
            .push((url.to_string(), kind));
    }
}
