// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::dispatch::Dispatch;
use crate::sync::transport_tests::{MockTransport, Script};
use crate::test_helpers::{chained, event_frame, round, snapshot, MemorySink, MockHttpClient};
use tokio::sync::mpsc;

fn client(http: Arc<MockHttpClient>) -> TriviaClient {
    TriviaClient::with_http_client(
        ClientConfig::default(),
        Arc::new(MemorySink::default()),
        SignalSender::disabled(),
        http,
    )
    .unwrap()
}

#[test]
fn invalid_config_is_rejected() {
    let config = ClientConfig {
        stream_url: "http://localhost:8080/stream".to_string(),
        ..ClientConfig::default()
    };
    let result = TriviaClient::with_http_client(
        config,
        Arc::new(MemorySink::default()),
        SignalSender::disabled(),
        Arc::new(MockHttpClient::new()),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn register_uses_registration_endpoint() {
    let http = Arc::new(MockHttpClient::new());
    http.respond(Ok(Vec::new()));
    let client = client(http.clone());

    assert!(client.register("Owls").await.unwrap());
    assert_eq!(http.requests()[0].0.url, "http://localhost:8080/register/Owls");
}

#[tokio::test]
async fn watch_applies_snapshot_then_stream() {
    let http = Arc::new(MockHttpClient::new());
    let baseline = snapshot(1, round(1, "Film"));
    http.respond_json(&baseline);
    let (e2, e3) = (chained(2, 1), chained(3, 2));
    let (transport, handle) = MockTransport::scripted(vec![Script::Open {
        frames: vec![event_frame(e2.clone()), event_frame(e3.clone())],
        stay_open: true,
    }]);
    let client = client(http.clone());
    let cancel = client.cancel_token();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let collector = async move {
        let mut seen = Vec::new();
        while seen.len() < 3 {
            match rx.recv().await {
                Some(dispatch) => seen.push(dispatch),
                None => break,
            }
        }
        cancel.cancel();
        seen
    };

    let (result, seen) = tokio::join!(client.watch(tx, transport), collector);

    result.unwrap();
    assert_eq!(
        seen,
        vec![
            Dispatch::Snapshot(baseline),
            Dispatch::Event(e2.content),
            Dispatch::Event(e3.content),
        ]
    );
    assert_eq!(handle.connects(), 1);
    assert_eq!(http.requests()[0].0.url, "http://localhost:8080/status");
}
