// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for request signals and error banners.

#![allow(clippy::unwrap_used)]

use super::http::RequestError;
use super::signals::*;
use crate::test_helpers::id;

fn error(source: &str, n: u128, error: RequestError) -> RequestSignal {
    RequestSignal::Error {
        source_id: source.to_string(),
        request_id: id(n),
        error,
    }
}

fn clear(source: &str, n: u128) -> RequestSignal {
    RequestSignal::ClearError {
        source_id: source.to_string(),
        request_id: id(n),
    }
}

#[test]
fn banner_per_source_and_request() {
    let mut banners = ErrorBanners::new();

    assert!(banners.apply(&error("Status", 1, RequestError::Status(500))));
    assert!(banners.apply(&error("Registration", 1, RequestError::Status(503))));
    assert!(banners.apply(&error("Status", 2, RequestError::MaxRetries)));

    assert_eq!(banners.len(), 3);
    assert_eq!(banners.get("Status", id(1)), Some(&RequestError::Status(500)));
    assert_eq!(banners.get("Registration", id(1)), Some(&RequestError::Status(503)));
}

#[test]
fn repeated_error_updates_in_place() {
    let mut banners = ErrorBanners::new();

    assert!(banners.apply(&error("Status", 1, RequestError::Status(500))));
    assert!(!banners.apply(&error("Status", 1, RequestError::Status(500))));
    assert!(banners.apply(&error("Status", 1, RequestError::MaxRetries)));

    assert_eq!(banners.len(), 1);
    assert_eq!(banners.get("Status", id(1)), Some(&RequestError::MaxRetries));
}

#[test]
fn clear_removes_only_matching_banner() {
    let mut banners = ErrorBanners::new();
    banners.apply(&error("Status", 1, RequestError::Status(500)));
    banners.apply(&error("Status", 2, RequestError::Status(500)));

    assert!(banners.apply(&clear("Status", 1)));
    assert!(!banners.apply(&clear("Status", 1)));
    assert!(!banners.apply(&clear("Registration", 2)));

    let remaining: Vec<_> = banners.iter().map(|(s, r, _)| (s.to_string(), r)).collect();
    assert_eq!(remaining, vec![("Status".to_string(), id(2))]);
}

#[tokio::test]
async fn sender_delivers_to_channel() {
    let (sender, mut rx) = SignalSender::channel();
    sender.emit(clear("Status", 4));

    let signal = rx.recv().await.unwrap();
    assert_eq!(signal.source_id(), "Status");
    assert_eq!(signal.request_id(), id(4));
}

#[test]
fn disabled_sender_drops_signals() {
    let sender = SignalSender::disabled();
    sender.emit(clear("Status", 4));
}
