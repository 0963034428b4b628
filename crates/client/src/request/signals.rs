// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request error signals.
//!
//! Failed attempts raise an error signal and a later success clears it.
//! Both are tagged with the data source id and the request id, so a UI can
//! keep one banner per outstanding request chain.

use std::collections::BTreeMap;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::http::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSignal {
    Error {
        source_id: String,
        request_id: Uuid,
        error: RequestError,
    },
    ClearError {
        source_id: String,
        request_id: Uuid,
    },
}

impl RequestSignal {
    pub fn source_id(&self) -> &str {
        match self {
            RequestSignal::Error { source_id, .. } | RequestSignal::ClearError { source_id, .. } => {
                source_id
            }
        }
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            RequestSignal::Error { request_id, .. } | RequestSignal::ClearError { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// Outbound half of the signal channel. A disabled sender drops signals.
#[derive(Debug, Clone, Default)]
pub struct SignalSender {
    tx: Option<mpsc::UnboundedSender<RequestSignal>>,
}

impl SignalSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RequestSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SignalSender { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        SignalSender { tx: None }
    }

    pub fn emit(&self, signal: RequestSignal) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is displaying errors.
            let _ = tx.send(signal);
        }
    }
}

/// Outstanding request errors keyed by `(source_id, request_id)`.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanners {
    active: BTreeMap<(String, Uuid), RequestError>,
}

impl ErrorBanners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a signal. Returns true if the set of banners changed.
    pub fn apply(&mut self, signal: &RequestSignal) -> bool {
        match signal {
            RequestSignal::Error {
                source_id,
                request_id,
                error,
            } => {
                let previous = self
                    .active
                    .insert((source_id.clone(), *request_id), error.clone());
                previous.as_ref() != Some(error)
            }
            RequestSignal::ClearError {
                source_id,
                request_id,
            } => self
                .active
                .remove(&(source_id.clone(), *request_id))
                .is_some(),
        }
    }

    pub fn get(&self, source_id: &str, request_id: Uuid) -> Option<&RequestError> {
        self.active.get(&(source_id.to_string(), request_id))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Uuid, &RequestError)> {
        self.active
            .iter()
            .map(|((source_id, request_id), error)| (source_id.as_str(), *request_id, error))
    }
}
