// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP data sources with retry and error signalling.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │  HttpDataSource  │────►│ RequestExecutor  │────►│ DataRequest │
//! │   (decode T)     │     │ (retry, backoff) │     │   Client    │
//! └──────────────────┘     └──────────────────┘     └─────────────┘
//!                                   │
//!                                   ▼
//!                          ┌──────────────────┐
//!                          │  RequestSignal   │  (error / clear, per request id)
//!                          └──────────────────┘
//! ```

mod data_source;
mod http;
mod retry;
mod signals;

pub use data_source::HttpDataSource;
pub use http::{
    decode_body, DataRequestClient, HttpMethod, HttpRequest, ReqwestClient, RequestError,
    RequestResult, SessionMode,
};
pub use retry::{
    backoff, Correlated, RequestContext, RequestExecutor, RetryError, RetryPolicy, RetryState,
    DEFAULT_MAX_RETRIES,
};
pub use signals::{ErrorBanners, RequestSignal, SignalSender};




#[cfg(test)]
mod signals_tests;
