// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! trivia-core: wire model for the trivia event stream.
//!
//! This crate defines the messages exchanged with the trivia server and
//! their encode/decode rules. It has no behavior beyond serialization.
//!
//! - [`Envelope`] - one stream event plus its hash-chain ordering metadata
//! - [`Event`], [`Round`], [`Question`] - trivia domain types
//! - [`Snapshot`] - the full-state payload of the status endpoint
//! - [`rpc`] - JSON-RPC 2.0 request/response/error shapes

pub mod envelope;
pub mod error;
pub mod rpc;
pub mod trivia;

pub use envelope::{Envelope, Metadata};
pub use error::{Error, Result};
pub use rpc::{
    ErrorCode, IncomingMessage, MessageError, MessageKind, RequestMessage, ResponseMessage,
    ResponseOutcome, StreamMessage,
};
pub use trivia::{Event, Question, Questions, RegistrationResponse, Round, Snapshot};
