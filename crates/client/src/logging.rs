// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Categorized logging.
//!
//! Every component logs through a [`Logger`] bound to its category name.
//! Records go to an injected [`LogSink`]; production code uses
//! [`TracingSink`], which forwards them to `tracing` with the category,
//! source id and request id as structured fields.

use std::fmt;
use std::sync::Arc;

use tracing::field::display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// One log line with its routing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub category: &'static str,
    pub message: String,
    pub source_id: Option<String>,
    pub request_id: Option<Uuid>,
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    fn log(&self, record: LogRecord);
}

/// Sink that emits records as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, record: LogRecord) {
        let category = record.category;
        let source_id = record.source_id.as_deref();
        let request_id = record.request_id.as_ref().map(display);
        let message = record.message;
        match record.level {
            LogLevel::Debug => tracing::debug!(category, source_id, request_id, "{message}"),
            LogLevel::Info => tracing::info!(category, source_id, request_id, "{message}"),
            LogLevel::Warning => tracing::warn!(category, source_id, request_id, "{message}"),
            LogLevel::Error => tracing::error!(category, source_id, request_id, "{message}"),
        }
    }
}

/// A sink bound to one category.
#[derive(Clone)]
pub struct Logger {
    category: &'static str,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(category: &'static str, sink: Arc<dyn LogSink>) -> Self {
        Logger { category, sink }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into(), None, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), None, None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warning, message.into(), None, None);
    }

    pub fn error(&self, error: &dyn fmt::Display) {
        self.emit(LogLevel::Error, error.to_string(), None, None);
    }

    /// Logs a failed request attempt with its correlation ids.
    pub fn request_error(&self, source_id: &str, request_id: Uuid, error: &dyn fmt::Display) {
        self.emit(
            LogLevel::Error,
            error.to_string(),
            Some(source_id.to_string()),
            Some(request_id),
        );
    }

    /// Logs the error of a failed result and hands the result back unchanged.
    pub fn log_errors<T, E: fmt::Display>(&self, result: Result<T, E>) -> Result<T, E> {
        if let Err(e) = &result {
            self.error(e);
        }
        result
    }

    fn emit(
        &self,
        level: LogLevel,
        message: String,
        source_id: Option<String>,
        request_id: Option<Uuid>,
    ) {
        self.sink.log(LogRecord {
            level,
            category: self.category,
            message,
            source_id,
            request_id,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
