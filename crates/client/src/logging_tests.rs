// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::MemorySink;

#[test]
fn logger_tags_records_with_category() {
    let sink = Arc::new(MemorySink::default());
    let logger = Logger::new("Registration", sink.clone());

    logger.info("registered");
    logger.warn("slow response");

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.category == "Registration"));
    assert_eq!(records[0].level, LogLevel::Info);
    assert_eq!(records[1].level, LogLevel::Warning);
}

#[test]
fn request_error_carries_correlation_ids() {
    let sink = Arc::new(MemorySink::default());
    let logger = Logger::new("HTTPDataSource", sink.clone());
    let request_id = Uuid::from_u128(7);

    logger.request_error("Questions", request_id, &"timed out");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Error);
    assert_eq!(records[0].source_id.as_deref(), Some("Questions"));
    assert_eq!(records[0].request_id, Some(request_id));
    assert_eq!(records[0].message, "timed out");
}

#[test]
fn log_errors_passes_result_through() {
    let sink = Arc::new(MemorySink::default());
    let logger = Logger::new("Networking", sink.clone());

    let ok: Result<u32, String> = logger.log_errors(Ok(3));
    assert_eq!(ok.unwrap(), 3);
    assert!(sink.records().is_empty());

    let err: Result<u32, String> = logger.log_errors(Err("bad url".to_string()));
    assert!(err.is_err());
    assert!(sink.contains(LogLevel::Error, "bad url"));
}

#[test]
fn tracing_sink_accepts_every_level() {
    let sink = TracingSink;
    for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warning, LogLevel::Error] {
        sink.log(LogRecord {
            level,
            category: "Test",
            message: "message".to_string(),
            source_id: Some("source".to_string()),
            request_id: Some(Uuid::nil()),
        });
    }
}
