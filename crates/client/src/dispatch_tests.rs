// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::logging::LogLevel;
use crate::test_helpers::{id, round, snapshot, MemorySink};
use trivia_core::Question;

fn state() -> (TriviaState, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    (TriviaState::new(sink.clone()), sink)
}

#[test]
fn snapshot_installs_round() {
    let (mut state, _) = state();
    let mut r = round(1, "Science");
    r.questions.upsert(Question::new(id(10), "Speed of light?"));

    state.replace(snapshot(5, r.clone()));

    assert_eq!(state.round(), Some(&r));
}

#[test]
fn new_round_replaces_current_round() {
    let (mut state, _) = state();
    state.replace(snapshot(5, round(1, "Science")));

    state.apply(Event::NewRound(round(2, "Music")));

    assert_eq!(state.round().unwrap().id, id(2));
    assert!(state.round().unwrap().questions.is_empty());
}

#[test]
fn answer_updates_question_in_place() {
    let (mut state, _) = state();
    state.replace(snapshot(5, round(1, "Science")));

    state.apply(Event::NewQuestion(Question::new(id(10), "Boiling point?")));
    state.apply(Event::NewQuestion(Question::new(id(11), "Freezing point?")));
    state.apply(Event::NewAnswer(
        Question::new(id(10), "Boiling point?").answered("100C"),
    ));

    let questions = &state.round().unwrap().questions;
    assert_eq!(questions.len(), 2);
    assert_eq!(questions.get(id(10)).unwrap().answer.as_deref(), Some("100C"));
    assert_eq!(questions.get(id(11)).unwrap().answer, None);
}

#[test]
fn question_without_round_is_ignored() {
    let (mut state, sink) = state();

    state.apply(Event::NewQuestion(Question::new(id(10), "Orphan?")));

    assert!(state.round().is_none());
    assert!(sink.contains(LogLevel::Warning, "no round loaded"));
}

#[test]
fn channel_dispatcher_forwards_in_order() {
    let (mut tx, mut rx) = mpsc::unbounded_channel();
    let snap = snapshot(5, round(1, "Science"));
    let event = Event::NewRound(round(2, "Music"));

    tx.replace(snap.clone());
    tx.apply(event.clone());

    assert_eq!(rx.try_recv().unwrap(), Dispatch::Snapshot(snap));
    assert_eq!(rx.try_recv().unwrap(), Dispatch::Event(event));
}
