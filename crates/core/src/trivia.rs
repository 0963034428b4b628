// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trivia domain types carried by the event stream and the status endpoint.

use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A single trivia question, optionally answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Question {
    /// Creates an unanswered question.
    pub fn new(id: Uuid, prompt: impl Into<String>) -> Self {
        Question {
            id,
            prompt: prompt.into(),
            answer: None,
        }
    }

    /// Returns this question with the given answer attached.
    pub fn answered(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

/// Questions of a round, kept in insertion order and unique by id.
///
/// Serialized as a plain JSON array. Decoding an array that repeats an id
/// fails rather than silently keeping one of the duplicates.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Questions(Vec<Question>);

impl Questions {
    /// Creates an empty question list.
    pub fn new() -> Self {
        Questions(Vec::new())
    }

    /// Builds a list from questions, rejecting duplicate ids.
    pub fn try_from_vec(questions: Vec<Question>) -> Result<Self, Error> {
        let mut list = Questions::new();
        for question in questions {
            if list.get(question.id).is_some() {
                return Err(Error::DuplicateQuestion(question.id));
            }
            list.0.push(question);
        }
        Ok(list)
    }

    /// Inserts the question, or replaces the one with the same id in place.
    ///
    /// Returns `true` if an existing question was replaced.
    pub fn upsert(&mut self, question: Question) -> bool {
        match self.0.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => {
                *existing = question;
                true
            }
            None => {
                self.0.push(question);
                false
            }
        }
    }

    /// Looks up a question by id.
    pub fn get(&self, id: Uuid) -> Option<&Question> {
        self.0.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Questions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let questions = Vec::<Question>::deserialize(deserializer)?;
        Questions::try_from_vec(questions).map_err(de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Questions {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A round of trivia questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    pub id: Uuid,
    pub description: String,
    pub questions: Questions,
}

impl Round {
    /// Creates a round with no questions.
    pub fn new(id: Uuid, description: impl Into<String>) -> Self {
        Round {
            id,
            description: description.into(),
            questions: Questions::new(),
        }
    }
}

/// Application events carried in stream envelopes.
///
/// Externally tagged on the wire: `{"newQuestion": {...}}`. Unknown tags fail
/// to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    /// A question was asked in the current round.
    NewQuestion(Question),
    /// A new round started; it replaces the current one.
    NewRound(Round),
    /// A question received its answer.
    NewAnswer(Question),
}

impl Event {
    /// Returns the wire tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::NewQuestion(_) => "newQuestion",
            Event::NewRound(_) => "newRound",
            Event::NewAnswer(_) => "newAnswer",
        }
    }
}

/// Full-state payload served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Id of the last stream message already reflected in `current_round`.
    pub most_recent_message_id: Uuid,
    pub current_round: Round,
}

/// Success body of the registration endpoint.
///
/// The server answers with an empty body; any JSON value is accepted and
/// discarded.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RegistrationResponse;

impl<'de> Deserialize<'de> for RegistrationResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(RegistrationResponse)
    }
}

#[cfg(test)]
#[path = "trivia_tests.rs"]
mod tests;
