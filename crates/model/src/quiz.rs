use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

use crate::score::ScoringSystem;

/// Acceptable schema for published quizzes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizDocument {
    /// Display name of the quiz author.
    #[serde(rename = "yourName")]
    pub author: String,
    /// Display name of the person the quiz is meant for.
    #[serde(rename = "yourSpouseName")]
    pub respondent: String,
    /// Ordered questions; a published quiz always carries five.
    pub questions: Vec<Question>,
    /// Message shown to the respondent after the final question.
    pub reveal: Reveal,
    /// Score bands and the message attached to each.
    #[serde(rename = "scoringSystem")]
    pub scoring: ScoringSystem,
}

/// One published question.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Sequence position, 1-based; doubles as the stable identifier.
    pub id: u8,
    /// Prompt to be displayed to the respondent.
    pub label: String,
    /// Answer capability of this question.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Fixed choices to select from; empty for free-text questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Normalized text of the correct option; `None` for free-text.
    #[serde(default)]
    pub correct_answer: Option<String>,
    /// Opaque embedded image payload.
    #[serde(default)]
    pub image: Option<String>,
}

/// Answer capability of a question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    /// Free text; any answer the respondent gives counts as correct.
    #[default]
    Text,
    /// Fixed choices with exactly one correct option.
    Select,
}

/// Reveal message and optional image shown once the quiz is finished.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Reveal {
    #[serde(rename = "revealText")]
    pub text: String,
    #[serde(rename = "revealImage", default)]
    pub image: Option<String>,
}

/// Canonical form of an answer: surrounding whitespace removed and one
/// layer of surrounding quotes stripped.
pub fn normalize_answer(raw: &str) -> &str {
    let mut answer = raw.trim();
    if let Some(rest) = answer.strip_prefix(['"', '\'']) {
        answer = rest;
    }
    if let Some(rest) = answer.strip_suffix(['"', '\'']) {
        answer = rest;
    }
    answer.trim()
}
