#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod quiz;
mod score;

pub use quiz::{normalize_answer, Question, QuestionKind, QuizDocument, Reveal};
pub use score::{Band, Message, ScoringSystem, Tier, TierMessages};
