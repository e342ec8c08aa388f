//! Player-side runtime: replays a published quiz for one respondent,
//! scores the answers locally, and resolves the final tier message.

mod error;

pub use error::{Error, Result};

use log::debug;
use model::{normalize_answer, Message, Question, QuestionKind, QuizDocument, Tier};

/// Lifecycle of one play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    Finished,
}

/// One confirmed answer. Appended once, never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerRecord {
    pub question_id: u8,
    pub answer: String,
    pub correct: bool,
    pub points: u16,
}

/// Replays a published quiz and scores it without any network round
/// trips. The session borrows the document immutably, so a play-through
/// can never change the quiz; restarting means dropping the session and
/// building a new one on the same document.
pub struct QuizSession<'q> {
    quiz: &'q QuizDocument,
    phase: Phase,
    player: String,
    current: usize,
    selected: Option<String>,
    score: u16,
    answers: Vec<AnswerRecord>,
}

impl<'q> QuizSession<'q> {
    pub fn new(quiz: &'q QuizDocument) -> Self {
        Self {
            quiz,
            phase: Phase::NotStarted,
            player: String::new(),
            current: 0,
            selected: None,
            score: 0,
            answers: Vec::with_capacity(quiz.questions.len()),
        }
    }

    pub fn quiz(&self) -> &'q QuizDocument {
        self.quiz
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    /// Highest score this quiz can award.
    pub fn max_score(&self) -> u16 {
        self.quiz.questions.len() as u16 * self.quiz.scoring.points_per_question
    }

    /// 0-based index of the question to be answered next.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Begins the run. The respondent must give a non-blank name.
    pub fn start(&mut self, player: &str) -> Result<()> {
        if self.phase != Phase::NotStarted {
            return Err(Error::AlreadyStarted);
        }
        let player = player.trim();
        if player.is_empty() {
            return Err(Error::MissingPlayerName);
        }
        self.player = player.to_owned();
        self.phase = Phase::Playing;
        debug!("{player} started a {}-question quiz", self.quiz.questions.len());
        Ok(())
    }

    /// The question currently awaiting an answer; `None` outside of play.
    pub fn current_question(&self) -> Option<&'q Question> {
        if self.phase == Phase::Playing {
            self.quiz.questions.get(self.current)
        } else {
            None
        }
    }

    /// The answer picked so far for the current question, if any.
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Picks an answer without advancing; may be called repeatedly and
    /// the last write wins.
    pub fn select_answer(&mut self, answer: &str) -> Result<()> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        self.selected = Some(answer.to_owned());
        Ok(())
    }

    /// Scores the selected answer, appends it to the log, and moves to
    /// the next question; the final confirmation finishes the session.
    /// Free-text questions award full points for any answer.
    pub fn confirm_and_advance(&mut self) -> Result<&AnswerRecord> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        let question = self.quiz.questions.get(self.current).ok_or(Error::NotPlaying)?;
        let answer = match self.selected.take() {
            Some(answer) => answer,
            None => return Err(Error::NoAnswerSelected),
        };

        let correct = match question.kind {
            // any answer to a free-text question is correct by design
            QuestionKind::Text => true,
            QuestionKind::Select => question
                .correct_answer
                .as_deref()
                .is_some_and(|correct| normalize_answer(&answer) == correct),
        };
        let points = if correct { self.quiz.scoring.points_per_question } else { 0 };

        self.score += points;
        let index = self.answers.len();
        self.answers.push(AnswerRecord {
            question_id: question.id,
            answer,
            correct,
            points,
        });
        self.current += 1;

        if self.current == self.quiz.questions.len() {
            self.phase = Phase::Finished;
            debug!("session finished with {} of {} points", self.score, self.max_score());
        }
        Ok(&self.answers[index])
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The score tier, available once the session is finished.
    pub fn final_tier(&self) -> Option<Tier> {
        (self.phase == Phase::Finished).then(|| self.quiz.scoring.tier(self.score))
    }

    /// The message attached to the final tier; a pure lookup.
    pub fn result_message(&self) -> Option<&'q Message> {
        self.final_tier().map(|tier| self.quiz.scoring.message(tier))
    }
}
