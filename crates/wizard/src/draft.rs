use model::{
    normalize_answer, Question, QuestionKind, QuizDocument, Reveal, ScoringSystem, TierMessages,
};

use crate::defaults;
use crate::error::ValidationError;

/// Number of questions every quiz carries.
pub const QUESTION_COUNT: usize = 5;
/// Closed bound on the option list of a multiple-choice question.
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;
/// Points awarded per correctly answered question.
pub const POINTS_PER_QUESTION: u16 = 2;

/// One question being edited in the wizard. All mutation goes through
/// [`QuizDraft`], which owns the option-count and correct-answer
/// invariants.
#[derive(Clone, Debug, Default)]
pub struct QuestionForm {
    pub(crate) label: String,
    pub(crate) kind: QuestionKind,
    pub(crate) options: Vec<String>,
    pub(crate) correct_answer: String,
    pub(crate) image: Option<String>,
}

impl QuestionForm {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The normalized correct answer, if one is set.
    pub fn correct_answer(&self) -> Option<&str> {
        if self.correct_answer.is_empty() {
            None
        } else {
            Some(&self.correct_answer)
        }
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn filled_options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str).filter(|option| !option.trim().is_empty())
    }

    fn validate(&self, number: usize) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::MissingLabel(number));
        }

        if self.kind == QuestionKind::Select {
            if self.filled_options().count() < MIN_OPTIONS {
                return Err(ValidationError::TooFewOptions(number));
            }
            let correct = self.correct_answer.as_str();
            if correct.is_empty()
                || !self.filled_options().any(|option| normalize_answer(option) == correct)
            {
                return Err(ValidationError::MissingCorrectAnswer(number));
            }
        }

        Ok(())
    }
}

/// The in-progress quiz document being authored. Validation is pure and
/// re-entrant; nothing here mutates state except the explicit setters.
#[derive(Clone, Debug)]
pub struct QuizDraft {
    pub author: String,
    pub respondent: String,
    questions: Vec<QuestionForm>,
    pub reveal_text: String,
    pub reveal_image: Option<String>,
    pub messages: TierMessages,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizDraft {
    /// An empty draft: five free-text questions and the default tier
    /// messages, as the wizard starts out.
    pub fn new() -> Self {
        Self {
            author: String::new(),
            respondent: String::new(),
            questions: (0..QUESTION_COUNT).map(|_| QuestionForm::default()).collect(),
            reveal_text: String::new(),
            reveal_image: None,
            messages: defaults::default_messages(),
        }
    }

    pub fn questions(&self) -> &[QuestionForm] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&QuestionForm> {
        self.questions.get(index)
    }

    pub fn set_label(&mut self, index: usize, label: &str) {
        if let Some(question) = self.questions.get_mut(index) {
            question.label = label.to_owned();
        }
    }

    pub fn set_image(&mut self, index: usize, image: Option<String>) {
        if let Some(question) = self.questions.get_mut(index) {
            question.image = image;
        }
    }

    /// Switches the question's answer capability. Going to multiple
    /// choice installs the personalized default options and clears any
    /// stale correct answer; going to free text clears both. Switching
    /// to the current kind is a no-op.
    pub fn set_question_kind(&mut self, index: usize, kind: QuestionKind) {
        let options = match kind {
            QuestionKind::Select => defaults::default_options(index, &self.author, &self.respondent),
            QuestionKind::Text => Vec::new(),
        };
        let Some(question) = self.questions.get_mut(index) else {
            return;
        };
        if question.kind == kind {
            return;
        }
        question.kind = kind;
        question.options = options;
        question.correct_answer.clear();
    }

    /// Appends an empty option slot, refusing to exceed the bound.
    pub fn add_option(&mut self, index: usize) -> Result<(), ValidationError> {
        let question =
            self.questions.get_mut(index).ok_or(ValidationError::NoSuchOption(index + 1))?;
        if question.options.len() >= MAX_OPTIONS {
            return Err(ValidationError::TooManyOptions(index + 1));
        }
        question.options.push(String::new());
        Ok(())
    }

    /// Removes one option, refusing to drop below the bound. Removing the
    /// option currently marked correct clears the correct answer; there is
    /// no auto-reassignment.
    pub fn remove_option(&mut self, index: usize, option: usize) -> Result<(), ValidationError> {
        let number = index + 1;
        let question = self.questions.get_mut(index).ok_or(ValidationError::NoSuchOption(number))?;
        if option >= question.options.len() {
            return Err(ValidationError::NoSuchOption(number));
        }
        if question.options.len() <= MIN_OPTIONS {
            return Err(ValidationError::TooFewOptions(number));
        }
        let removed = question.options.remove(option);
        if normalize_answer(&removed) == question.correct_answer {
            question.correct_answer.clear();
        }
        Ok(())
    }

    /// Rewrites the text of one option. An edit that orphans the correct
    /// answer is caught by validation, not here.
    pub fn set_option(&mut self, index: usize, option: usize, text: &str) -> Result<(), ValidationError> {
        let number = index + 1;
        let question = self.questions.get_mut(index).ok_or(ValidationError::NoSuchOption(number))?;
        let slot = question.options.get_mut(option).ok_or(ValidationError::NoSuchOption(number))?;
        *slot = text.to_owned();
        Ok(())
    }

    /// Marks the correct answer, stored in normalized form.
    pub fn set_correct_answer(&mut self, index: usize, answer: &str) {
        if let Some(question) = self.questions.get_mut(index) {
            question.correct_answer = normalize_answer(answer).to_owned();
        }
    }

    /// True iff both identity names are filled in.
    pub fn validate_setup(&self) -> Result<(), ValidationError> {
        if self.author.trim().is_empty() {
            return Err(ValidationError::MissingAuthorName);
        }
        if self.respondent.trim().is_empty() {
            return Err(ValidationError::MissingRespondentName);
        }
        Ok(())
    }

    pub fn validate_question(&self, index: usize) -> Result<(), ValidationError> {
        match self.questions.get(index) {
            Some(question) => question.validate(index + 1),
            None => Err(ValidationError::MissingLabel(index + 1)),
        }
    }

    /// Validates every question, reporting the first offender by number.
    pub fn validate_questions(&self) -> Result<(), ValidationError> {
        self.questions
            .iter()
            .enumerate()
            .try_for_each(|(index, question)| question.validate(index + 1))
    }

    /// The full publish gate: all questions valid and a reveal message set.
    pub fn validate_publish(&self) -> Result<(), ValidationError> {
        self.validate_questions()?;
        if self.reveal_text.trim().is_empty() {
            return Err(ValidationError::MissingRevealText);
        }
        Ok(())
    }

    /// Produces the wire document: blank options filtered out, correct
    /// answers normalized, bands derived from the quiz size. Pure; the
    /// draft itself is untouched.
    pub fn serialize(&self) -> QuizDocument {
        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let options: Vec<String> = question.filled_options().map(str::to_owned).collect();
                let correct_answer = (question.kind == QuestionKind::Select)
                    .then(|| question.correct_answer.clone())
                    .filter(|answer| !answer.is_empty());
                Question {
                    id: (index + 1) as u8,
                    label: question.label.trim().to_owned(),
                    kind: question.kind,
                    options,
                    correct_answer,
                    image: question.image.clone(),
                }
            })
            .collect();

        QuizDocument {
            author: self.author.trim().to_owned(),
            respondent: self.respondent.trim().to_owned(),
            questions,
            reveal: Reveal {
                text: self.reveal_text.trim().to_owned(),
                image: self.reveal_image.clone(),
            },
            scoring: ScoringSystem::for_quiz(
                QUESTION_COUNT as u16,
                POINTS_PER_QUESTION,
                self.messages.clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> QuizDraft {
        let mut draft = QuizDraft::new();
        draft.author = String::from("Alice");
        draft.respondent = String::from("Bob");
        for index in 0..QUESTION_COUNT {
            draft.set_label(index, &format!("Question number {}?", index + 1));
        }
        draft.reveal_text = String::from("I love you!");
        draft
    }

    #[test]
    fn rejects_blank_identity_names() {
        let mut draft = QuizDraft::new();
        assert_eq!(draft.validate_setup(), Err(ValidationError::MissingAuthorName));
        draft.author = String::from("Alice");
        assert_eq!(draft.validate_setup(), Err(ValidationError::MissingRespondentName));
        draft.respondent = String::from("  ");
        assert_eq!(draft.validate_setup(), Err(ValidationError::MissingRespondentName));
        draft.respondent = String::from("Bob");
        assert_eq!(draft.validate_setup(), Ok(()));
    }

    #[test]
    fn rejects_the_first_unlabeled_question() {
        let mut draft = filled_draft();
        draft.set_label(2, "   ");
        assert_eq!(draft.validate_questions(), Err(ValidationError::MissingLabel(3)));
    }

    #[test]
    fn select_requires_two_filled_options_and_a_correct_answer() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);

        // blank out everything but one option
        let count = draft.question(0).unwrap().options().len();
        for option in 1..count {
            draft.set_option(0, option, " ").unwrap();
        }
        assert_eq!(draft.validate_question(0), Err(ValidationError::TooFewOptions(1)));

        draft.set_option(0, 1, "Online").unwrap();
        assert_eq!(draft.validate_question(0), Err(ValidationError::MissingCorrectAnswer(1)));

        draft.set_correct_answer(0, "Online");
        assert_eq!(draft.validate_question(0), Ok(()));
    }

    #[test]
    fn correct_answer_must_match_a_current_option() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.set_correct_answer(0, "At work");
        assert_eq!(draft.validate_question(0), Ok(()));

        // editing the option text orphans the reference
        let position = draft
            .question(0)
            .unwrap()
            .options()
            .iter()
            .position(|option| option == "At work")
            .unwrap();
        draft.set_option(0, position, "Someplace else").unwrap();
        assert_eq!(draft.validate_question(0), Err(ValidationError::MissingCorrectAnswer(1)));
    }

    #[test]
    fn option_count_stays_within_bounds() {
        let mut draft = filled_draft();
        draft.set_question_kind(1, QuestionKind::Select);
        assert_eq!(draft.question(1).unwrap().options().len(), 3);

        draft.add_option(1).unwrap();
        assert_eq!(draft.add_option(1), Err(ValidationError::TooManyOptions(2)));
        assert_eq!(draft.question(1).unwrap().options().len(), MAX_OPTIONS);

        draft.remove_option(1, 3).unwrap();
        draft.remove_option(1, 2).unwrap();
        assert_eq!(draft.remove_option(1, 0), Err(ValidationError::TooFewOptions(2)));
        assert_eq!(draft.question(1).unwrap().options().len(), MIN_OPTIONS);
    }

    #[test]
    fn removing_the_correct_option_clears_the_reference() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.set_correct_answer(0, "At work");
        let position = draft
            .question(0)
            .unwrap()
            .options()
            .iter()
            .position(|option| option == "At work")
            .unwrap();
        draft.remove_option(0, position).unwrap();
        assert_eq!(draft.question(0).unwrap().correct_answer(), None);
    }

    #[test]
    fn removing_another_option_keeps_the_reference() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.set_correct_answer(0, "At work");
        draft.remove_option(0, 0).unwrap();
        assert_eq!(draft.question(0).unwrap().correct_answer(), Some("At work"));
    }

    #[test]
    fn switching_to_the_same_kind_is_a_no_op() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.set_correct_answer(0, "Online");
        let before = draft.question(0).unwrap().options().to_vec();

        draft.set_question_kind(0, QuestionKind::Select);
        assert_eq!(draft.question(0).unwrap().options(), before.as_slice());
        assert_eq!(draft.question(0).unwrap().correct_answer(), Some("Online"));
    }

    #[test]
    fn switching_kinds_resets_options_and_correct_answer() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.set_correct_answer(0, "Online");

        draft.set_question_kind(0, QuestionKind::Text);
        let question = draft.question(0).unwrap();
        assert!(question.options().is_empty());
        assert_eq!(question.correct_answer(), None);
    }

    #[test]
    fn publish_gate_needs_every_question_and_the_reveal() {
        let mut draft = filled_draft();
        assert_eq!(draft.validate_publish(), Ok(()));

        draft.reveal_text = String::from("  ");
        assert_eq!(draft.validate_publish(), Err(ValidationError::MissingRevealText));

        draft.reveal_text = String::from("I love you!");
        draft.set_label(4, "");
        assert_eq!(draft.validate_publish(), Err(ValidationError::MissingLabel(5)));
    }

    #[test]
    fn serialize_filters_blanks_and_normalizes_the_correct_answer() {
        let mut draft = filled_draft();
        draft.set_question_kind(0, QuestionKind::Select);
        draft.add_option(0).unwrap();
        draft.set_correct_answer(0, " \"At work\" ");

        let document = draft.serialize();
        let question = &document.questions[0];
        assert_eq!(question.options.len(), 4, "the empty fifth slot is dropped");
        assert_eq!(question.correct_answer.as_deref(), Some("At work"));
        assert_eq!(document.questions[1].correct_answer, None);
        assert_eq!(document.scoring.perfect.min, 8);
        assert_eq!(document.scoring.points_per_question, POINTS_PER_QUESTION);
    }
}
