//! Authoring side of the love quiz: the draft being edited, its
//! validation rules, and the step state machine that walks an author
//! from the identity setup through publishing and sharing.

pub mod defaults;

mod draft;
mod error;

pub use draft::{
    QuestionForm, QuizDraft, MAX_OPTIONS, MIN_OPTIONS, POINTS_PER_QUESTION, QUESTION_COUNT,
};
pub use error::{PublishError, SubmitError, ValidationError};

use log::{info, warn};
use model::QuizDocument;

/// Identifier assigned by the backend to a freshly published quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    pub id: String,
}

/// Submission collaborator: ships a serialized draft to the backend.
#[allow(async_fn_in_trait)]
pub trait SubmitQuiz {
    async fn submit(&self, quiz: &QuizDocument) -> Result<PublishReceipt, SubmitError>;
}

/// Authentication collaborator. The wizard never inspects tokens; it
/// only asks whether one is on hand and, if not, for a login.
#[allow(async_fn_in_trait)]
pub trait Authenticate {
    fn current_token(&self) -> Option<String>;
    async fn request_login(&self) -> Result<String, SubmitError>;
}

/// Authoring phase. Forward transitions are gated by validation;
/// backward transitions are always allowed and lossless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Setup,
    Questions,
    Reveal,
    Publish,
    Shared,
}

/// Drives a [`QuizDraft`] through the authoring steps.
pub struct WizardController {
    draft: QuizDraft,
    step: Step,
    current_question: usize,
    in_flight: bool,
    published_id: Option<String>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            draft: QuizDraft::new(),
            step: Step::Setup,
            current_question: 0,
            in_flight: false,
            published_id: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// 0-based index of the question currently being edited.
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn draft(&self) -> &QuizDraft {
        &self.draft
    }

    /// Mutable access to the draft, `None` once the quiz is published
    /// and therefore frozen.
    pub fn draft_mut(&mut self) -> Option<&mut QuizDraft> {
        if self.step == Step::Shared {
            None
        } else {
            Some(&mut self.draft)
        }
    }

    /// Advances one step (or one question within the questions phase).
    /// Fails with the specific validation error of the gate; on a failure
    /// while leaving the questions phase, jumps to the offending question.
    pub fn advance(&mut self) -> Result<Step, ValidationError> {
        match self.step {
            Step::Setup => {
                self.draft.validate_setup()?;
                self.step = Step::Questions;
            }
            Step::Questions => {
                self.draft.validate_question(self.current_question)?;
                if self.current_question + 1 < QUESTION_COUNT {
                    self.current_question += 1;
                } else {
                    if let Err(err) = self.draft.validate_questions() {
                        if let Some(number) = err.question() {
                            self.current_question = number - 1;
                        }
                        return Err(err);
                    }
                    self.step = Step::Reveal;
                }
            }
            Step::Reveal => {
                self.draft.validate_publish()?;
                self.step = Step::Publish;
            }
            // Publish leaves via `publish`; Shared is terminal.
            Step::Publish | Step::Shared => {}
        }
        Ok(self.step)
    }

    /// Steps backward, retaining everything already entered. From the
    /// first question this returns to the setup phase.
    pub fn back(&mut self) -> Step {
        match self.step {
            Step::Setup | Step::Shared => {}
            Step::Questions => {
                if self.current_question > 0 {
                    self.current_question -= 1;
                } else {
                    self.step = Step::Setup;
                }
            }
            Step::Reveal => {
                self.step = Step::Questions;
                self.current_question = QUESTION_COUNT - 1;
            }
            Step::Publish => self.step = Step::Reveal,
        }
        self.step
    }

    /// Free navigation between questions within the questions phase.
    pub fn jump_to_question(&mut self, index: usize) {
        if self.step == Step::Questions && index < QUESTION_COUNT {
            self.current_question = index;
        }
    }

    /// Publishes the draft: validates, serializes, and hands the document
    /// to the submission collaborator. A missing token pauses for one
    /// login; a rejected token triggers exactly one re-login and retry.
    /// On success the draft freezes and the wizard moves to [`Step::Shared`];
    /// on failure it stays in [`Step::Publish`] with the draft intact.
    pub async fn publish<S, A>(&mut self, submitter: &S, auth: &A) -> Result<&str, PublishError>
    where
        S: SubmitQuiz,
        A: Authenticate,
    {
        if self.published_id.is_some() {
            return Ok(self.published_id.as_deref().unwrap());
        }
        if self.in_flight {
            return Err(PublishError::InFlight);
        }

        self.draft.validate_publish()?;
        self.step = Step::Publish;
        self.in_flight = true;
        let result = Self::drive_submit(&self.draft, submitter, auth).await;
        self.in_flight = false;

        match result {
            Ok(PublishReceipt { id }) => {
                info!("published quiz {id}");
                self.step = Step::Shared;
                Ok(self.published_id.insert(id).as_str())
            }
            Err(err) => {
                warn!("publish attempt failed: {err}");
                Err(err)
            }
        }
    }

    async fn drive_submit<S, A>(
        draft: &QuizDraft,
        submitter: &S,
        auth: &A,
    ) -> Result<PublishReceipt, PublishError>
    where
        S: SubmitQuiz,
        A: Authenticate,
    {
        if auth.current_token().is_none() {
            info!("no access token on hand; requesting login before publish");
            auth.request_login().await.map_err(|_| PublishError::Auth)?;
        }

        let quiz = draft.serialize();
        match submitter.submit(&quiz).await {
            Err(SubmitError::AuthRequired) => {
                // stale or rejected token: log in again, retry exactly once
                auth.request_login().await.map_err(|_| PublishError::Auth)?;
                submitter.submit(&quiz).await.map_err(PublishError::Submit)
            }
            result => result.map_err(PublishError::Submit),
        }
    }

    pub fn published_id(&self) -> Option<&str> {
        self.published_id.as_deref()
    }

    /// Share link for the published quiz, once there is one.
    pub fn share_link(&self, origin: &str) -> Option<String> {
        let id = self.published_id.as_deref()?;
        Some(format!("{}/quiz/{id}", origin.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::QuestionKind;
    use std::cell::{Cell, RefCell};

    fn filled_controller() -> WizardController {
        let mut wizard = WizardController::new();
        {
            let draft = wizard.draft_mut().unwrap();
            draft.author = String::from("Alice");
            draft.respondent = String::from("Bob");
            for index in 0..QUESTION_COUNT {
                draft.set_label(index, &format!("Question number {}?", index + 1));
            }
            draft.reveal_text = String::from("I love you!");
        }
        wizard
    }

    fn walk_to_publish(wizard: &mut WizardController) {
        assert_eq!(wizard.advance(), Ok(Step::Questions));
        for _ in 0..QUESTION_COUNT - 1 {
            wizard.advance().unwrap();
        }
        assert_eq!(wizard.advance(), Ok(Step::Reveal));
        assert_eq!(wizard.advance(), Ok(Step::Publish));
    }

    struct FixedSubmitter {
        calls: Cell<u32>,
        reject_first: bool,
    }

    impl FixedSubmitter {
        fn new() -> Self {
            Self { calls: Cell::new(0), reject_first: false }
        }

        fn rejecting_first() -> Self {
            Self { calls: Cell::new(0), reject_first: true }
        }
    }

    impl SubmitQuiz for FixedSubmitter {
        async fn submit(&self, _quiz: &QuizDocument) -> Result<PublishReceipt, SubmitError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.reject_first && call == 0 {
                Err(SubmitError::AuthRequired)
            } else {
                Ok(PublishReceipt { id: String::from("quiz-1") })
            }
        }
    }

    struct LoginOnDemand {
        token: RefCell<Option<String>>,
        logins: Cell<u32>,
    }

    impl LoginOnDemand {
        fn logged_out() -> Self {
            Self { token: RefCell::new(None), logins: Cell::new(0) }
        }

        fn logged_in() -> Self {
            Self { token: RefCell::new(Some(String::from("token"))), logins: Cell::new(0) }
        }
    }

    impl Authenticate for LoginOnDemand {
        fn current_token(&self) -> Option<String> {
            self.token.borrow().clone()
        }

        async fn request_login(&self) -> Result<String, SubmitError> {
            self.logins.set(self.logins.get() + 1);
            let token = String::from("fresh-token");
            *self.token.borrow_mut() = Some(token.clone());
            Ok(token)
        }
    }

    struct NoLogin;

    impl Authenticate for NoLogin {
        fn current_token(&self) -> Option<String> {
            None
        }

        async fn request_login(&self) -> Result<String, SubmitError> {
            Err(SubmitError::AuthRequired)
        }
    }

    #[test]
    fn setup_gate_blocks_until_both_names_exist() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.advance(), Err(ValidationError::MissingAuthorName));
        assert_eq!(wizard.step(), Step::Setup);
    }

    #[test]
    fn walks_forward_through_every_question() {
        let mut wizard = filled_controller();
        assert_eq!(wizard.advance(), Ok(Step::Questions));
        for expected in 1..QUESTION_COUNT {
            wizard.advance().unwrap();
            assert_eq!(wizard.current_question(), expected.min(QUESTION_COUNT - 1));
        }
        assert_eq!(wizard.advance(), Ok(Step::Reveal));
    }

    #[test]
    fn leaving_the_questions_phase_jumps_to_the_offender() {
        let mut wizard = filled_controller();
        wizard.draft_mut().unwrap().set_label(1, "");
        wizard.advance().unwrap();
        wizard.jump_to_question(QUESTION_COUNT - 1);
        assert_eq!(wizard.advance(), Err(ValidationError::MissingLabel(2)));
        assert_eq!(wizard.current_question(), 1);
        assert_eq!(wizard.step(), Step::Questions);
    }

    #[test]
    fn back_and_forward_lose_nothing() {
        let mut wizard = filled_controller();
        wizard.advance().unwrap();
        wizard.draft_mut().unwrap().set_question_kind(0, QuestionKind::Select);
        wizard.draft_mut().unwrap().set_correct_answer(0, "Online");

        assert_eq!(wizard.back(), Step::Setup);
        assert_eq!(wizard.advance(), Ok(Step::Questions));

        let question = wizard.draft().question(0).unwrap();
        assert_eq!(question.label(), "Question number 1?");
        assert_eq!(question.kind(), QuestionKind::Select);
        assert_eq!(question.correct_answer(), Some("Online"));
    }

    #[test]
    fn back_from_reveal_lands_on_the_last_question() {
        let mut wizard = filled_controller();
        wizard.advance().unwrap();
        for _ in 0..QUESTION_COUNT {
            wizard.advance().unwrap();
        }
        assert_eq!(wizard.step(), Step::Reveal);
        assert_eq!(wizard.back(), Step::Questions);
        assert_eq!(wizard.current_question(), QUESTION_COUNT - 1);
    }

    #[tokio::test]
    async fn publish_moves_to_shared_and_freezes_the_draft() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);

        let submitter = FixedSubmitter::new();
        let auth = LoginOnDemand::logged_in();
        let id = wizard.publish(&submitter, &auth).await.unwrap().to_owned();
        assert_eq!(id, "quiz-1");
        assert_eq!(wizard.step(), Step::Shared);
        assert!(wizard.draft_mut().is_none());
        assert_eq!(auth.logins.get(), 0);
        assert_eq!(
            wizard.share_link("https://love.example/"),
            Some(String::from("https://love.example/quiz/quiz-1"))
        );
    }

    #[tokio::test]
    async fn publish_without_a_token_pauses_for_one_login() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);

        let submitter = FixedSubmitter::new();
        let auth = LoginOnDemand::logged_out();
        wizard.publish(&submitter, &auth).await.unwrap();
        assert_eq!(auth.logins.get(), 1);
        assert_eq!(submitter.calls.get(), 1);
        assert_eq!(wizard.step(), Step::Shared);
    }

    #[tokio::test]
    async fn rejected_token_retries_exactly_once() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);

        let submitter = FixedSubmitter::rejecting_first();
        let auth = LoginOnDemand::logged_in();
        wizard.publish(&submitter, &auth).await.unwrap();
        assert_eq!(submitter.calls.get(), 2);
        assert_eq!(auth.logins.get(), 1);
    }

    #[tokio::test]
    async fn failed_login_surfaces_without_touching_the_draft() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);

        let submitter = FixedSubmitter::new();
        let outcome = wizard.publish(&submitter, &NoLogin).await;
        assert_eq!(outcome, Err(PublishError::Auth));
        assert_eq!(submitter.calls.get(), 0);
        assert_eq!(wizard.step(), Step::Publish);
        assert_eq!(wizard.draft().reveal_text, "I love you!");
    }

    #[tokio::test]
    async fn publishing_twice_reuses_the_stored_id() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);

        let submitter = FixedSubmitter::new();
        let auth = LoginOnDemand::logged_in();
        wizard.publish(&submitter, &auth).await.unwrap();
        wizard.publish(&submitter, &auth).await.unwrap();
        assert_eq!(submitter.calls.get(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_submitter() {
        let mut wizard = filled_controller();
        walk_to_publish(&mut wizard);
        wizard.draft_mut().unwrap().reveal_text.clear();

        let submitter = FixedSubmitter::new();
        let auth = LoginOnDemand::logged_in();
        let outcome = wizard.publish(&submitter, &auth).await;
        assert_eq!(
            outcome,
            Err(PublishError::Validation(ValidationError::MissingRevealText))
        );
        assert_eq!(submitter.calls.get(), 0);
    }
}
