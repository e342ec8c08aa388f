use anyhow::Context;
use client::{image, Api, QuizStore};
use log::info;
use model::{QuestionKind, Tier};
use session::QuizSession;
use std::{
    env, fs,
    io::{self, Write},
};
use tokio::runtime::Runtime;
use wizard::{
    defaults, Authenticate, QuizDraft, Step, SubmitError, ValidationError, WizardController,
    MAX_OPTIONS, MIN_OPTIONS, QUESTION_COUNT,
};

const DEFAULT_API: &str = "https://love-backend-1agq.onrender.com";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let base = env::var("LOVEQUIZ_API").unwrap_or_else(|_| String::from(DEFAULT_API));
    let origin = env::var("LOVEQUIZ_ORIGIN").unwrap_or_else(|_| base.clone());
    let api = Api::new(&base);
    if let Ok(token) = env::var("LOVEQUIZ_TOKEN") {
        api.set_token(&token);
    }
    info!("using backend at {base}");

    let mut args = env::args().skip(1);
    let runtime = Runtime::new()?;
    match args.next().as_deref() {
        Some("create") => runtime.block_on(create(api, &origin)),
        Some("play") => {
            let id = args.next().context("usage: lovequiz play <quiz-id>")?;
            runtime.block_on(play(api, &id))
        }
        _ => {
            eprintln!("usage: lovequiz <create | play <quiz-id>>");
            Ok(())
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn prompt_nonempty(label: &str) -> anyhow::Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
    }
}

fn yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

fn letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn pick_option<'a>(pick: &str, options: &'a [String]) -> Option<&'a str> {
    let pick = pick.trim();
    if pick.len() != 1 {
        return None;
    }
    let index = pick.bytes().next()?.to_ascii_uppercase().checked_sub(b'A')? as usize;
    options.get(index).map(String::as_str)
}

/// Interactive authenticator: walks the one-time-code login in the
/// terminal whenever the wizard pauses for a token.
struct OtpPrompt {
    api: Api,
}

impl Authenticate for OtpPrompt {
    fn current_token(&self) -> Option<String> {
        self.api.token()
    }

    async fn request_login(&self) -> Result<String, SubmitError> {
        println!("You need an account to publish. We'll mail a one-time code to your email.");
        let email = prompt_nonempty("Email address: ").map_err(|_| SubmitError::Failed)?;
        self.api.request_otp(&email).await.map_err(|err| {
            println!("Could not send the code: {err}");
            SubmitError::from(err)
        })?;
        let code = prompt_nonempty("6-digit code: ").map_err(|_| SubmitError::Failed)?;
        self.api.verify_otp(&email, &code).await.map_err(|err| {
            println!("Could not verify the code: {err}");
            SubmitError::from(err)
        })
    }
}

async fn create(api: Api, origin: &str) -> anyhow::Result<()> {
    println!("Create a personalized love quiz for your special someone.\n");
    let mut wizard = WizardController::new();
    loop {
        match wizard.step() {
            Step::Setup => {
                let Some(draft) = wizard.draft_mut() else { break };
                draft.author = prompt_nonempty("Your name: ")?;
                draft.respondent = prompt_nonempty("Your partner's name: ")?;
                if let Err(err) = wizard.advance() {
                    println!("{err}");
                }
            }
            Step::Questions => edit_question(&mut wizard)?,
            Step::Reveal => edit_reveal(&mut wizard)?,
            Step::Publish => {
                let auth = OtpPrompt { api: api.clone() };
                let failure = wizard.publish(&api, &auth).await.err();
                if let Some(err) = failure {
                    println!("{err}");
                    if let wizard::PublishError::Validation(_) = err {
                        wizard.back();
                    } else if !yes(&prompt("Try again? [y/N]: ")?) {
                        return Ok(());
                    }
                }
            }
            Step::Shared => break,
        }
    }

    let draft = wizard.draft();
    println!("\nQuiz published successfully!");
    if let Some(link) = wizard.share_link(origin) {
        println!("Share this link with {}:", draft.respondent);
        println!("  {link}");
        println!(
            "\n{}'s Love Quiz for {} -- take this quiz to see how well you know our love story!",
            draft.author, draft.respondent
        );
    }
    Ok(())
}

fn edit_question(wizard: &mut WizardController) -> anyhow::Result<()> {
    let index = wizard.current_question();
    let placeholder = {
        let draft = wizard.draft();
        defaults::prompt_placeholder(index, &draft.author, &draft.respondent)
    };
    println!("\nQuestion {} of {QUESTION_COUNT}", index + 1);
    println!("e.g. {placeholder}");

    let Some(draft) = wizard.draft_mut() else { return Ok(()) };
    let label = prompt_nonempty("Question: ")?;
    draft.set_label(index, &label);

    if yes(&prompt("Multiple choice? [y/N]: ")?) {
        draft.set_question_kind(index, QuestionKind::Select);
        show_options(draft, index);
        if yes(&prompt("Edit the options? [y/N]: ")?) {
            let entered = read_options()?;
            if let Err(err) = apply_options(draft, index, &entered) {
                println!("{err}");
            }
            show_options(draft, index);
        }
        loop {
            let options = match draft.question(index) {
                Some(question) => question.options().to_vec(),
                None => break,
            };
            let pick = prompt("Correct option (letter): ")?;
            match pick_option(&pick, &options) {
                Some(option) => {
                    draft.set_correct_answer(index, option);
                    break;
                }
                None => println!("Please pick one of the listed options."),
            }
        }
    } else {
        draft.set_question_kind(index, QuestionKind::Text);
        println!("Any answer will count as correct.");
    }

    if let Err(err) = wizard.advance() {
        println!("{err}");
    }
    Ok(())
}

fn show_options(draft: &QuizDraft, index: usize) {
    if let Some(question) = draft.question(index) {
        for (position, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", letter(position));
        }
    }
}

fn read_options() -> anyhow::Result<Vec<String>> {
    println!("Enter {MIN_OPTIONS} to {MAX_OPTIONS} options; leave a line blank to finish.");
    let mut options = Vec::new();
    while options.len() < MAX_OPTIONS {
        let option = prompt(&format!("Option {}: ", letter(options.len())))?;
        if option.is_empty() {
            if options.len() >= MIN_OPTIONS {
                break;
            }
            println!("At least {MIN_OPTIONS} options are needed.");
            continue;
        }
        options.push(option);
    }
    Ok(options)
}

/// Reshapes the question's option list to match the entered one, going
/// through the draft's bounded add/remove/set operations.
fn apply_options(
    draft: &mut QuizDraft,
    index: usize,
    entered: &[String],
) -> Result<(), ValidationError> {
    let count = |draft: &QuizDraft| draft.question(index).map_or(0, |q| q.options().len());
    while count(draft) > entered.len().max(MIN_OPTIONS) {
        let last = count(draft) - 1;
        draft.remove_option(index, last)?;
    }
    while count(draft) < entered.len() {
        draft.add_option(index)?;
    }
    for (position, text) in entered.iter().enumerate() {
        draft.set_option(index, position, text)?;
    }
    Ok(())
}

fn edit_reveal(wizard: &mut WizardController) -> anyhow::Result<()> {
    let Some(draft) = wizard.draft_mut() else { return Ok(()) };
    println!("\nFinal reveal -- shown to {} after the quiz.", draft.respondent);
    draft.reveal_text = prompt_nonempty("Reveal message: ")?;

    let path = prompt("Reveal image file (blank for none): ")?;
    if !path.is_empty() {
        match fs::read(&path) {
            Ok(bytes) => match image::ingest(&bytes) {
                Ok(payload) => draft.reveal_image = Some(payload),
                Err(err) => println!("{err}"),
            },
            Err(err) => println!("Could not read {path}: {err}"),
        }
    }

    if yes(&prompt("Customize the score messages? [y/N]: ")?) {
        for tier in [Tier::Perfect, Tier::Good, Tier::Low] {
            let current = draft.messages.get(tier).text.clone();
            let text = prompt(&format!("{} message [{current}]: ", tier.name()))?;
            if !text.is_empty() {
                draft.messages.get_mut(tier).text = text;
            }
        }
    }

    if let Err(err) = wizard.advance() {
        println!("{err}");
    }
    Ok(())
}

async fn play(api: Api, id: &str) -> anyhow::Result<()> {
    let store = QuizStore::new(api);
    let quiz = store
        .load(id)
        .await
        .map_err(|err| anyhow::anyhow!("could not load quiz {id}: {err}"))?;

    println!("{}'s Love Quiz for {}", quiz.author, quiz.respondent);
    println!("{} questions, {} points each.\n", quiz.questions.len(), quiz.scoring.points_per_question);

    let mut session = QuizSession::new(&quiz);
    loop {
        let name = prompt_nonempty("Your name: ")?;
        match session.start(&name) {
            Ok(()) => break,
            Err(err) => println!("{err}"),
        }
    }

    while let Some(question) = session.current_question() {
        println!("\n{} of {}: {}", session.current_index() + 1, quiz.questions.len(), question.label);
        let answer = match question.kind {
            QuestionKind::Select => {
                for (position, option) in question.options.iter().enumerate() {
                    println!("  {}. {option}", letter(position));
                }
                loop {
                    let pick = prompt("Your answer (letter): ")?;
                    match pick_option(&pick, &question.options) {
                        Some(option) => break option.to_owned(),
                        None => println!("Please pick one of the listed options."),
                    }
                }
            }
            QuestionKind::Text => prompt_nonempty("Your answer: ")?,
        };
        if let Err(err) = session.select_answer(&answer) {
            println!("{err}");
            continue;
        }
        match session.confirm_and_advance() {
            Ok(record) if record.correct => println!("Correct! +{} points", record.points),
            Ok(_) => println!("Not quite. +0 points"),
            Err(err) => println!("{err}"),
        }
    }

    println!("\nYour score: {} / {}", session.score(), session.max_score());
    if let Some(message) = session.result_message() {
        println!("{}", message.text);
        if let Some(caption) = &message.image_caption {
            println!("({caption})");
        }
    }

    println!("\nA message from {}:", quiz.author);
    println!("{}", quiz.reveal.text);
    if quiz.reveal.image.is_some() {
        println!("(There's a picture waiting for you in the web version!)");
    }

    println!("\nYour answers:");
    for record in session.answers() {
        let mark = if record.correct { "correct" } else { "incorrect" };
        println!("  Q{}: {} ({mark}, +{} points)", record.question_id, record.answer, record.points);
    }
    Ok(())
}
