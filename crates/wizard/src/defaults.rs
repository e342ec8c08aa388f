//! Personalized placeholder content for the wizard. Purely advisory UI
//! hinting; validation never depends on any of it.

use model::{Message, TierMessages};

fn or_fallback<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    let name = name.trim();
    if name.is_empty() {
        fallback
    } else {
        name
    }
}

/// Prompt placeholder for the question at `index`, personalized with the
/// two identity names.
pub fn prompt_placeholder(index: usize, author: &str, respondent: &str) -> String {
    let you = or_fallback(author, "You");
    let them = or_fallback(respondent, "Your Partner");
    match index {
        0 => format!("Where did {you} and {them} first meet?"),
        1 => format!("Who fell in love first, {you} or {them}?"),
        2 => String::from("Who said \"I love you\" first?"),
        3 => format!("What's the most special memory of {them}?"),
        4 => format!("Where would {you} and {them} like to go on a dream vacation?"),
        _ => format!("Question {}", index + 1),
    }
}

/// Default option list installed when the question at `index` switches to
/// multiple choice.
pub fn default_options(index: usize, author: &str, respondent: &str) -> Vec<String> {
    let you = or_fallback(author, "You");
    let them = or_fallback(respondent, "Your Partner");
    match index {
        0 => vec![
            String::from("At a coffee shop"),
            String::from("Through mutual friends"),
            String::from("At work"),
            String::from("Online"),
        ],
        1 => vec![
            String::from(you),
            String::from(them),
            String::from("Both at the same time"),
        ],
        2 => vec![
            format!("{you} said it first"),
            format!("{them} said it first"),
            String::from("We said it together"),
        ],
        3 => vec![
            String::from("Their smile"),
            String::from("Their kindness"),
            String::from("The way they care for me"),
            String::from("Everything about them"),
        ],
        4 => vec![
            String::from("Paris"),
            String::from("Maldives"),
            String::from("Japan"),
            String::from("Switzerland"),
        ],
        _ => vec![
            String::from("Option A"),
            String::from("Option B"),
            String::from("Option C"),
            String::from("Option D"),
        ],
    }
}

/// Starting messages for the three score tiers.
pub fn default_messages() -> TierMessages {
    TierMessages {
        perfect: Message {
            text: String::from("Perfect! You know everything about me!"),
            ..Default::default()
        },
        good: Message {
            text: String::from("Great! You know me pretty well!"),
            ..Default::default()
        },
        low: Message {
            text: String::from("We have so much more to discover together!"),
            ..Default::default()
        },
    }
}
