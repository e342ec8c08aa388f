use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Score band a finished session resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Perfect,
    Good,
    Low,
}

impl Tier {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Low => "low",
        }
    }
}

/// Message payload attached to one tier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
}

/// Inclusive score range for one tier.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Band {
    pub min: u16,
    pub max: u16,
    pub message: Message,
}

/// Author-supplied messages, one per tier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TierMessages {
    pub perfect: Message,
    pub good: Message,
    pub low: Message,
}

impl TierMessages {
    pub const fn get(&self, tier: Tier) -> &Message {
        match tier {
            Tier::Perfect => &self.perfect,
            Tier::Good => &self.good,
            Tier::Low => &self.low,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Message {
        match tier {
            Tier::Perfect => &mut self.perfect,
            Tier::Good => &mut self.good,
            Tier::Low => &mut self.low,
        }
    }
}

/// The three score bands of a published quiz, highest first.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSystem {
    pub points_per_question: u16,
    pub perfect: Band,
    pub good: Band,
    pub low: Band,
}

impl ScoringSystem {
    /// Derives the bands for a quiz of the given size. A five-question,
    /// two-point quiz yields perfect [8,10], good [5,7], and low [0,4].
    pub fn for_quiz(question_count: u16, points_per_question: u16, messages: TierMessages) -> Self {
        let max = question_count * points_per_question;
        let perfect_min = max * 4 / 5;
        let good_min = max / 2;
        let TierMessages { perfect, good, low } = messages;
        Self {
            points_per_question,
            perfect: Band { min: perfect_min, max, message: perfect },
            good: Band { min: good_min, max: perfect_min.saturating_sub(1), message: good },
            low: Band { min: 0, max: good_min.saturating_sub(1), message: low },
        }
    }

    /// Resolves a final score to its tier. Bands are checked in descending
    /// order so boundary scores land on the highest qualifying tier.
    pub const fn tier(&self, score: u16) -> Tier {
        if score >= self.perfect.min {
            Tier::Perfect
        } else if score >= self.good.min {
            Tier::Good
        } else {
            Tier::Low
        }
    }

    /// Message associated with the given tier.
    pub const fn message(&self, tier: Tier) -> &Message {
        match tier {
            Tier::Perfect => &self.perfect.message,
            Tier::Good => &self.good.message,
            Tier::Low => &self.low.message,
        }
    }
}
