use crate::{Item, ItemId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Loading,
    AwaitingGuess,
    Revealed,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Guess {
    Higher,
    Lower,
}

impl Guess {
    pub fn opposite(self) -> Self {
        match self {
            Self::Higher => Self::Lower,
            Self::Lower => Self::Higher,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "higher" | "h" | "up" => Some(Self::Higher),
            "lower" | "l" | "down" => Some(Self::Lower),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub score: u32,
    pub high_score: u32,
    pub is_over: bool,
}

impl Session {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
            is_over: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub current: Item,
    pub next: Item,
    pub revealed: bool,
}

impl Round {
    pub fn new(current: Item, next: Item) -> Self {
        Self {
            current,
            next,
            revealed: false,
        }
    }

    /// Higher means `next` sits above `current` on the list, i.e. a smaller rank number.
    /// A tie has no answer of its own, so the guess is taken as the truth.
    pub fn truth_for(&self, guess: Guess) -> Guess {
        use std::cmp::Ordering;
        match self.next.rank.cmp(&self.current.rank) {
            Ordering::Less => Guess::Higher,
            Ordering::Greater => Guess::Lower,
            Ordering::Equal => guess,
        }
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            current_id: self.current.id,
            current_name: self.current.name.clone(),
            current_rank: self.current.rank,
            next_id: self.next.id,
            next_name: self.next.name.clone(),
            next_rank: self.revealed.then_some(self.next.rank),
            revealed: self.revealed,
        }
    }
}

/// What a presentation layer may see of a round; `next_rank` stays hidden until the reveal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundView {
    pub current_id: ItemId,
    pub current_name: String,
    pub current_rank: i64,
    pub next_id: ItemId,
    pub next_name: String,
    pub next_rank: Option<i64>,
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessOutcome {
    pub guess: Guess,
    pub truth: Guess,
    pub correct: bool,
    pub revealed_rank: i64,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
    pub is_over: bool,
    pub round: Option<RoundView>,
    pub catalog_len: usize,
}
