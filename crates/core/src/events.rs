use crate::{Guess, ItemId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SessionStarted {
        high_score: u32,
        catalog_len: usize,
    },
    RoundStarted {
        current: ItemId,
        next: ItemId,
        current_rank: i64,
    },
    GuessRevealed {
        guess: Guess,
        truth: Guess,
        correct: bool,
        revealed_rank: i64,
    },
    ScoreChanged { score: u32 },
    HighScoreRaised { high_score: u32 },
    SessionOver { score: u32, high_score: u32 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
