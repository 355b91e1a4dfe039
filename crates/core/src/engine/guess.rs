use super::*;
use crate::{Guess, GuessOutcome};

impl Engine {
    pub fn submit_guess(
        &mut self,
        guess: Guess,
        events: &mut EventBus,
    ) -> Result<GuessOutcome, EngineError> {
        if self.catalog.is_empty() {
            return Err(EngineError::NotReady);
        }
        if self.session.is_over {
            return Err(EngineError::SessionOver);
        }
        let round = match self.round.as_mut() {
            Some(round) if !round.revealed => round,
            _ => return Err(EngineError::NoActiveRound),
        };

        let truth = round.truth_for(guess);
        round.revealed = true;
        let revealed_rank = round.next.rank;
        let correct = guess == truth;
        events.push(Event::GuessRevealed {
            guess,
            truth,
            correct,
            revealed_rank,
        });

        let mut new_high_score = false;
        if correct {
            self.session.score += 1;
            events.push(Event::ScoreChanged {
                score: self.session.score,
            });
            if self.session.score > self.session.high_score {
                self.session.high_score = self.session.score;
                new_high_score = true;
                events.push(Event::HighScoreRaised {
                    high_score: self.session.high_score,
                });
                if let Err(err) = self.store.save(self.session.high_score) {
                    tracing::warn!(error = %err, "failed to persist high score");
                }
            }
        } else {
            self.session.is_over = true;
            events.push(Event::SessionOver {
                score: self.session.score,
                high_score: self.session.high_score,
            });
            tracing::info!(score = self.session.score, "session over");
        }

        Ok(GuessOutcome {
            guess,
            truth,
            correct,
            revealed_rank,
            score: self.session.score,
            high_score: self.session.high_score,
            new_high_score,
        })
    }
}
