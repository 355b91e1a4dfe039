use super::*;
use crate::Item;

impl Engine {
    pub fn start_round(&mut self, events: &mut EventBus) -> Result<(), EngineError> {
        if self.catalog.is_empty() {
            return Err(EngineError::NotReady);
        }
        if self.session.is_over {
            return Err(EngineError::SessionOver);
        }
        if matches!(&self.round, Some(round) if !round.revealed) {
            return Err(EngineError::RoundPending);
        }

        let current = match self.round.take() {
            Some(previous) => previous.next,
            None => self.random_item(),
        };
        let next = self.pick_next(&current);
        tracing::debug!(
            current = %current.name,
            next = %next.name,
            "round started"
        );
        events.push(Event::RoundStarted {
            current: current.id,
            next: next.id,
            current_rank: current.rank,
        });
        self.round = Some(Round::new(current, next));
        Ok(())
    }

    fn random_item(&mut self) -> Item {
        let idx = self.rng.pick_index(self.catalog.len());
        self.catalog.items()[idx].clone()
    }

    /// Redraws while the name matches `current`, up to the configured attempt count;
    /// the last draw is kept even if it still matches.
    fn pick_next(&mut self, current: &Item) -> Item {
        let attempts = self.config.next_attempts();
        let mut candidate = self.random_item();
        let mut drawn = 1;
        while candidate.name == current.name && drawn < attempts {
            candidate = self.random_item();
            drawn += 1;
        }
        if candidate.name == current.name {
            tracing::debug!(
                name = %current.name,
                attempts,
                "no distinct next item found; accepting repeat"
            );
        }
        candidate
    }
}
