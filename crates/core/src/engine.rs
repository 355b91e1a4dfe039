use crate::{
    Catalog, Event, EventBus, GameConfig, HighScoreStore, MemoryStore, Phase, RngState, Round,
    RoundView, Session, Snapshot,
};
use thiserror::Error;

mod guess;
mod round;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("catalog is empty; the game cannot start")]
    EmptyCatalog,
    #[error("catalog is still loading")]
    NotReady,
    #[error("session is over; restart to keep playing")]
    SessionOver,
    #[error("current round is still waiting for a guess")]
    RoundPending,
    #[error("no round is waiting for a guess")]
    NoActiveRound,
}

/// Result of asking for a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    Started,
    NotReady,
}

pub struct Engine {
    pub config: GameConfig,
    pub rng: RngState,
    pub session: Session,
    pub round: Option<Round>,
    catalog: Catalog,
    store: Box<dyn HighScoreStore + Send>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("seed", &self.rng.seed())
            .field("session", &self.session)
            .field("round", &self.round)
            .field("catalog_len", &self.catalog.len())
            .finish()
    }
}

impl Engine {
    /// A new engine sits in `Loading` until `start_session` hands it a catalog.
    pub fn new(config: GameConfig, rng: RngState, store: Box<dyn HighScoreStore + Send>) -> Self {
        let high_score = store.load();
        Self {
            config,
            rng,
            session: Session::new(high_score),
            round: None,
            catalog: Catalog::default(),
            store,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            GameConfig::default(),
            RngState::from_seed(seed),
            Box::new(MemoryStore::default()),
        )
    }

    pub fn start_session(
        &mut self,
        catalog: Catalog,
        events: &mut EventBus,
    ) -> Result<(), EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        self.catalog = catalog;
        // A failed save must not let a reload lower the score held in memory.
        let high_score = self.store.load().max(self.session.high_score);
        self.session = Session::new(high_score);
        self.round = None;
        events.push(Event::SessionStarted {
            high_score: self.session.high_score,
            catalog_len: self.catalog.len(),
        });
        tracing::info!(
            items = self.catalog.len(),
            high_score = self.session.high_score,
            "session started"
        );
        self.start_round(events)
    }

    /// Same as `start_session` with the catalog already held. The high score carries over
    /// from memory so it never drops within a run.
    pub fn restart_session(&mut self, events: &mut EventBus) -> Result<SessionStart, EngineError> {
        if self.catalog.is_empty() {
            return Ok(SessionStart::NotReady);
        }
        self.session = Session::new(self.session.high_score);
        self.round = None;
        events.push(Event::SessionStarted {
            high_score: self.session.high_score,
            catalog_len: self.catalog.len(),
        });
        self.start_round(events)?;
        Ok(SessionStart::Started)
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.catalog.is_empty() {
            return Phase::Loading;
        }
        if self.session.is_over {
            return Phase::GameOver;
        }
        match &self.round {
            Some(round) if !round.revealed => Phase::AwaitingGuess,
            _ => Phase::Revealed,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    pub fn round_view(&self) -> Option<RoundView> {
        self.round.as_ref().map(Round::view)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            score: self.session.score,
            high_score: self.session.high_score,
            is_over: self.session.is_over,
            round: self.round_view(),
            catalog_len: self.catalog.len(),
        }
    }
}
