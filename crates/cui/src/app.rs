use crate::persistence::{default_score_path, FileStore};
use anyhow::{Context, Result};
use rankguess_core::{
    Catalog, Engine, EngineError, Event, EventBus, GameConfig, Guess, GuessOutcome, HighScoreStore,
    Item, ItemId, MemoryStore, Phase, RngState, SessionStart,
};
use rankguess_data::{
    apply_env_overrides, load_catalog_report, load_game_config, select_source, thumbnail_for,
    CatalogOrigin, Thumbnail,
};
use std::collections::VecDeque;
use std::path::PathBuf;

const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub offline: bool,
    pub catalog_path: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
}

pub struct App {
    pub engine: Engine,
    pub events: EventBus,
    pub last_outcome: Option<GuessOutcome>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub source_label: String,
    pub show_help: bool,
    pub should_quit: bool,
}

pub fn load_config(options: &LaunchOptions) -> Result<GameConfig> {
    let assets = options
        .assets_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("assets"));
    let config = load_game_config(&assets).context("load config")?;
    Ok(apply_env_overrides(config))
}

pub fn open_store(config: &GameConfig) -> Box<dyn HighScoreStore + Send> {
    match default_score_path() {
        Some(path) => Box::new(FileStore::new(path, config.high_score_key.clone())),
        None => {
            tracing::warn!("no home directory; high score kept in memory only");
            Box::new(MemoryStore::default())
        }
    }
}

impl App {
    pub fn bootstrap(options: &LaunchOptions) -> Result<Self> {
        let config = load_config(options)?;
        let source = select_source(&config, options.offline, options.catalog_path.as_ref());
        let report = load_catalog_report(source.as_ref());
        let source_label = match &report.origin {
            CatalogOrigin::Source(name) => name.clone(),
            CatalogOrigin::Fallback { .. } => "built-in list".to_string(),
        };
        let rng = options
            .seed
            .map(RngState::from_seed)
            .unwrap_or_else(RngState::from_entropy);
        let store = open_store(&config);
        let engine = Engine::new(config, rng, store);
        let mut app = Self::with_catalog(engine, report.catalog, source_label)?;
        if let CatalogOrigin::Fallback { reason } = &report.origin {
            app.push_event_line(format!("level list unavailable ({reason}); using built-in list"));
        }
        Ok(app)
    }

    pub fn with_catalog(mut engine: Engine, catalog: Catalog, source_label: String) -> Result<Self> {
        let mut events = EventBus::default();
        engine
            .start_session(catalog, &mut events)
            .map_err(|err| anyhow::anyhow!(err))
            .context("start session")?;
        let mut app = Self {
            engine,
            events,
            last_outcome: None,
            event_log: VecDeque::new(),
            status_line: "higher or lower?".to_string(),
            source_label,
            show_help: false,
            should_quit: false,
        };
        app.flush_events();
        Ok(app)
    }

    pub fn guess(&mut self, guess: Guess) {
        match self.engine.submit_guess(guess, &mut self.events) {
            Ok(outcome) => {
                self.status_line = if outcome.correct {
                    if outcome.new_high_score {
                        format!("correct! new best: {}", outcome.high_score)
                    } else {
                        "correct! press enter for the next level".to_string()
                    }
                } else {
                    format!(
                        "wrong, it was {}. final score {}; press r to restart",
                        outcome.truth.label(),
                        outcome.score
                    )
                };
                self.last_outcome = Some(outcome);
            }
            Err(err) => self.report_error(&err),
        }
        self.flush_events();
    }

    pub fn next_round(&mut self) {
        match self.engine.start_round(&mut self.events) {
            Ok(()) => {
                self.last_outcome = None;
                self.status_line = "higher or lower?".to_string();
            }
            Err(err) => self.report_error(&err),
        }
        self.flush_events();
    }

    pub fn restart(&mut self) {
        match self.engine.restart_session(&mut self.events) {
            Ok(SessionStart::Started) => {
                self.last_outcome = None;
                self.status_line = "new game: higher or lower?".to_string();
            }
            Ok(SessionStart::NotReady) => {
                self.status_line = "level list still loading".to_string();
            }
            Err(err) => self.report_error(&err),
        }
        self.flush_events();
    }

    /// Enter advances: next round after a correct guess, restart after game over.
    pub fn activate_primary(&mut self) {
        match self.engine.phase() {
            Phase::Revealed => self.next_round(),
            Phase::GameOver => self.restart(),
            Phase::AwaitingGuess => {
                self.status_line = "pick higher (k/up) or lower (j/down) first".to_string();
            }
            Phase::Loading => {
                self.status_line = "level list still loading".to_string();
            }
        }
    }

    pub fn next_hint(&self) -> &'static str {
        match self.engine.phase() {
            Phase::Loading => "loading",
            Phase::AwaitingGuess => "higher: k/up  lower: j/down",
            Phase::Revealed => "enter: next level",
            Phase::GameOver => "r/enter: restart",
        }
    }

    pub fn thumbnail_label(&self, item: &Item) -> String {
        match thumbnail_for(&self.engine.config.thumbnail_base, item) {
            Thumbnail::Remote(uri) => uri,
            Thumbnail::Placeholder => "[no thumbnail]".to_string(),
        }
    }

    fn report_error(&mut self, err: &EngineError) {
        self.status_line = match err {
            EngineError::SessionOver => "game over; press r to restart".to_string(),
            EngineError::RoundPending => "make a guess first".to_string(),
            EngineError::NoActiveRound => "already revealed; press enter".to_string(),
            other => other.to_string(),
        };
    }

    pub fn flush_events(&mut self) {
        let drained: Vec<Event> = self.events.drain().collect();
        for event in drained {
            let line = self.describe_event(&event);
            self.push_event_line(line);
        }
    }

    fn describe_event(&self, event: &Event) -> String {
        let name_of = |id: ItemId| {
            self.engine
                .catalog()
                .items()
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        match event {
            Event::SessionStarted {
                high_score,
                catalog_len,
            } => format!("new game with {catalog_len} levels (best {high_score})"),
            Event::RoundStarted {
                current,
                next,
                current_rank,
            } => format!(
                "is {} higher or lower than {} (#{current_rank})?",
                name_of(*next),
                name_of(*current)
            ),
            Event::GuessRevealed {
                guess,
                correct,
                revealed_rank,
                ..
            } => format!(
                "guessed {}: {} (#{revealed_rank})",
                guess.label(),
                if *correct { "correct" } else { "wrong" }
            ),
            Event::ScoreChanged { score } => format!("score {score}"),
            Event::HighScoreRaised { high_score } => format!("new high score {high_score}"),
            Event::SessionOver { score, high_score } => {
                format!("game over: score {score}, best {high_score}")
            }
        }
    }

    pub fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}
