use rankguess_core::{
    Catalog, Engine, EngineError, Event, EventBus, GameConfig, Guess, HighScoreStore, Item,
    MemoryStore, Phase, RngState, Round, SessionStart, StoreError,
};

fn abc_catalog() -> Catalog {
    Catalog::new(vec![
        Item::new(1, "A", 1),
        Item::new(2, "B", 2),
        Item::new(3, "C", 3),
    ])
}

fn item(catalog: &Catalog, name: &str) -> Item {
    catalog.find_by_name(name).cloned().expect("item in catalog")
}

fn started(seed: u64, catalog: Catalog) -> (Engine, EventBus) {
    let mut engine = Engine::with_seed(seed);
    let mut events = EventBus::default();
    engine
        .start_session(catalog, &mut events)
        .expect("start session");
    (engine, events)
}

fn force_round(engine: &mut Engine, current: &str, next: &str) {
    let catalog = engine.catalog().clone();
    engine.round = Some(Round::new(item(&catalog, current), item(&catalog, next)));
}

fn correct_guess(engine: &Engine) -> Guess {
    let round = engine.round.as_ref().expect("round");
    if round.next.rank < round.current.rank {
        Guess::Higher
    } else {
        Guess::Lower
    }
}

#[test]
fn guess_higher_on_smaller_rank_is_correct() {
    let (mut engine, mut events) = started(1, abc_catalog());
    force_round(&mut engine, "B", "A");
    let outcome = engine
        .submit_guess(Guess::Higher, &mut events)
        .expect("guess");
    assert!(outcome.correct);
    assert_eq!(outcome.truth, Guess::Higher);
    assert_eq!(outcome.revealed_rank, 1);
    assert_eq!(engine.session.score, 1);
    assert!(!engine.session.is_over);
    assert_eq!(engine.phase(), Phase::Revealed);
}

#[test]
fn guess_higher_on_larger_rank_ends_session() {
    let (mut engine, mut events) = started(1, abc_catalog());
    force_round(&mut engine, "A", "C");
    let outcome = engine
        .submit_guess(Guess::Higher, &mut events)
        .expect("guess");
    assert!(!outcome.correct);
    assert_eq!(outcome.truth, Guess::Lower);
    assert_eq!(outcome.revealed_rank, 3);
    assert!(engine.session.is_over);
    assert_eq!(engine.session.score, 0);
    assert_eq!(engine.phase(), Phase::GameOver);
}

#[test]
fn correctness_matches_rank_order_for_every_pair() {
    let catalog = abc_catalog();
    for current in catalog.items() {
        for next in catalog.items() {
            if current.rank == next.rank {
                continue;
            }
            for guess in [Guess::Higher, Guess::Lower] {
                let (mut engine, mut events) = started(9, catalog.clone());
                engine.round = Some(Round::new(current.clone(), next.clone()));
                let outcome = engine.submit_guess(guess, &mut events).expect("guess");
                let expected = match guess {
                    Guess::Higher => next.rank < current.rank,
                    Guess::Lower => next.rank > current.rank,
                };
                assert_eq!(
                    outcome.correct, expected,
                    "{} -> {} guess {:?}",
                    current.name, next.name, guess
                );
            }
        }
    }
}

#[test]
fn tied_ranks_always_count_as_correct() {
    let catalog = Catalog::new(vec![Item::new(1, "X", 4), Item::new(2, "Y", 4)]);
    for guess in [Guess::Higher, Guess::Lower] {
        let (mut engine, mut events) = started(3, catalog.clone());
        force_round(&mut engine, "X", "Y");
        let outcome = engine.submit_guess(guess, &mut events).expect("guess");
        assert!(outcome.correct);
        assert_eq!(outcome.truth, guess);
    }
}

#[test]
fn correct_streak_never_ends_session() {
    let (mut engine, mut events) = started(11, abc_catalog());
    for expected_score in 1..=200 {
        let guess = correct_guess(&engine);
        let outcome = engine.submit_guess(guess, &mut events).expect("guess");
        assert!(outcome.correct);
        assert_eq!(engine.session.score, expected_score);
        assert!(!engine.session.is_over);
        engine.start_round(&mut events).expect("next round");
    }
}

#[test]
fn next_round_starts_from_previous_next_item() {
    let (mut engine, mut events) = started(5, abc_catalog());
    let guess = correct_guess(&engine);
    let previous_next = engine.round.as_ref().expect("round").next.clone();
    engine.submit_guess(guess, &mut events).expect("guess");
    engine.start_round(&mut events).expect("next round");
    let round = engine.round.as_ref().expect("round");
    assert_eq!(round.current, previous_next);
    assert!(!round.revealed);
}

#[test]
fn wrong_guess_blocks_play_until_restart() {
    let (mut engine, mut events) = started(2, abc_catalog());
    force_round(&mut engine, "A", "C");
    engine
        .submit_guess(Guess::Higher, &mut events)
        .expect("guess");
    assert_eq!(
        engine.submit_guess(Guess::Lower, &mut events),
        Err(EngineError::SessionOver)
    );
    assert_eq!(
        engine.start_round(&mut events),
        Err(EngineError::SessionOver)
    );

    let status = engine.restart_session(&mut events).expect("restart");
    assert_eq!(status, SessionStart::Started);
    assert!(!engine.session.is_over);
    assert_eq!(engine.session.score, 0);
    assert_eq!(engine.phase(), Phase::AwaitingGuess);
}

#[test]
fn revealed_round_rejects_second_guess() {
    let (mut engine, mut events) = started(2, abc_catalog());
    force_round(&mut engine, "B", "A");
    engine
        .submit_guess(Guess::Higher, &mut events)
        .expect("guess");
    assert_eq!(
        engine.submit_guess(Guess::Higher, &mut events),
        Err(EngineError::NoActiveRound)
    );
    assert_eq!(engine.session.score, 1);
}

#[test]
fn unrevealed_round_rejects_round_start() {
    let (mut engine, mut events) = started(2, abc_catalog());
    let before = engine.round.clone();
    assert_eq!(
        engine.start_round(&mut events),
        Err(EngineError::RoundPending)
    );
    assert_eq!(engine.round, before);
}

#[test]
fn empty_catalog_refuses_to_start() {
    let mut engine = Engine::with_seed(1);
    let mut events = EventBus::default();
    assert_eq!(
        engine.start_session(Catalog::default(), &mut events),
        Err(EngineError::EmptyCatalog)
    );
    assert_eq!(engine.phase(), Phase::Loading);
    assert!(engine.round.is_none());
}

#[test]
fn commands_before_loading_report_not_ready() {
    let mut engine = Engine::with_seed(1);
    let mut events = EventBus::default();
    assert!(engine.is_loading());
    assert_eq!(
        engine.restart_session(&mut events),
        Ok(SessionStart::NotReady)
    );
    assert_eq!(engine.start_round(&mut events), Err(EngineError::NotReady));
    assert_eq!(
        engine.submit_guess(Guess::Higher, &mut events),
        Err(EngineError::NotReady)
    );
    assert!(events.is_empty());
}

#[test]
fn next_differs_from_current_with_two_names() {
    let catalog = Catalog::new(vec![Item::new(1, "A", 1), Item::new(2, "B", 2)]);
    for seed in 0..50 {
        let (mut engine, mut events) = started(seed, catalog.clone());
        for _ in 0..20 {
            let round = engine.round.as_ref().expect("round");
            assert_ne!(round.current.name, round.next.name);
            let guess = correct_guess(&engine);
            engine.submit_guess(guess, &mut events).expect("guess");
            engine.start_round(&mut events).expect("next round");
        }
    }
}

#[test]
fn single_name_catalog_repeats_item() {
    let catalog = Catalog::new(vec![Item::new(1, "Solo", 1)]);
    let (mut engine, mut events) = started(4, catalog);
    let round = engine.round.clone().expect("round");
    assert_eq!(round.current, round.next);
    let outcome = engine
        .submit_guess(Guess::Lower, &mut events)
        .expect("guess");
    assert!(outcome.correct);
    engine.start_round(&mut events).expect("next round");
}

#[test]
fn duplicate_names_still_get_distinct_next() {
    let catalog = Catalog::new(vec![
        Item::new(1, "Same", 1),
        Item::new(2, "Same", 2),
        Item::new(3, "Same", 3),
        Item::new(4, "Other", 4),
    ]);
    for seed in 0..40 {
        let (engine, _) = started(seed, catalog.clone());
        let round = engine.round.as_ref().expect("round");
        assert_ne!(round.current.name, round.next.name, "seed {seed}");
    }
}

#[test]
fn high_score_is_monotonic_and_persisted() {
    let mut engine = Engine::new(
        GameConfig::default(),
        RngState::from_seed(8),
        Box::new(MemoryStore::with_value(2)),
    );
    let mut events = EventBus::default();
    engine
        .start_session(abc_catalog(), &mut events)
        .expect("start");
    assert_eq!(engine.session.high_score, 2);

    let mut best = engine.session.high_score;
    for streak in [1u32, 4, 0, 3, 6] {
        for _ in 0..streak {
            let guess = correct_guess(&engine);
            engine.submit_guess(guess, &mut events).expect("guess");
            engine.start_round(&mut events).expect("next round");
            assert!(engine.session.high_score >= best);
            best = engine.session.high_score;
        }
        let wrong = correct_guess(&engine).opposite();
        engine.submit_guess(wrong, &mut events).expect("guess");
        assert!(engine.session.is_over);
        engine.restart_session(&mut events).expect("restart");
        assert!(engine.session.high_score >= best);
        best = engine.session.high_score;
    }
    assert_eq!(best, 6);
    assert_eq!(engine.store().load(), 6);
}

#[test]
fn new_high_score_emits_event_once_per_raise() {
    let (mut engine, mut events) = started(6, abc_catalog());
    let _ = events.drain().count();
    let guess = correct_guess(&engine);
    let outcome = engine.submit_guess(guess, &mut events).expect("guess");
    assert!(outcome.new_high_score);
    let drained: Vec<Event> = events.drain().collect();
    assert!(drained.contains(&Event::HighScoreRaised { high_score: 1 }));
    assert!(drained.contains(&Event::ScoreChanged { score: 1 }));
}

#[test]
fn start_session_reads_store_and_announces() {
    let mut engine = Engine::new(
        GameConfig::default(),
        RngState::from_seed(3),
        Box::new(MemoryStore::with_value(9)),
    );
    let mut events = EventBus::default();
    engine
        .start_session(abc_catalog(), &mut events)
        .expect("start");
    let drained: Vec<Event> = events.drain().collect();
    assert_eq!(
        drained.first(),
        Some(&Event::SessionStarted {
            high_score: 9,
            catalog_len: 3
        })
    );
    assert!(matches!(drained.get(1), Some(Event::RoundStarted { .. })));
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::AwaitingGuess);
    assert_eq!(snapshot.high_score, 9);
    let view = snapshot.round.expect("round view");
    assert_eq!(view.next_rank, None);
}

struct FailingStore;

impl HighScoreStore for FailingStore {
    fn load(&self) -> u32 {
        0
    }

    fn save(&mut self, _value: u32) -> Result<(), StoreError> {
        Err(StoreError::Io("read-only".to_string()))
    }
}

#[test]
fn store_failure_does_not_interrupt_play() {
    let mut engine = Engine::new(
        GameConfig::default(),
        RngState::from_seed(12),
        Box::new(FailingStore),
    );
    let mut events = EventBus::default();
    engine
        .start_session(abc_catalog(), &mut events)
        .expect("start");
    let guess = correct_guess(&engine);
    let outcome = engine.submit_guess(guess, &mut events).expect("guess");
    assert!(outcome.correct);
    assert_eq!(engine.session.high_score, 1);
}

#[test]
fn reloading_the_catalog_keeps_an_unsaved_high_score() {
    let mut engine = Engine::new(
        GameConfig::default(),
        RngState::from_seed(12),
        Box::new(FailingStore),
    );
    let mut events = EventBus::default();
    engine
        .start_session(abc_catalog(), &mut events)
        .expect("start");
    let guess = correct_guess(&engine);
    engine.submit_guess(guess, &mut events).expect("guess");
    assert_eq!(engine.session.high_score, 1);

    engine
        .start_session(abc_catalog(), &mut events)
        .expect("second start");
    assert_eq!(engine.session.high_score, 1);
    assert_eq!(engine.session.score, 0);
}
