use anyhow::{Context, Result};
use rankguess_core::{
    Catalog, Engine, EngineError, Event, EventBus, Guess, GuessOutcome, HighScoreStore,
    MemoryStore, Phase, RngState, SessionStart,
};
use rankguess_cui::{load_config, open_store, LaunchOptions};
use rankguess_data::{
    load_catalog_report, select_source, thumbnail_for, CatalogOrigin, Thumbnail,
};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_AUTO_SEED: u64 = 0xC0FFEE;
const DEFAULT_AUTO_ROUNDS: u32 = 25;

#[derive(Debug, Clone)]
struct CliOptions {
    auto: bool,
    cui: bool,
    json: bool,
    rounds: u32,
    launch: LaunchOptions,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut auto = false;
    let mut cui = false;
    let mut json = false;
    let mut rounds = DEFAULT_AUTO_ROUNDS;
    let mut launch = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto" => auto = true,
            "--cui" => cui = true,
            "--json" => json = true,
            "--offline" => launch.offline = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    launch.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--rounds" => {
                if let Some(value) = args.get(idx + 1) {
                    rounds = value.parse::<u32>().unwrap_or(DEFAULT_AUTO_ROUNDS);
                    idx += 1;
                }
            }
            "--catalog" => {
                if let Some(value) = args.get(idx + 1) {
                    launch.catalog_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    launch.assets_dir = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    CliOptions {
        auto,
        cui,
        json,
        rounds,
        launch,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if options.cui {
        if let Err(err) = rankguess_cui::run(options.launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    let result = if options.auto {
        run_auto(&options)
    } else {
        run_line_mode(&options)
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

struct Setup {
    engine: Engine,
    catalog: Catalog,
    notes: Vec<String>,
}

fn build_engine(
    launch: &LaunchOptions,
    seed: Option<u64>,
    store: Option<Box<dyn HighScoreStore + Send>>,
) -> Result<Setup> {
    let config = load_config(launch)?;
    let source = select_source(&config, launch.offline, launch.catalog_path.as_ref());
    let report = load_catalog_report(source.as_ref());
    let mut notes = Vec::new();
    match &report.origin {
        CatalogOrigin::Source(name) => {
            notes.push(format!("loaded {} levels from {name}", report.catalog.len()))
        }
        CatalogOrigin::Fallback { reason } => {
            notes.push(format!("level list unavailable: {reason}"));
            notes.push(format!(
                "using built-in list of {} levels",
                report.catalog.len()
            ));
        }
    }
    let rng = seed
        .map(RngState::from_seed)
        .unwrap_or_else(RngState::from_entropy);
    let store = store.unwrap_or_else(|| open_store(&config));
    Ok(Setup {
        engine: Engine::new(config, rng, store),
        catalog: report.catalog,
        notes,
    })
}

#[derive(Serialize)]
struct AutoLine<'a> {
    round: u32,
    event: &'a Event,
}

/// Plays without looking at the hidden rank: items in the lower half of the list are
/// bet to be beaten by a higher one, and the other way round.
fn auto_pick(engine: &Engine) -> Guess {
    let items = engine.catalog().items();
    let median = items[items.len() / 2].rank;
    match engine.round.as_ref() {
        Some(round) if round.current.rank > median => Guess::Higher,
        _ => Guess::Lower,
    }
}

fn run_auto(options: &CliOptions) -> Result<()> {
    let seed = options.launch.seed.unwrap_or(DEFAULT_AUTO_SEED);
    let Setup {
        mut engine,
        catalog,
        notes,
    } = build_engine(
        &options.launch,
        Some(seed),
        Some(Box::new(MemoryStore::default())),
    )?;
    if !options.json {
        println!("seed: {seed}");
        for note in &notes {
            println!("{note}");
        }
    }
    let mut events = EventBus::default();
    engine
        .start_session(catalog, &mut events)
        .context("start session")?;

    let mut sessions = 1u32;
    for round in 1..=options.rounds {
        match engine.phase() {
            Phase::GameOver => {
                engine.restart_session(&mut events)?;
                sessions += 1;
            }
            Phase::Revealed => engine.start_round(&mut events)?,
            Phase::AwaitingGuess | Phase::Loading => {}
        }
        let guess = auto_pick(&engine);
        engine.submit_guess(guess, &mut events)?;
        for event in events.drain() {
            if options.json {
                let line = serde_json::to_string(&AutoLine {
                    round,
                    event: &event,
                })?;
                println!("{line}");
            } else {
                println!("round {round}: {event:?}");
            }
        }
    }
    if !options.json {
        println!(
            "sessions: {sessions}, final score: {}, best: {}",
            engine.session.score, engine.session.high_score
        );
    }
    Ok(())
}

fn run_line_mode(options: &CliOptions) -> Result<()> {
    let Setup {
        mut engine,
        catalog,
        notes,
    } = build_engine(&options.launch, options.launch.seed, None)?;
    for note in &notes {
        println!("{note}");
    }
    let mut events = EventBus::default();
    if let Err(err) = engine.start_session(catalog, &mut events) {
        anyhow::bail!("game cannot start: {err}");
    }
    let _ = events.drain().count();
    println!("best score so far: {}", engine.session.high_score);
    print_help();
    print_round(&engine);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt_text(&engine));
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("read command")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Some(guess) = Guess::parse(input) {
            match engine.submit_guess(guess, &mut events) {
                Ok(outcome) => print_outcome(&engine, &outcome),
                Err(err) => print_engine_error(&err),
            }
            let _ = events.drain().count();
            continue;
        }
        match input {
            "next" | "n" => match engine.start_round(&mut events) {
                Ok(()) => print_round(&engine),
                Err(err) => print_engine_error(&err),
            },
            "restart" | "r" => match engine.restart_session(&mut events) {
                Ok(SessionStart::Started) => {
                    println!("new game");
                    print_round(&engine);
                }
                Ok(SessionStart::NotReady) => println!("level list still loading"),
                Err(err) => print_engine_error(&err),
            },
            "state" | "s" => print_state(&engine),
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => println!("unknown command: {other} (type help)"),
        }
        let _ = events.drain().count();
    }
    println!(
        "final score {}, best {}",
        engine.session.score, engine.session.high_score
    );
    Ok(())
}

fn prompt_text(engine: &Engine) -> &'static str {
    match engine.phase() {
        Phase::AwaitingGuess => "[higher/lower] > ",
        Phase::Revealed => "[next] > ",
        Phase::GameOver => "[restart] > ",
        Phase::Loading => "> ",
    }
}

fn print_help() {
    println!("commands:");
    println!("  higher | h     next level ranks higher (closer to #1)");
    println!("  lower  | l     next level ranks lower");
    println!("  next   | n     start the next round after a correct guess");
    println!("  restart| r     start over after a wrong guess");
    println!("  state  | s     show score and current pair");
    println!("  help   | ?     this list");
    println!("  quit   | q     leave");
}

fn print_round(engine: &Engine) {
    let Some(view) = engine.round_view() else {
        println!("no round in progress");
        return;
    };
    let base = &engine.config.thumbnail_base;
    println!();
    if let Some(round) = engine.round.as_ref() {
        println!(
            "  {} (#{})  {}",
            view.current_name,
            view.current_rank,
            thumbnail_text(thumbnail_for(base, &round.current))
        );
        println!(
            "  {} (#?)  {}",
            view.next_name,
            thumbnail_text(thumbnail_for(base, &round.next))
        );
    }
    println!(
        "is {} higher or lower than {}?",
        view.next_name, view.current_name
    );
}

fn thumbnail_text(thumbnail: Thumbnail) -> String {
    match thumbnail {
        Thumbnail::Remote(uri) => uri,
        Thumbnail::Placeholder => "[no thumbnail]".to_string(),
    }
}

fn print_outcome(engine: &Engine, outcome: &GuessOutcome) {
    let next_name = engine
        .round
        .as_ref()
        .map(|round| round.next.name.as_str())
        .unwrap_or("?");
    println!("{next_name} is #{}", outcome.revealed_rank);
    if outcome.correct {
        println!("correct! score {}", outcome.score);
        if outcome.new_high_score {
            println!("new high score: {}", outcome.high_score);
        }
        println!("type next to continue");
    } else {
        println!(
            "wrong, the answer was {}. final score {} (best {})",
            outcome.truth.label(),
            outcome.score,
            outcome.high_score
        );
        println!("type restart to play again");
    }
}

fn print_state(engine: &Engine) {
    let snapshot = engine.snapshot();
    println!(
        "score {} | best {} | levels {} | {:?}",
        snapshot.score, snapshot.high_score, snapshot.catalog_len, snapshot.phase
    );
    if let Some(view) = snapshot.round {
        let next_rank = view
            .next_rank
            .map(|rank| format!("#{rank}"))
            .unwrap_or_else(|| "#?".to_string());
        println!(
            "  {} #{} vs {} {}",
            view.current_name, view.current_rank, view.next_name, next_rank
        );
    }
}

fn print_engine_error(err: &EngineError) {
    let hint = match err {
        EngineError::SessionOver => "type restart",
        EngineError::RoundPending => "guess higher or lower first",
        EngineError::NoActiveRound => "type next",
        EngineError::NotReady => "wait for the level list",
        EngineError::EmptyCatalog => "no levels to play",
    };
    println!("{err} ({hint})");
}
