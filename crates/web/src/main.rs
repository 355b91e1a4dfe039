use rankguess_core::{
    Engine, Event, EventBus, GameConfig, Guess, GuessOutcome, Item, ItemId, MemoryStore,
    RngState, SessionStart, Snapshot,
};
use rankguess_data::{
    apply_env_overrides, load_catalog_report, load_game_config, placeholder_svg,
    resolve_thumbnail, select_source, CatalogOrigin, Thumbnail,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 7878;
const THUMBNAIL_PROBE_MS: u64 = 2000;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Default)]
struct ServerOptions {
    port: Option<u16>,
    offline: bool,
    catalog_path: Option<PathBuf>,
}

fn parse_options(args: &[String]) -> ServerOptions {
    let mut options = ServerOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--port" => {
                if let Some(value) = args.get(idx + 1) {
                    options.port = value.parse::<u16>().ok();
                    idx += 1;
                }
            }
            "--catalog" => {
                if let Some(value) = args.get(idx + 1) {
                    options.catalog_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--offline" => options.offline = true,
            _ => {}
        }
        idx += 1;
    }
    options
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args);
    let config = match load_game_config(Path::new("assets")) {
        Ok(config) => apply_env_overrides(config),
        Err(err) => {
            tracing::error!(error = %err, "config unreadable; using defaults");
            apply_env_overrides(GameConfig::default())
        }
    };

    let port = options.port.unwrap_or(DEFAULT_PORT);
    let server = match Server::http(("0.0.0.0", port)) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(error = %err, port, "failed to start server");
            std::process::exit(1);
        }
    };
    tracing::info!("rankguess web server on http://localhost:{port}");

    let state = Arc::new(Mutex::new(AppState::new(config.clone())));
    spawn_loader(state.clone(), config, options);

    for request in server.incoming_requests() {
        let state = state.clone();
        // Thumbnail probes can take seconds; keep them off the loop serving the game API.
        if request.url().starts_with("/thumb/") {
            thread::spawn(move || {
                if let Err(err) = handle_request(request, state) {
                    tracing::warn!(error = %err, "thumbnail request error");
                }
            });
            continue;
        }
        if let Err(err) = handle_request(request, state) {
            tracing::warn!(error = %err, "request error");
        }
    }
}

struct AppState {
    engine: Engine,
    events: EventBus,
    last_outcome: Option<GuessOutcome>,
    source: Option<String>,
    load_error: Option<String>,
    thumbnails: HashMap<ItemId, Thumbnail>,
}

impl AppState {
    fn new(config: GameConfig) -> Self {
        Self {
            engine: Engine::new(
                config,
                RngState::from_entropy(),
                Box::new(MemoryStore::default()),
            ),
            events: EventBus::default(),
            last_outcome: None,
            source: None,
            load_error: None,
            thumbnails: HashMap::new(),
        }
    }
}

/// The only suspend point: the list is fetched off the request thread, and requests made
/// meanwhile see the loading phase.
fn spawn_loader(state: Arc<Mutex<AppState>>, config: GameConfig, options: ServerOptions) {
    thread::spawn(move || {
        let source = select_source(&config, options.offline, options.catalog_path.as_ref());
        let report = load_catalog_report(source.as_ref());
        let Ok(mut guard) = state.lock() else {
            tracing::error!("state lock poisoned before the level list arrived");
            return;
        };
        let app = &mut *guard;
        app.source = Some(match &report.origin {
            CatalogOrigin::Source(name) => name.clone(),
            CatalogOrigin::Fallback { .. } => "built-in list".to_string(),
        });
        if let Err(err) = app.engine.start_session(report.catalog, &mut app.events) {
            tracing::error!(error = %err, "game cannot start");
            app.load_error = Some(err.to_string());
        }
    });
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: Snapshot,
    outcome: Option<GuessOutcome>,
    events: Vec<Event>,
    source: Option<String>,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> HandlerResult {
    let url = request.url().to_string();
    match (request.method(), url.as_str()) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/api/state") => {
            let response = {
                let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
                build_response(&mut guard, None)
            };
            respond_json(request, StatusCode(200), &response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            let read = request
                .as_reader()
                .read_to_string(&mut body)
                .map(|_| body)
                .map_err(|err| format!("unreadable request body: {err}"));
            let (status, response) = {
                let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
                match read.and_then(|body| parse_action(&body)) {
                    Ok(action) => {
                        let err = apply_action(&mut guard, &action);
                        (StatusCode(200), build_response(&mut guard, err))
                    }
                    Err(err) => (StatusCode(400), build_response(&mut guard, Some(err))),
                }
            };
            respond_json(request, status, &response)?;
        }
        (&Method::Get, path) if path.starts_with("/thumb/") => {
            let id = thumb_id(path);
            respond_thumbnail(request, &state, id)?;
        }
        _ => {
            request.respond(Response::empty(StatusCode(404)))?;
        }
    }
    Ok(())
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static")
        .join(file)
}

fn content_type_header(value: &str) -> Result<Header, Box<dyn std::error::Error>> {
    Header::from_bytes(&b"Content-Type"[..], value)
        .map_err(|_| format!("invalid content type {value}").into())
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> HandlerResult {
    let content = std::fs::read(path)?;
    let header = content_type_header(content_type)?;
    request.respond(Response::from_data(content).with_header(header))?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    status: StatusCode,
    response: &ApiResponse,
) -> HandlerResult {
    let body = serde_json::to_vec_pretty(response)?;
    let header = content_type_header("application/json")?;
    request.respond(
        Response::from_data(body)
            .with_status_code(status)
            .with_header(header),
    )?;
    Ok(())
}

fn parse_action(body: &str) -> Result<String, String> {
    serde_json::from_str::<ActionRequest>(body)
        .map(|request| request.action)
        .map_err(|err| format!("malformed action request: {err}"))
}

fn thumb_id(path: &str) -> Option<ItemId> {
    path.trim_start_matches("/thumb/")
        .parse::<u64>()
        .ok()
        .map(ItemId)
}

/// Redirects to the artwork when it exists, otherwise serves the placeholder gradient.
fn respond_thumbnail(
    request: tiny_http::Request,
    state: &Arc<Mutex<AppState>>,
    id: Option<ItemId>,
) -> HandlerResult {
    let thumbnail = thumbnail_for_id(state, id, |base, item| {
        resolve_thumbnail(base, item, THUMBNAIL_PROBE_MS)
    })?;
    match thumbnail {
        Thumbnail::Remote(uri) => {
            let location = Header::from_bytes(&b"Location"[..], uri.as_bytes())
                .map_err(|_| "invalid thumbnail location")?;
            request.respond(Response::empty(StatusCode(302)).with_header(location))?;
        }
        Thumbnail::Placeholder => {
            let header = content_type_header("image/svg+xml")?;
            request.respond(Response::from_string(placeholder_svg()).with_header(header))?;
        }
    }
    Ok(())
}

/// Each item is probed at most once per run; the lock is released while probing.
fn thumbnail_for_id(
    state: &Arc<Mutex<AppState>>,
    id: Option<ItemId>,
    probe: impl FnOnce(&str, &Item) -> Thumbnail,
) -> Result<Thumbnail, Box<dyn std::error::Error>> {
    let Some(id) = id else {
        return Ok(Thumbnail::Placeholder);
    };
    let (base, item) = {
        let guard = state.lock().map_err(|_| "state lock poisoned")?;
        if let Some(cached) = guard.thumbnails.get(&id) {
            return Ok(cached.clone());
        }
        let found = guard.engine.catalog().items().iter().find(|item| item.id == id);
        let Some(item) = found.cloned() else {
            return Ok(Thumbnail::Placeholder);
        };
        (guard.engine.config.thumbnail_base.clone(), item)
    };
    let thumbnail = probe(&base, &item);
    let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
    guard.thumbnails.insert(id, thumbnail.clone());
    Ok(thumbnail)
}

fn build_response(state: &mut AppState, err: Option<String>) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    ApiResponse {
        ok: err.is_none(),
        error: err.or_else(|| state.load_error.clone()),
        state: state.engine.snapshot(),
        outcome: state.last_outcome,
        events,
        source: state.source.clone(),
    }
}

fn apply_action(state: &mut AppState, action: &str) -> Option<String> {
    let engine = &mut state.engine;
    let events = &mut state.events;
    if let Some(guess) = Guess::parse(action) {
        return match engine.submit_guess(guess, events) {
            Ok(outcome) => {
                state.last_outcome = Some(outcome);
                None
            }
            Err(err) => Some(err.to_string()),
        };
    }
    match action {
        "next" => match engine.start_round(events) {
            Ok(()) => {
                state.last_outcome = None;
                None
            }
            Err(err) => Some(err.to_string()),
        },
        "restart" => match engine.restart_session(events) {
            Ok(SessionStart::Started) => {
                state.last_outcome = None;
                None
            }
            Ok(SessionStart::NotReady) => {
                Some("not ready: level list still loading".to_string())
            }
            Err(err) => Some(err.to_string()),
        },
        other => Some(format!("unknown action: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankguess_core::{Catalog, EngineError, Phase};

    fn loaded_state() -> AppState {
        let mut state = AppState::new(GameConfig::default());
        state.engine.rng = RngState::from_seed(5);
        let catalog = Catalog::new(vec![
            Item::new(1, "A", 1),
            Item::new(2, "B", 2),
            Item::new(3, "C", 3),
        ]);
        state
            .engine
            .start_session(catalog, &mut state.events)
            .expect("start");
        state
    }

    #[test]
    fn actions_before_loading_report_not_ready() {
        let mut state = AppState::new(GameConfig::default());
        let err = apply_action(&mut state, "restart").expect("error");
        assert!(err.starts_with("not ready"));
        let err = apply_action(&mut state, "higher").expect("error");
        assert_eq!(err, EngineError::NotReady.to_string());
        assert_eq!(build_response(&mut state, None).state.phase, Phase::Loading);
    }

    #[test]
    fn guess_then_next_flow() {
        let mut state = loaded_state();
        let round = state.engine.round.clone().expect("round");
        let action = if round.next.rank < round.current.rank {
            "higher"
        } else {
            "lower"
        };
        assert_eq!(apply_action(&mut state, action), None);
        let response = build_response(&mut state, None);
        assert!(response.ok);
        assert_eq!(response.state.score, 1);
        assert!(response.outcome.expect("outcome").correct);
        assert!(response
            .events
            .iter()
            .any(|event| matches!(event, Event::GuessRevealed { correct: true, .. })));

        assert_eq!(apply_action(&mut state, "next"), None);
        assert!(state.last_outcome.is_none());
        assert_eq!(state.engine.phase(), Phase::AwaitingGuess);
    }

    #[test]
    fn unknown_action_is_reported() {
        let mut state = loaded_state();
        assert_eq!(
            apply_action(&mut state, "sideways"),
            Some("unknown action: sideways".to_string())
        );
    }

    #[test]
    fn malformed_action_body_is_reported_as_an_error() {
        let mut state = loaded_state();
        let err = parse_action("{not json").expect_err("malformed");
        assert!(err.starts_with("malformed action request"));
        let response = build_response(&mut state, Some(err));
        assert!(!response.ok);
        assert!(response.error.is_some());
        assert_eq!(state.engine.session.score, 0);
        assert_eq!(parse_action(r#"{"action":"next"}"#), Ok("next".to_string()));
    }

    #[test]
    fn thumbnails_are_probed_once_per_item() {
        let state = Arc::new(Mutex::new(loaded_state()));
        let probes = std::cell::Cell::new(0);
        let probe = |base: &str, item: &Item| {
            probes.set(probes.get() + 1);
            Thumbnail::Remote(format!("{base}/{}.webp", item.id))
        };
        let first = thumbnail_for_id(&state, Some(ItemId(2)), probe).expect("first");
        let second = thumbnail_for_id(&state, Some(ItemId(2)), probe).expect("second");
        assert_eq!(first, second);
        assert_eq!(probes.get(), 1);
        let unknown = thumbnail_for_id(&state, Some(ItemId(99)), probe).expect("unknown");
        assert_eq!(unknown, Thumbnail::Placeholder);
        assert_eq!(probes.get(), 1);
    }

    #[test]
    fn thumb_path_parses_numeric_id() {
        assert_eq!(thumb_id("/thumb/73667628"), Some(ItemId(73667628)));
        assert_eq!(thumb_id("/thumb/abc"), None);
    }

    #[test]
    fn parses_server_flags() {
        let args: Vec<String> = ["--port", "9000", "--offline"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        let options = parse_options(&args);
        assert_eq!(options.port, Some(9000));
        assert!(options.offline);
        assert_eq!(options.catalog_path, None);
    }
}
