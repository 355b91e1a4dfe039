mod actions;
mod app;
mod input;
mod persistence;
mod view;

pub use app::{load_config, open_store, App, LaunchOptions};
pub use persistence::{default_score_path, FileStore};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

pub fn run(options: LaunchOptions) -> Result<()> {
    ensure_interactive_terminal()?;
    // the level list is fetched before the screen switches so a slow network shows nothing odd
    let mut app = App::bootstrap(&options)?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--catalog" => {
                if let Some(value) = args.get(idx + 1) {
                    options.catalog_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets_dir = Some(PathBuf::from(value));
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

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(120);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "rankguess-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_launch_flags() {
        let args: Vec<String> = ["--seed", "7", "--offline", "--catalog", "levels.json"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        let options = parse_options(&args);
        assert_eq!(options.seed, Some(7));
        assert!(options.offline);
        assert_eq!(options.catalog_path, Some(PathBuf::from("levels.json")));
        assert_eq!(options.assets_dir, None);
    }

    #[test]
    fn bad_seed_is_ignored() {
        let args = vec!["--seed".to_string(), "abc".to_string()];
        assert_eq!(parse_options(&args).seed, None);
    }
}
