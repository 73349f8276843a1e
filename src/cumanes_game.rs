// src/cumanes_game.rs
// Terminal front end for the dual attention game.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use cumanes::config::{DEFAULT_CONFIG_PATH, GameConfig};
use cumanes::defs::Number;
use cumanes::game::{GameSession, SelectionOutcome};
use cumanes::logging::{init_log_file, log_error, log_info, log_warning};
use cumanes::strings::Language;
use cumanes::terminal::{self, Command, TerminalGuard};

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "cumanes-game")]
#[command(about = "Click the numbers in order, alternating red and blue")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed for reproducible boards
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cards per color on the first level
    #[arg(short, long)]
    pairs: Option<Number>,

    /// Interface language (spanish, english)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Wait for 'n' instead of dealing the next level automatically
    #[arg(long)]
    manual_advance: bool,

    /// Print the completed levels as JSON on exit
    #[arg(long)]
    summary_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let mut config = GameConfig::load_or_default(&args.config);
    if let Some(pairs) = args.pairs {
        config.initial_pairs = pairs.max(1);
    }
    if let Some(lang) = args.lang {
        config.language = lang;
    }
    if args.manual_advance {
        config.auto_advance = false;
    }

    if let Some(path) = &config.log_file {
        if let Err(e) = init_log_file(path) {
            log_warning(&format!("Could not open log file {path}: {e}. Logging to stderr."));
        }
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log_info(&format!("Starting session with seed {seed}"));

    match run(config, seed).await {
        Ok(session) => {
            if args.summary_json {
                match serde_json::to_string_pretty(session.history()) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log_error(&format!("Failed to serialize session summary: {e}")),
                }
            }
            log_info(&format!("Session ended after {} completed levels", session.history().len()));
        }
        Err(e) => {
            log_error(&format!("Terminal error: {e}"));
            eprintln!("cumanes-game: {e}");
        }
    }
}

async fn run(config: GameConfig, seed: u64) -> io::Result<GameSession> {
    let strings = config.language.strings();
    let columns = config.columns;
    let mut session = GameSession::seeded(config, seed);

    let _guard = TerminalGuard::enter()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    terminal::spawn_key_reader(tx);

    let mut stdout = io::stdout();
    let mut cursor = 0usize;
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        let view = session.view();
        cursor = cursor.min(view.cards.len().saturating_sub(1));
        terminal::render(&mut stdout, &view, cursor, columns, strings)?;

        let deadline = session.next_deadline();

        tokio::select! {
            command = rx.recv() => {
                match command {
                    None | Some(Command::Quit) => break,
                    Some(Command::Move(direction)) => {
                        cursor = terminal::move_cursor(cursor, direction, columns, view.cards.len());
                    }
                    Some(Command::Select) => {
                        if let Some(card) = view.cards.get(cursor) {
                            if let SelectionOutcome::Ignored = session.select_card(card.id) {
                                log_warning(&format!("Selection of card {} ignored", card.id));
                            }
                        }
                    }
                    Some(Command::PlayAgain) => {
                        if session.play_again() {
                            cursor = 0;
                        }
                    }
                    Some(Command::ToggleInstructions) => {
                        session.toggle_instructions();
                    }
                    Some(Command::Redraw) => {}
                }
            }

            _ = async {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                let level = session.level();
                if session.on_deadline() && session.level() != level {
                    cursor = 0;
                }
            }

            _ = redraw.tick() => {}
        }
    }

    session.shutdown();
    Ok(session)
}
