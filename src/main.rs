use anyhow::{Context, Result};
use clap::Parser;
use pocketcalc::calculator::{Engine, copy_and_wait};
use pocketcalc::config::Config;
use pocketcalc::session::Session;
use pocketcalc::ui;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keypad calculator for the terminal.
///
/// With KEYS, presses them and prints the display once. Without, reads key
/// lines from stdin (`:help` lists keys and commands).
#[derive(Parser, Debug)]
#[command(name = "pocketcalc", version, about)]
struct Cli {
    /// Keys to press, e.g. `12 + 3 =` or `7 ms c mr`
    keys: Vec<String>,

    /// Config file (defaults to $XDG_CONFIG_HOME/pocketcalc/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a cleared calculator instead of the saved session
    #[arg(long)]
    fresh: bool,

    /// Don't write the session back on exit
    #[arg(long)]
    no_save: bool,

    /// Copy the final display to the clipboard
    #[arg(long)]
    copy: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref());

    let session = config.session.resolve_path().map(Session::new);
    let mut engine = match &session {
        Some(session) if config.session.restore && !cli.fresh => session.resume(),
        _ => Engine::new(),
    };

    if cli.keys.is_empty() {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        ui::run_repl(&mut engine, &config, stdin.lock(), &mut stdout)
            .context("Terminal I/O failed")?;
    } else {
        let panel = ui::press_line(&mut engine, &cli.keys.join(" "))?;
        println!("{panel}");
    }

    if let Some(session) = session
        && config.session.save
        && !cli.no_save
    {
        session
            .save(&engine)
            .with_context(|| format!("Failed to save session to {}", session.path().display()))?;
    }

    // Last, since on Linux this blocks until the clipboard is taken over.
    if cli.copy {
        if config.clipboard.enabled {
            let text = engine.display_text();
            println!("Copied {text}; holding the clipboard until it is replaced");
            copy_and_wait(text).context("Failed to copy to clipboard")?;
        } else {
            println!("Clipboard is disabled.");
        }
    }

    Ok(())
}
