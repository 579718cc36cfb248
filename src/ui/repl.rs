//! Line-oriented front end: one line of keys in, the panel out.

use super::panel::{render_history, render_notice, render_panel};
use crate::calculator::{ClipboardHandle, Engine, parse_keys};
use crate::config::Config;
use crate::items::{newest_first, nth_newest};
use std::io::{self, BufRead, Write};
use tracing::debug;

const HELP: &str = "\
Keys: 0-9 .  + - * x × / ÷  =  sqr  1/x  neg ±  < bs  ce  c ac  ms mc mr m+ m-
Commands: :history  :copy [n]  :help  :quit";

/// A `:`-prefixed REPL command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    History,
    /// Copy the display, or the `n`-th entry of the history listing.
    Copy(Option<usize>),
    Help,
    Quit,
}

impl Command {
    pub fn parse(word: &str) -> Option<Self> {
        let mut parts = word.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return None;
        }

        match (name.as_str(), arg) {
            ("history" | "h", None) => Some(Self::History),
            ("copy" | "y", None) => Some(Self::Copy(None)),
            ("copy" | "y", Some(n)) => n.parse().ok().map(|n| Self::Copy(Some(n))),
            ("help" | "?", None) => Some(Self::Help),
            ("quit" | "q" | "exit", None) => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Press every key in `line` and return what should be shown: any
/// notices first, then the panel. Unknown keys abort the line before any
/// key is pressed.
pub fn press_line(engine: &mut Engine, line: &str) -> crate::Result<String> {
    let actions = parse_keys(line)?;
    debug!(count = actions.len(), "Pressing keys");
    for action in actions {
        engine.dispatch(action);
    }

    let mut lines: Vec<String> = engine.take_notices().into_iter().map(render_notice).collect();
    lines.push(render_panel(engine));
    Ok(lines.join("\n"))
}

/// Copy the current display text, honoring the clipboard setting.
pub fn copy_display(engine: &Engine, config: &Config, clipboard: &mut ClipboardHandle) -> String {
    copy_text(engine.display_text(), config, clipboard)
}

/// Copy the `n`-th entry of the history listing (1 is the newest). Takes
/// the result, or the expression when the record has none.
pub fn copy_history(
    engine: &Engine,
    config: &Config,
    clipboard: &mut ClipboardHandle,
    n: usize,
) -> String {
    match nth_newest(engine.history(), n) {
        Some(item) => copy_text(item.text_for_clipboard(), config, clipboard),
        None => format!("! no history entry {n}"),
    }
}

fn copy_text(text: &str, config: &Config, clipboard: &mut ClipboardHandle) -> String {
    if !config.clipboard.enabled {
        return "Clipboard is disabled.".to_string();
    }

    match clipboard.copy(text) {
        Ok(()) => format!("Copied {text}"),
        Err(e) => format!("! {e}"),
    }
}

/// Run the REPL until `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    engine: &mut Engine,
    config: &Config,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    // Owns the clipboard contents until the session ends.
    let mut clipboard = ClipboardHandle::new();
    writeln!(out, "{}", render_panel(engine))?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(word) = line.strip_prefix(':') {
            let reply = match Command::parse(word) {
                Some(Command::Quit) => break,
                Some(Command::History) => {
                    render_history(&newest_first(engine.history(), config.history.display_limit))
                }
                Some(Command::Copy(None)) => copy_display(engine, config, &mut clipboard),
                Some(Command::Copy(Some(n))) => copy_history(engine, config, &mut clipboard, n),
                Some(Command::Help) => HELP.to_string(),
                None => format!("! unknown command :{word}"),
            };
            writeln!(out, "{reply}")?;
            continue;
        }

        match press_line(engine, line) {
            Ok(panel) => writeln!(out, "{panel}")?,
            Err(e) => writeln!(out, "! {e}")?,
        }
    }

    out.flush()
}
