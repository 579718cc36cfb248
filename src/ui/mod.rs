pub mod panel;
pub mod repl;

pub use panel::{render_history, render_notice, render_panel};
pub use repl::{Command, copy_display, copy_history, press_line, run as run_repl};
