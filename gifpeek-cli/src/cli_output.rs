// ABOUTME: User-facing stderr messages for the gifpeek binary
// ABOUTME: Formats fatal errors with their cause chain and an optional hint

use gifpeek_sdk::GifError;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};

pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Color follows whether stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_color: io::stderr().is_terminal(),
        }
    }

    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn error(&self, message: &str) {
        eprint!("{}", self.format_error(message));
    }

    pub fn warning(&self, message: &str) {
        let label = if self.use_color {
            "warning:".yellow().bold().to_string()
        } else {
            "warning:".to_string()
        };
        let _ = writeln!(io::stderr(), "{} {}", label, message);
    }

    /// Report `err` with its causes, plus a hint when an SDK error offers one.
    pub fn report(&self, err: &anyhow::Error) {
        let mut message = err.to_string();
        for cause in err.chain().skip(1) {
            message.push_str(&format!("\n  caused by: {}", cause));
        }
        self.error(&message);

        let hint = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<GifError>())
            .and_then(GifError::help_text);
        if let Some(hint) = hint {
            eprintln!("  hint: {}", hint);
        }
    }

    fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}\n", "error:".red().bold(), message)
        } else {
            format!("error: {}\n", message)
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
