//! Terminal detection and output mode selection.

use std::io::IsTerminal;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One JSON document on stdout
    Json,
    /// Tab-separated lines, stable for scripts
    Plain,
    /// Tables, badges and colors
    Pretty,
}

impl OutputMode {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// What stdout and the environment allow.
#[derive(Debug, Clone, Copy, Default)]
struct Terminal {
    tty: bool,
    dumb: bool,
    no_color: bool,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            tty: std::io::stdout().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }

    /// `--json` wins. Pipes, `TERM=dumb` and `--format plain` get plain lines.
    fn output_mode(&self, json: bool, plain: bool) -> OutputMode {
        if json {
            OutputMode::Json
        } else if plain || self.dumb || !self.tty {
            OutputMode::Plain
        } else {
            OutputMode::Pretty
        }
    }

    fn color(&self, no_color_flag: bool) -> bool {
        self.tty && !self.dumb && !self.no_color && !no_color_flag
    }
}

/// Rendering settings shared by every command.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    /// False under `--ascii`
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Detect the terminal and apply the command's output flags.
    pub fn from_env(json: bool, plain: bool, no_color_flag: bool, ascii_flag: bool) -> Self {
        Self::for_terminal(Terminal::detect(), json, plain, no_color_flag, ascii_flag)
    }

    fn for_terminal(
        terminal: Terminal,
        json: bool,
        plain: bool,
        no_color_flag: bool,
        ascii_flag: bool,
    ) -> Self {
        Self {
            color: terminal.color(no_color_flag),
            unicode: !ascii_flag,
            width: terminal_width().unwrap_or(80),
            mode: terminal.output_mode(json, plain),
        }
    }
}

/// Terminal width from `COLUMNS`.
fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTY: Terminal = Terminal {
        tty: true,
        dumb: false,
        no_color: false,
    };

    #[test]
    fn test_json_flag_beats_plain_format() {
        assert_eq!(TTY.output_mode(true, true), OutputMode::Json);
        assert_eq!(Terminal::default().output_mode(true, false), OutputMode::Json);
    }

    #[test]
    fn test_tty_lists_are_pretty_unless_plain_requested() {
        assert_eq!(TTY.output_mode(false, false), OutputMode::Pretty);
        assert_eq!(TTY.output_mode(false, true), OutputMode::Plain);
    }

    #[test]
    fn test_pipes_and_dumb_terminals_get_plain_lines() {
        let dumb = Terminal { dumb: true, ..TTY };
        assert_eq!(dumb.output_mode(false, false), OutputMode::Plain);
        assert_eq!(Terminal::default().output_mode(false, false), OutputMode::Plain);
    }

    #[test]
    fn test_color_needs_a_tty_and_no_opt_out() {
        assert!(TTY.color(false));
        assert!(!TTY.color(true));
        assert!(!Terminal { no_color: true, ..TTY }.color(false));
        assert!(!Terminal { dumb: true, ..TTY }.color(false));
        assert!(!Terminal::default().color(false));
    }

    #[test]
    fn test_ascii_flag_disables_unicode() {
        let ctx = UiContext::for_terminal(TTY, false, false, false, true);
        assert!(!ctx.unicode);
        assert!(ctx.width > 0);
        assert_eq!(ctx.mode, OutputMode::Pretty);
    }
}
