// ABOUTME: Terminal size probing and rendering backend selection
// ABOUTME: Maps the TERM signal to a graphics protocol and queries the tty row count

use crossterm::terminal::size as terminal_size;

/// The terminal graphics families this tool can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// iTerm2 OSC 1337 file protocol. The default; broadest compatibility,
    /// including passthrough inside terminal multiplexers.
    Iterm2,
    /// Kitty chunked graphics protocol.
    Kitty,
}

/// Select a backend from the terminal-identification signal.
///
/// Total over all inputs: anything that is not a kitty terminal, including an
/// empty signal, gets the iTerm2 backend.
pub fn select_backend(term: &str) -> Backend {
    if term.ends_with("-kitty") {
        Backend::Kitty
    } else {
        Backend::Iterm2
    }
}

/// Probe the controlling terminal for its (rows, columns) count.
///
/// `None` when no terminal is attached or the query fails; callers treat
/// that as a normal outcome, not a failure.
pub fn tty_size() -> Option<(u16, u16)> {
    terminal_size().ok().map(|(columns, rows)| (rows, columns))
}
