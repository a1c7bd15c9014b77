//! Terminal escape sequence removal.
//!
//! `passenger-status` and `passenger-memory-stats` colour their headers and
//! totals even when stdout is not a terminal on some versions. The escapes sit
//! between labels and numbers, so they are removed before any pattern runs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences: `ESC [` parameters, then a single final letter (`m`, `K`, `H`, ...).
static CSI_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;?]*[A-Za-z]").expect("CSI sequence pattern is valid")
});

/// Removes ANSI/CSI escape sequences from command output.
///
/// Returns the input unchanged (borrowed) when it contains no escapes.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1B') {
        return Cow::Borrowed(text);
    }
    CSI_SEQUENCE.replace_all(text, "")
}
