//! Search — case-insensitive literal matching with wraparound.
//!
//! Used by the find-next gesture: the clicked token is searched forward from
//! just past the pointer, and if nothing turns up before the end of the
//! buffer the search restarts at the top. Matching is char-by-char after
//! simple lowercase folding, so match columns line up with buffer columns.
//!
//! Needles never contain line breaks (they come from the token locator), so
//! every search works one line at a time.

use crate::buffer::TextBuffer;
use crate::position::{Position, Range};

/// A search hit: start position and length in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: Position,
    pub len: usize,
}

impl Match {
    /// The buffer range the match covers.
    #[inline]
    #[must_use]
    pub const fn range(self) -> Range {
        Range::on_line(self.start, self.len)
    }
}

/// How a search compares chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CaseMode {
    #[default]
    Insensitive,
    Sensitive,
}

/// Find `needle` at or after `anchor`.
///
/// With `wrap`, a miss between `anchor` and the end of the buffer retries
/// from the top for matches starting before `anchor`. Returns `None` for an
/// empty needle. Two calls with the same arguments on an unchanged buffer
/// return the same match.
#[must_use]
pub fn search<B: TextBuffer + ?Sized>(
    buf: &B,
    needle: &str,
    anchor: Position,
    wrap: bool,
    case: CaseMode,
) -> Option<Match> {
    let needle = fold_all(needle, case);
    if needle.is_empty() {
        return None;
    }
    let line_count = buf.line_count();

    for line in anchor.line..line_count {
        let from = if line == anchor.line { anchor.col } else { 0 };
        if let Some(m) = search_line(buf, &needle, line, from, usize::MAX, case) {
            return Some(m);
        }
    }

    if !wrap {
        return None;
    }

    // Wrapped pass: everything before the anchor.
    for line in 0..=anchor.line.min(line_count.saturating_sub(1)) {
        let before = if line == anchor.line { anchor.col } else { usize::MAX };
        if let Some(m) = search_line(buf, &needle, line, 0, before, case) {
            return Some(m);
        }
    }
    None
}

/// Every non-overlapping match of `needle`, in document order.
#[must_use]
pub fn find_all<B: TextBuffer + ?Sized>(buf: &B, needle: &str, case: CaseMode) -> Vec<Match> {
    let needle = fold_all(needle, case);
    let mut matches = Vec::new();
    if needle.is_empty() {
        return matches;
    }
    for line in 0..buf.line_count() {
        let mut from = 0;
        while let Some(m) = search_line(buf, &needle, line, from, usize::MAX, case) {
            from = m.start.col + m.len;
            matches.push(m);
        }
    }
    matches
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// First match in `line` starting in `[from, before)`.
fn search_line<B: TextBuffer + ?Sized>(
    buf: &B,
    needle: &[char],
    line: usize,
    from: usize,
    before: usize,
    case: CaseMode,
) -> Option<Match> {
    let haystack = fold_all(&buf.line_text(line)?, case);
    if needle.len() > haystack.len() {
        return None;
    }
    let last_start = (haystack.len() - needle.len()).min(before.saturating_sub(1));
    if before == 0 || from > last_start {
        return None;
    }
    (from..=last_start)
        .find(|&col| haystack[col..col + needle.len()] == *needle)
        .map(|col| Match {
            start: Position::new(line, col),
            len: needle.len(),
        })
}

fn fold_all(s: &str, case: CaseMode) -> Vec<char> {
    s.chars().map(|ch| fold(ch, case)).collect()
}

/// Lowercase `ch` without changing the char count. Chars whose lowercase
/// form is several chars keep only the first.
fn fold(ch: char, case: CaseMode) -> char {
    match case {
        CaseMode::Sensitive => ch,
        CaseMode::Insensitive => ch.to_lowercase().next().unwrap_or(ch),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
