//! Syntax highlighting — debounced regex rescans over the whole buffer.
//!
//! Dust's surface syntax is small enough that four regexes cover what an
//! editor wants to color: line comments, string literals, keywords, and the
//! type suffix after an identifier's underscore.
//!
//! # Architecture
//!
//! 1. On every buffer edit, call [`Highlighter::schedule`]. It (re)arms a
//!    single [`Debounce`] deadline; a newer edit replaces the older one, so
//!    at most one rescan is ever pending.
//! 2. Each host tick calls [`Highlighter::poll`] with the current time and
//!    the buffer text *as it is now*. Once the deadline has passed, the
//!    highlighter rescans that text and returns the new span list.
//! 3. A rescan throws away every old span and rebuilds from scratch.
//!
//! # Rule priority
//!
//! Rules run in a fixed order (comment, string, keyword, suffix). A match
//! that overlaps any char claimed by an earlier rule is dropped whole, so the
//! suffix inside `// count_i` stays part of the comment and no char ever
//! carries two tags.

use std::time::{Duration, Instant};

use regex::Regex;
use ropey::Rope;
use tracing::trace;

use crate::position::{Position, Range};

/// Delay between the last edit and the rescan it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Regex class body for every char ropey treats as a line break.
const LINE_BREAKS: &str = r"\n\x0B\x0C\r\x{85}\x{2028}\x{2029}";

/// The Dust lexer's reserved words.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "do", "for", "return", "break", "continue", "func", "let", "struct",
    "sizeof", "switch", "case", "default", "typedef", "cast", "null", "enum", "static", "extern",
    "union",
];

// ---------------------------------------------------------------------------
// Spans
// ---------------------------------------------------------------------------

/// What a highlighted span is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Comment,
    String,
    Keyword,
    Suffix,
}

impl Tag {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Keyword => "keyword",
            Self::Suffix => "suffix",
        }
    }
}

/// A tagged, single-line buffer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub tag: Tag,
    pub range: Range,
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// A single cancelable delayed task, driven by explicit clock readings.
///
/// No threads or timers: the owner asks [`fire`](Self::fire) whether the
/// deadline has passed. Re-arming replaces the previous deadline.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the task to fire `delay` after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending task is due, if any.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending task if it is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

/// Compiled rules plus the debounced rescan state and the current spans.
#[derive(Debug)]
pub struct Highlighter {
    rules: Vec<(Tag, Regex)>,
    debounce: Debounce,
    spans: Vec<HighlightSpan>,
}

impl Highlighter {
    /// Build a highlighter for `keywords` with the given debounce delay.
    ///
    /// # Panics
    ///
    /// Never in practice: the rule patterns are fixed and keywords are
    /// escaped before being joined into an alternation.
    #[must_use]
    pub fn new<S: AsRef<str>>(keywords: &[S], delay: Duration) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| k.as_ref())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let mut rules = vec![
            (Tag::Comment, Regex::new(&format!("//[^{LINE_BREAKS}]*")).expect("comment rule")),
            (Tag::String, Regex::new(&format!(r#""[^"{LINE_BREAKS}]*?""#)).expect("string rule")),
        ];
        if !alternation.is_empty() {
            let pattern = format!(r"\b(?:{alternation})\b");
            rules.push((Tag::Keyword, Regex::new(&pattern).expect("keyword rule")));
        }
        rules.push((Tag::Suffix, Regex::new(r"_[A-Za-z0-9]+").expect("suffix rule")));
        Self {
            rules,
            debounce: Debounce::new(delay),
            spans: Vec::new(),
        }
    }

    /// The spans from the last completed rescan.
    #[inline]
    #[must_use]
    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    #[inline]
    #[must_use]
    pub const fn debounce(&self) -> &Debounce {
        &self.debounce
    }

    /// Note an edit at `now`, replacing any pending rescan.
    pub fn schedule(&mut self, now: Instant) {
        trace!(replaced = self.debounce.is_pending(), "highlight rescan scheduled");
        self.debounce.arm(now);
    }

    /// Drop a pending rescan without running it.
    pub const fn cancel(&mut self) {
        self.debounce.cancel();
    }

    /// Run the pending rescan over `text` if it is due at `now`.
    ///
    /// Returns the new spans when a rescan ran, `None` otherwise.
    pub fn poll(&mut self, now: Instant, text: &str) -> Option<&[HighlightSpan]> {
        if !self.debounce.fire(now) {
            return None;
        }
        self.rescan(text);
        Some(&self.spans)
    }

    /// Replace all spans with a fresh scan of `text`.
    pub fn rescan(&mut self, text: &str) {
        self.spans = self.scan(text);
        trace!(spans = self.spans.len(), bytes = text.len(), "highlight rescan");
    }

    /// Tag `text` without touching the highlighter's state.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<HighlightSpan> {
        let mut claimed = vec![false; text.len()];
        let mut tagged: Vec<(Tag, usize, usize)> = Vec::new();

        for (tag, regex) in &self.rules {
            for m in regex.find_iter(text) {
                if claimed[m.range()].iter().any(|&c| c) {
                    continue;
                }
                claimed[m.range()].fill(true);
                tagged.push((*tag, m.start(), m.end()));
            }
        }

        tagged.sort_by_key(|&(_, start, _)| start);
        let lines = Rope::from_str(text);
        tagged
            .into_iter()
            .map(|(tag, start, end)| HighlightSpan {
                tag,
                range: Range::new(position(&lines, start), position(&lines, end)),
            })
            .collect()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(KEYWORDS, DEFAULT_DEBOUNCE)
    }
}

// ---------------------------------------------------------------------------
// Byte offset → position
// ---------------------------------------------------------------------------

/// The char position of byte offset `byte` (a char boundary), with lines
/// split the same way [`Buffer`](crate::buffer::Buffer) splits them.
fn position(lines: &Rope, byte: usize) -> Position {
    let line = lines.byte_to_line(byte);
    Position::new(line, lines.byte_to_char(byte) - lines.line_to_char(line))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
