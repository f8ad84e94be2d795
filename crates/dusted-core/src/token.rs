//! Token location — the word under (or touching) a position.
//!
//! A token is a maximal run of word characters: letters, digits, and `_`.
//! The same policy serves the completion trigger and the find-next gesture:
//! the run may lie on either side of the position, so a cursor sitting just
//! after `count_` and a pointer resting on its `o` both resolve to `count_`.
//!
//! Tokens never cross line boundaries.

use crate::buffer::TextBuffer;
use crate::position::{Position, Range};

/// The completion marker that ends a trigger identifier.
pub const MARKER: char = '_';

/// Word characters for token boundaries.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// A located token and the exact range it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub range: Range,
}

impl Token {
    /// The zero-length token at `pos`.
    #[must_use]
    pub const fn empty(pos: Position) -> Self {
        Self {
            text: String::new(),
            range: Range::point(pos),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The identifier before the trailing marker, if this token is a
    /// completion trigger. `"_"` alone yields `""`.
    #[must_use]
    pub fn completion_base(&self) -> Option<&str> {
        self.text.strip_suffix(MARKER)
    }
}

/// Resolve the token touching `pos`.
///
/// Scans backward while the preceding char is a word char, then forward
/// while the following char is. Returns [`Token::empty`] when neither
/// neighbor is a word char or `pos` is outside the buffer. A column past the
/// end of its line is treated as the end of the line.
#[must_use]
pub fn locate<B: TextBuffer + ?Sized>(buf: &B, pos: Position) -> Token {
    let Some(line) = buf.line_text(pos.line) else {
        return Token::empty(pos);
    };
    let chars: Vec<char> = line.chars().collect();
    let col = pos.col.min(chars.len());

    let mut start = col;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = col;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    if start == end {
        return Token::empty(Position::new(pos.line, col));
    }
    Token {
        text: chars[start..end].iter().collect(),
        range: Range::new(Position::new(pos.line, start), Position::new(pos.line, end)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn at(text: &str, line: usize, col: usize) -> Token {
        locate(&Buffer::from_text(text), Position::new(line, col))
    }

    // -- Classification -------------------------------------------------------

    #[test]
    fn word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('('));
        assert!(!is_word_char('-'));
    }

    // -- Boundaries -----------------------------------------------------------

    #[test]
    fn cursor_after_token_end() {
        let t = at("let count_", 0, 10);
        assert_eq!(t.text, "count_");
        assert_eq!(t.range, Range::new(Position::new(0, 4), Position::new(0, 10)));
    }

    #[test]
    fn cursor_inside_token() {
        let t = at("let count_i = 3", 0, 6);
        assert_eq!(t.text, "count_i");
        assert_eq!(t.range.start, Position::new(0, 4));
        assert_eq!(t.range.end, Position::new(0, 11));
    }

    #[test]
    fn cursor_at_token_start() {
        let t = at("let count_", 0, 4);
        assert_eq!(t.text, "count_");
    }

    #[test]
    fn cursor_between_two_tokens_joins_nothing() {
        // `(` separates; the cursor touches `f` on the left only.
        let t = at("f(x)", 0, 1);
        assert_eq!(t.text, "f");
        let t = at("f(x)", 0, 2);
        assert_eq!(t.text, "x");
    }

    #[test]
    fn whitespace_on_both_sides_gives_empty_token() {
        let t = at("a   b", 0, 2);
        assert!(t.is_empty());
        assert_eq!(t.range, Range::point(Position::new(0, 2)));
    }

    #[test]
    fn lone_marker_is_a_token() {
        let t = at("let _", 0, 5);
        assert_eq!(t.text, "_");
        assert_eq!(t.completion_base(), Some(""));
    }

    #[test]
    fn token_stays_on_its_line() {
        let t = at("abc\ndef", 1, 0);
        assert_eq!(t.text, "def");
        assert_eq!(t.range.start, Position::new(1, 0));
    }

    #[test]
    fn column_past_line_end_clamps() {
        let t = at("name_\nx", 0, 40);
        assert_eq!(t.text, "name_");
        assert_eq!(t.range.end, Position::new(0, 5));
    }

    #[test]
    fn line_out_of_bounds_is_empty() {
        assert!(at("abc", 5, 0).is_empty());
    }

    #[test]
    fn unicode_letters_are_word_chars() {
        let t = at("let café_", 0, 9);
        assert_eq!(t.text, "café_");
        assert_eq!(t.range.start, Position::new(0, 4));
    }

    // -- Trigger shape --------------------------------------------------------

    #[test]
    fn completion_base_requires_trailing_marker() {
        assert_eq!(at("count_", 0, 6).completion_base(), Some("count"));
        assert_eq!(at("Player_", 0, 7).completion_base(), Some("Player"));
        assert_eq!(at("count_i", 0, 7).completion_base(), None);
        assert_eq!(Token::empty(Position::ZERO).completion_base(), None);
    }
}
