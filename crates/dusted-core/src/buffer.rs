//! Text buffers — the host capability the core edits through.
//!
//! The core never owns text. Every entry point borrows something that
//! implements [`TextBuffer`] for the duration of one call and forgets it
//! afterwards, so a host can back it with whatever widget or document model
//! it already has.
//!
//! [`Buffer`] is the stock implementation: a [`ropey::Rope`] plus a cursor
//! and a single selection. The headless binary and the tests use it.
//!
//! # Coordinates
//!
//! Positions are 0-indexed `(line, col)` pairs with columns counted in chars.
//! A column equal to a line's full char count (including its line ending) is
//! the position just past that line, which is valid as an exclusive range end.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::error::EditError;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// TextBuffer capability
// ---------------------------------------------------------------------------

/// What the core needs from the host's text storage.
///
/// All calls are synchronous. Implementations must keep `line_text`
/// consistent with `get_range`: the token locator reads lines, and the
/// completion session writes ranges derived from them.
pub trait TextBuffer {
    /// Text in `range`, or `None` if either endpoint is out of bounds.
    fn get_range(&self, range: Range) -> Option<String>;

    /// Replace the text in `range` with `text` and return the range the new
    /// text occupies.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfBounds`] if either endpoint is not in the buffer.
    fn replace_range(&mut self, range: Range, text: &str) -> Result<Range, EditError>;

    fn cursor_position(&self) -> Position;

    fn set_cursor(&mut self, pos: Position);

    /// Number of lines. An empty buffer has one (empty) line.
    fn line_count(&self) -> usize;

    /// Content of `line` without its line ending.
    fn line_text(&self, line: usize) -> Option<String>;

    /// The active selection, if any. Never empty when `Some`.
    fn selection(&self) -> Option<Range>;

    fn set_selection(&mut self, selection: Option<Range>);

    /// The whole text with lines joined by `\n`.
    fn contents(&self) -> String {
        let mut out = String::new();
        for line in 0..self.line_count() {
            if line > 0 {
                out.push('\n');
            }
            if let Some(text) = self.line_text(line) {
                out.push_str(&text);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of a file, detected from its first line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the style of the first line break in `text`. `Lf` when there
    /// is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A rope-backed [`TextBuffer`] with one cursor and at most one selection.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
    cursor: Position,
    selection: Option<Range>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            modified: false,
            line_ending: LineEnding::detect(text),
            cursor: Position::ZERO,
            selection: None,
        }
    }

    /// Load a `.dust` (or any UTF-8) file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut buf = Self::from_text(&text);
        buf.path = Some(path.to_path_buf());
        Ok(buf)
    }

    // -- Text access --------------------------------------------------------

    /// Chars in `line` excluding its line ending, or `None` past the end.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && is_line_break(slice.char(len - 1)) {
            len -= 1;
            if len > 0 && slice.char(len) == '\n' && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        Some(len)
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a position to an absolute char index.
    ///
    /// A column equal to the line's total char count is accepted as the
    /// just-past-the-line position.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        if pos.col > self.rope.line(pos.line).len_chars() {
            return None;
        }
        Some(self.rope.line_to_char(pos.line) + pos.col)
    }

    /// Convert an absolute char index back to a position.
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        Some(Position::new(line, char_idx - self.rope.line_to_char(line)))
    }

    /// Clamp `pos` onto the nearest position a cursor may occupy.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.rope.len_lines().saturating_sub(1));
        let col = pos.col.min(self.line_content_len(line).unwrap_or(0));
        Position::new(line, col)
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the buffer back to its path.
    ///
    /// Every `\n`, `\r\n` or `\r` break is written in the style the file
    /// was loaded with, so pasted text cannot mix endings into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer has no path or the write fails.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"))?;
        fs::write(&path, self.file_text())?;
        self.modified = false;
        Ok(())
    }

    /// The contents with newline breaks in the buffer's own style.
    fn file_text(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut out = String::with_capacity(self.rope.len_bytes());
        for line in self.rope.lines() {
            let line = line.to_string();
            let content = line
                .strip_suffix("\r\n")
                .or_else(|| line.strip_suffix('\n'))
                .or_else(|| line.strip_suffix('\r'));
            match content {
                Some(content) => {
                    out.push_str(content);
                    out.push_str(ending);
                }
                None => out.push_str(&line),
            }
        }
        out
    }
}

/// Whether ropey ends a line at `c`.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

impl TextBuffer for Buffer {
    fn get_range(&self, range: Range) -> Option<String> {
        let start = self.pos_to_char_idx(range.start)?;
        let end = self.pos_to_char_idx(range.end)?;
        Some(self.rope.slice(start..end).to_string())
    }

    fn replace_range(&mut self, range: Range, text: &str) -> Result<Range, EditError> {
        let (Some(start), Some(end)) = (
            self.pos_to_char_idx(range.start),
            self.pos_to_char_idx(range.end),
        ) else {
            return Err(EditError::OutOfBounds(range));
        };
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.modified = true;

        let inserted_end = start + text.chars().count();
        // Both indices are inside the rope we just wrote.
        let end_pos = self
            .char_idx_to_pos(inserted_end)
            .unwrap_or(range.start);
        Ok(Range::new(range.start, end_pos))
    }

    fn cursor_position(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp_position(pos);
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        let len = self.line_content_len(line)?;
        Some(self.rope.line(line).slice(..len).to_string())
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Range>) {
        self.selection = selection.filter(|r| !r.is_empty());
    }

    fn contents(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.rope.len_lines())
            .field("chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("modified", &self.modified)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- LineEnding -----------------------------------------------------------

    #[test]
    fn detect_first_break_wins() {
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("no breaks"), LineEnding::Lf);
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    }

    // -- Reading --------------------------------------------------------------

    #[test]
    fn line_text_strips_line_endings() {
        let buf = Buffer::from_text("let count_\r\nfunc main_v\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_text(0).as_deref(), Some("let count_"));
        assert_eq!(buf.line_text(1).as_deref(), Some("func main_v"));
        assert_eq!(buf.line_text(2).as_deref(), Some(""));
        assert_eq!(buf.line_text(3), None);
    }

    #[test]
    fn lone_cr_and_unicode_breaks_end_lines() {
        let buf = Buffer::from_text("// a\rlet x\u{c}y\u{2028}z");
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.line_text(0).as_deref(), Some("// a"));
        assert_eq!(buf.line_text(1).as_deref(), Some("let x"));
        assert_eq!(buf.line_text(2).as_deref(), Some("y"));
        assert_eq!(buf.line_text(3).as_deref(), Some("z"));
    }

    #[test]
    fn get_range_spans_lines() {
        let buf = Buffer::from_text("abc\ndef");
        assert_eq!(buf.get_range(Range::new(pos(0, 1), pos(1, 2))).as_deref(), Some("bc\nde"));
        assert_eq!(buf.get_range(Range::new(pos(0, 0), pos(9, 0))), None);
    }

    #[test]
    fn char_index_conversion() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.pos_to_char_idx(pos(1, 0)), Some(3));
        assert_eq!(buf.char_idx_to_pos(4), Some(pos(1, 1)));
        assert_eq!(buf.char_idx_to_pos(99), None);
    }

    #[test]
    fn default_contents_joins_lines() {
        struct Lines(Vec<&'static str>);
        impl TextBuffer for Lines {
            fn get_range(&self, _: Range) -> Option<String> {
                None
            }
            fn replace_range(&mut self, range: Range, _: &str) -> Result<Range, EditError> {
                Err(EditError::OutOfBounds(range))
            }
            fn cursor_position(&self) -> Position {
                Position::ZERO
            }
            fn set_cursor(&mut self, _: Position) {}
            fn line_count(&self) -> usize {
                self.0.len()
            }
            fn line_text(&self, line: usize) -> Option<String> {
                self.0.get(line).map(|s| (*s).to_string())
            }
            fn selection(&self) -> Option<Range> {
                None
            }
            fn set_selection(&mut self, _: Option<Range>) {}
        }
        assert_eq!(Lines(vec!["a", "b", ""]).contents(), "a\nb\n");
    }

    // -- Editing --------------------------------------------------------------

    #[test]
    fn replace_range_returns_inserted_span() {
        let mut buf = Buffer::from_text("let count_\n");
        let inserted = buf
            .replace_range(Range::new(pos(0, 4), pos(0, 10)), "count_i")
            .unwrap();
        assert_eq!(buf.contents(), "let count_i\n");
        assert_eq!(inserted, Range::new(pos(0, 4), pos(0, 11)));
        assert!(buf.is_modified());
    }

    #[test]
    fn replace_range_with_newlines_ends_on_later_line() {
        let mut buf = Buffer::from_text("xy");
        let inserted = buf.replace_range(Range::point(pos(0, 1)), "a\nbc").unwrap();
        assert_eq!(buf.contents(), "xa\nbcy");
        assert_eq!(inserted.end, pos(1, 2));
    }

    #[test]
    fn replace_range_out_of_bounds_is_an_error() {
        let mut buf = Buffer::from_text("abc");
        let bad = Range::new(pos(0, 0), pos(3, 0));
        assert_eq!(buf.replace_range(bad, "x"), Err(EditError::OutOfBounds(bad)));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn set_cursor_clamps() {
        let mut buf = Buffer::from_text("hello\nhi");
        buf.set_cursor(pos(7, 7));
        assert_eq!(buf.cursor_position(), pos(1, 2));
    }

    #[test]
    fn empty_selection_is_dropped() {
        let mut buf = Buffer::from_text("hello");
        buf.set_selection(Some(Range::point(pos(0, 2))));
        assert_eq!(buf.selection(), None);
        buf.set_selection(Some(Range::new(pos(0, 1), pos(0, 3))));
        assert_eq!(buf.selection(), Some(Range::new(pos(0, 1), pos(0, 3))));
    }

    // -- File I/O -------------------------------------------------------------

    #[test]
    fn save_without_path_fails() {
        let mut buf = Buffer::from_text("x");
        assert_eq!(buf.save().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn file_roundtrip() {
        let path = std::env::temp_dir().join(format!("dusted-buffer-{}.dust", std::process::id()));
        fs::write(&path, "let count_\n").unwrap();
        let mut buf = Buffer::from_file(&path).unwrap();
        assert_eq!(buf.path(), Some(path.as_path()));
        buf.replace_range(Range::point(Position::new(0, 10)), "i").unwrap();
        buf.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "let count_i\n");
        assert!(!buf.is_modified());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_keeps_the_file_line_ending() {
        let path = std::env::temp_dir().join(format!("dusted-crlf-{}.dust", std::process::id()));
        fs::write(&path, "let a_i\r\nlet b_f\r\n").unwrap();
        let mut buf = Buffer::from_file(&path).unwrap();
        buf.replace_range(Range::point(pos(1, 0)), "// pasted\nx\ry\n").unwrap();
        buf.save().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "let a_i\r\n// pasted\r\nx\r\ny\r\nlet b_f\r\n"
        );
        let _ = fs::remove_file(&path);
    }
}
