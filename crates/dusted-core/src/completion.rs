//! Completion sessions — the popup behind `identifier_`.
//!
//! A session is a plain value: it remembers the trigger token, the
//! categories resolved for it, and which category and item are highlighted.
//! Opening, navigating and committing are methods on it; none of them
//! reach a display. The engine turns the session's state into surface calls.
//!
//! ```text
//!   Closed ──open(identifier_)──► Open ──commit / cancel / stale edit──► Closed
//! ```

use crate::buffer::TextBuffer;
use crate::catalog::{Category, SuffixCatalog, SuffixEntry};
use crate::error::EditError;
use crate::position::Range;
use crate::token::Token;

/// Which way a navigation key moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
    First,
    Last,
}

/// What a navigation key moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Category,
    Item,
}

/// An open completion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSession {
    /// The trigger token, marker included.
    base_identifier: String,
    trigger_range: Range,
    categories: Vec<Category>,
    active_category: usize,
    active_item: usize,
}

impl CompletionSession {
    /// Open a session on `token`.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidTrigger`] if the token does not end in the marker
    /// or the catalog offers nothing for it.
    pub fn open(token: &Token, catalog: &SuffixCatalog) -> Result<Self, EditError> {
        let base = token.completion_base().ok_or(EditError::InvalidTrigger)?;
        let categories = catalog.resolve(base);
        if categories.is_empty() {
            return Err(EditError::InvalidTrigger);
        }
        Ok(Self {
            base_identifier: token.text.clone(),
            trigger_range: token.range,
            categories,
            active_category: 0,
            active_item: 0,
        })
    }

    #[inline]
    #[must_use]
    pub fn base_identifier(&self) -> &str {
        &self.base_identifier
    }

    #[inline]
    #[must_use]
    pub const fn trigger_range(&self) -> Range {
        self.trigger_range
    }

    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[inline]
    #[must_use]
    pub const fn active_category(&self) -> usize {
        self.active_category
    }

    #[inline]
    #[must_use]
    pub const fn active_item(&self) -> usize {
        self.active_item
    }

    /// Move along `axis`. Categories wrap and reset the item; items clamp.
    pub fn navigate(&mut self, direction: Direction, axis: Axis) {
        match axis {
            Axis::Category => self.move_category(direction),
            Axis::Item => self.move_item(direction),
        }
    }

    /// Jump straight to `(category, item)`, as a click in the popup does.
    /// Out-of-range indices clamp.
    pub fn select(&mut self, category: usize, item: usize) {
        self.active_category = category.min(self.categories.len() - 1);
        self.active_item = item.min(self.category().entries.len().saturating_sub(1));
    }

    fn move_category(&mut self, direction: Direction) {
        let len = self.categories.len();
        self.active_category = match direction {
            Direction::Next => (self.active_category + 1) % len,
            Direction::Previous => (self.active_category + len - 1) % len,
            Direction::First => 0,
            Direction::Last => len - 1,
        };
        self.active_item = 0;
    }

    fn move_item(&mut self, direction: Direction) {
        let last = self.category().entries.len().saturating_sub(1);
        self.active_item = match direction {
            Direction::Next => (self.active_item + 1).min(last),
            Direction::Previous => self.active_item.saturating_sub(1),
            Direction::First => 0,
            Direction::Last => last,
        };
    }

    /// The highlighted category.
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.categories[self.active_category]
    }

    /// The highlighted entry.
    #[must_use]
    pub fn selected(&self) -> &SuffixEntry {
        &self.category().entries[self.active_item]
    }

    /// The text a commit would write over the trigger.
    #[must_use]
    pub fn replacement(&self) -> String {
        self.category()
            .replacement(&self.base_identifier, self.selected())
    }

    /// Popup labels for the highlighted category.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let category = self.category();
        category.entries.iter().map(|e| category.label(e)).collect()
    }

    /// Whether an edit over `edit` invalidates the trigger.
    #[inline]
    #[must_use]
    pub fn is_stale(&self, edit: Range) -> bool {
        self.trigger_range.disturbed_by(edit)
    }

    /// Write the selection over the trigger and leave the cursor after it.
    /// Consumes the session.
    ///
    /// # Errors
    ///
    /// [`EditError::StaleSession`] if the trigger text is no longer in the
    /// buffer where it was, or whatever `replace_range` reports.
    pub fn commit<B: TextBuffer + ?Sized>(self, buf: &mut B) -> Result<Range, EditError> {
        if buf.get_range(self.trigger_range).as_deref() != Some(self.base_identifier.as_str()) {
            return Err(EditError::StaleSession);
        }
        let inserted = buf.replace_range(self.trigger_range, &self.replacement())?;
        buf.set_cursor(inserted.end);
        buf.set_selection(None);
        Ok(inserted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::catalog::USER_DEFINED;
    use crate::position::Position;
    use crate::token::locate;
    use pretty_assertions::assert_eq;

    fn open_at(buf: &Buffer, line: usize, col: usize) -> Result<CompletionSession, EditError> {
        CompletionSession::open(&locate(buf, Position::new(line, col)), &SuffixCatalog::builtin())
    }

    fn names(s: &CompletionSession) -> Vec<&str> {
        s.categories().iter().map(|c| c.name.as_ref()).collect()
    }

    // -- Opening --------------------------------------------------------------

    #[test]
    fn lowercase_trigger_offers_static_catalog() {
        let buf = Buffer::from_text("let count_");
        let s = open_at(&buf, 0, 10).unwrap();
        assert_eq!(
            names(&s),
            vec!["Primitives", "Pointers", "Arrays", "Fixed-width", "System"]
        );
        assert_eq!(s.base_identifier(), "count_");
        assert_eq!(s.trigger_range(), Range::new(Position::new(0, 4), Position::new(0, 10)));
        assert_eq!((s.active_category(), s.active_item()), (0, 0));
    }

    #[test]
    fn uppercase_trigger_offers_user_type() {
        let buf = Buffer::from_text("Player_");
        let s = open_at(&buf, 0, 7).unwrap();
        assert_eq!(names(&s), vec![USER_DEFINED]);
        assert_eq!(
            s.labels(),
            vec!["Player", "Playerp", "Playerb", "Playerr", "Playera"]
        );
    }

    #[test]
    fn lone_marker_takes_lowercase_branch() {
        let buf = Buffer::from_text("_");
        let s = open_at(&buf, 0, 1).unwrap();
        assert_eq!(names(&s)[0], "Primitives");
    }

    #[test]
    fn non_trigger_is_rejected() {
        let buf = Buffer::from_text("count_i x");
        assert_eq!(open_at(&buf, 0, 7), Err(EditError::InvalidTrigger));
        assert_eq!(open_at(&buf, 0, 8), Err(EditError::InvalidTrigger));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let buf = Buffer::from_text("count_");
        let token = locate(&buf, Position::new(0, 6));
        assert_eq!(
            CompletionSession::open(&token, &SuffixCatalog::new(Vec::new())),
            Err(EditError::InvalidTrigger)
        );
    }

    // -- Navigation -----------------------------------------------------------

    #[test]
    fn category_navigation_wraps_and_resets_item() {
        let buf = Buffer::from_text("x_");
        let mut s = open_at(&buf, 0, 2).unwrap();
        s.navigate(Direction::Next, Axis::Item);
        assert_eq!(s.active_item(), 1);

        s.navigate(Direction::Previous, Axis::Category);
        assert_eq!(s.active_category(), 4);
        assert_eq!(s.active_item(), 0);

        s.navigate(Direction::Next, Axis::Category);
        assert_eq!(s.active_category(), 0);
    }

    #[test]
    fn full_cycle_returns_home() {
        let buf = Buffer::from_text("x_");
        let mut s = open_at(&buf, 0, 2).unwrap();
        for _ in 0..s.categories().len() {
            s.navigate(Direction::Next, Axis::Category);
        }
        assert_eq!(s.active_category(), 0);
    }

    #[test]
    fn item_navigation_clamps() {
        let buf = Buffer::from_text("x_");
        let mut s = open_at(&buf, 0, 2).unwrap();
        s.navigate(Direction::Previous, Axis::Item);
        assert_eq!(s.active_item(), 0);

        // Primitives has six entries.
        for _ in 0..20 {
            s.navigate(Direction::Next, Axis::Item);
        }
        assert_eq!(s.active_item(), 5);
        assert_eq!(s.selected().mnemonic, "v");
    }

    #[test]
    fn first_and_last_jump() {
        let buf = Buffer::from_text("x_");
        let mut s = open_at(&buf, 0, 2).unwrap();
        s.navigate(Direction::Last, Axis::Item);
        assert_eq!(s.active_item(), 5);
        s.navigate(Direction::First, Axis::Item);
        assert_eq!(s.active_item(), 0);
        s.navigate(Direction::Last, Axis::Category);
        assert_eq!(s.category().name, "System");
        s.navigate(Direction::First, Axis::Category);
        assert_eq!(s.category().name, "Primitives");
    }

    #[test]
    fn select_clamps() {
        let buf = Buffer::from_text("x_");
        let mut s = open_at(&buf, 0, 2).unwrap();
        s.select(2, 3);
        assert_eq!(s.selected().mnemonic, "u8a");
        s.select(99, 99);
        assert_eq!((s.active_category(), s.active_item()), (4, 3));
    }

    // -- Commit ---------------------------------------------------------------

    #[test]
    fn commit_appends_mnemonic() {
        let mut buf = Buffer::from_text("let count_ = 0");
        let s = open_at(&buf, 0, 10).unwrap();
        let inserted = s.commit(&mut buf).unwrap();
        assert_eq!(buf.contents(), "let count_i = 0");
        assert_eq!(inserted.end, Position::new(0, 11));
        assert_eq!(buf.cursor_position(), Position::new(0, 11));
    }

    #[test]
    fn commit_other_category() {
        let mut buf = Buffer::from_text("len_");
        let mut s = open_at(&buf, 0, 4).unwrap();
        s.navigate(Direction::Previous, Axis::Category);
        s.navigate(Direction::Next, Axis::Item);
        assert_eq!(s.replacement(), "len_ux");
        s.commit(&mut buf).unwrap();
        assert_eq!(buf.contents(), "len_ux");
    }

    #[test]
    fn commit_user_type_renames() {
        let mut buf = Buffer::from_text("let Player_ = x");
        let mut s = open_at(&buf, 0, 11).unwrap();
        s.navigate(Direction::Next, Axis::Item);
        s.commit(&mut buf).unwrap();
        assert_eq!(buf.contents(), "let Playerp = x");
        assert_eq!(buf.cursor_position(), Position::new(0, 11));
    }

    #[test]
    fn commit_after_buffer_drift_is_stale() {
        let mut buf = Buffer::from_text("count_");
        let s = open_at(&buf, 0, 6).unwrap();
        buf.replace_range(Range::point(Position::ZERO), "x").unwrap();
        assert_eq!(s.commit(&mut buf), Err(EditError::StaleSession));
        assert_eq!(buf.contents(), "xcount_");
    }

    // -- Staleness ------------------------------------------------------------

    #[test]
    fn edits_at_or_before_trigger_are_stale() {
        let buf = Buffer::from_text("a count_ b");
        let s = open_at(&buf, 0, 8).unwrap();
        let at = |c| Range::point(Position::new(0, c));
        assert!(s.is_stale(at(0)), "before");
        assert!(s.is_stale(at(4)), "inside");
        assert!(s.is_stale(at(8)), "at end");
        assert!(!s.is_stale(at(9)), "after");
        assert!(!s.is_stale(Range::point(Position::new(1, 0))));
    }
}
