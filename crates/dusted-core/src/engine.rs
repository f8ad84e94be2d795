//! Engine — the host-facing entry points.
//!
//! The engine owns the pieces that persist between events: the suffix
//! catalog, the options, at most one completion session, the chord
//! interpreter, and the highlighter. Everything else (text, clipboard,
//! display) belongs to the host and is lent to each call.
//!
//! Every entry point that can refuse returns `Err(EditError)` and also puts
//! the error's text on the status line, so a host that ignores the result
//! still shows the user what happened.
//!
//! # Highlight scheduling
//!
//! The engine reads no clock. Edits (the host's, reported through
//! [`Engine::on_buffer_edited`], and the engine's own) mark a rescan as
//! requested; the next [`Engine::on_tick`] arms the debounce from that
//! tick's time, and a later tick runs the rescan once it is due.

use std::time::Instant;

use tracing::debug;

use crate::buffer::TextBuffer;
use crate::catalog::SuffixCatalog;
use crate::chord::{Button, ChordInterpreter, Gesture, PointerEvent};
use crate::clipboard::Clipboard;
use crate::completion::{Axis, CompletionSession, Direction};
use crate::error::{EditError, OptionError};
use crate::highlight::Highlighter;
use crate::options::Options;
use crate::position::{Position, Range};
use crate::search::search;
use crate::surface::Surface;
use crate::token::locate;

/// Editing core state for one document view.
#[derive(Debug)]
pub struct Engine {
    catalog: SuffixCatalog,
    options: Options,
    session: Option<CompletionSession>,
    chord: ChordInterpreter,
    highlighter: Highlighter,
    rescan_requested: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SuffixCatalog::builtin(), Options::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new(catalog: SuffixCatalog, options: Options) -> Self {
        let highlighter = Highlighter::new(&options.keywords, options.debounce);
        Self {
            catalog,
            options,
            session: None,
            chord: ChordInterpreter::new(),
            highlighter,
            rescan_requested: false,
        }
    }

    // -- Accessors ------------------------------------------------------------

    #[must_use]
    pub const fn catalog(&self) -> &SuffixCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The open completion session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&CompletionSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Apply a `:set` argument string and reconfigure the highlighter.
    ///
    /// # Errors
    ///
    /// The first rejected directive. Directives before it stay applied.
    pub fn set_option(&mut self, args: &str) -> Result<Option<String>, OptionError> {
        let result = self.options.apply_str(args);
        self.highlighter = Highlighter::new(&self.options.keywords, self.options.debounce);
        self.rescan_requested = true;
        result
    }

    // -- Completion -----------------------------------------------------------

    /// The trigger key was pressed with the cursor at `pos`.
    ///
    /// Any open session is replaced.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidTrigger`] when the token at `pos` does not end in
    /// `_`.
    pub fn on_trigger_key<B, S>(
        &mut self,
        buf: &B,
        surface: &mut S,
        pos: Position,
    ) -> Result<(), EditError>
    where
        B: TextBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        if self.session.take().is_some() {
            surface.close_completion_popup();
        }
        let session = match CompletionSession::open(&locate(buf, pos), &self.catalog) {
            Ok(session) => session,
            Err(err) => return report(surface, Err(err)),
        };
        debug!(
            trigger = session.base_identifier(),
            categories = session.categories().len(),
            "completion opened"
        );
        let names: Vec<String> = session
            .categories()
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        surface.show_completion_popup(
            &names,
            &session.labels(),
            session.active_category(),
            session.active_item(),
            session.trigger_range().start,
        );
        self.session = Some(session);
        Ok(())
    }

    /// Move the popup highlight.
    ///
    /// # Errors
    ///
    /// [`EditError::NoSession`] when no popup is open.
    pub fn on_navigate<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        direction: Direction,
        axis: Axis,
    ) -> Result<(), EditError> {
        let result = match self.session.as_mut() {
            Some(session) => {
                session.navigate(direction, axis);
                surface.update_completion_selection(
                    &session.labels(),
                    session.active_category(),
                    session.active_item(),
                );
                Ok(())
            }
            None => Err(EditError::NoSession),
        };
        report(surface, result)
    }

    /// Highlight `(category, item)` directly, as a click in the popup does.
    ///
    /// # Errors
    ///
    /// [`EditError::NoSession`] when no popup is open.
    pub fn on_select<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        category: usize,
        item: usize,
    ) -> Result<(), EditError> {
        let result = match self.session.as_mut() {
            Some(session) => {
                session.select(category, item);
                surface.update_completion_selection(
                    &session.labels(),
                    session.active_category(),
                    session.active_item(),
                );
                Ok(())
            }
            None => Err(EditError::NoSession),
        };
        report(surface, result)
    }

    /// Write the highlighted entry over the trigger and close the popup.
    /// Returns the range of the inserted text.
    ///
    /// # Errors
    ///
    /// [`EditError::NoSession`] with no popup open, or
    /// [`EditError::StaleSession`] if the trigger text has changed.
    pub fn on_commit<B, S>(&mut self, buf: &mut B, surface: &mut S) -> Result<Range, EditError>
    where
        B: TextBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        let Some(session) = self.session.take() else {
            return report(surface, Err(EditError::NoSession));
        };
        surface.close_completion_popup();

        let replacement = session.replacement();
        let description = session.selected().description.to_string();
        let committed = session.commit(buf);
        if let Ok(inserted) = committed {
            debug!(%replacement, at = %inserted.start, "completion committed");
            self.rescan_requested = true;
            surface.set_status_message(&format!("{replacement}: {description}"));
        }
        report(surface, committed)
    }

    /// Close the popup without editing. A no-op when none is open.
    ///
    /// # Errors
    ///
    /// Never; the `Result` keeps every entry point on the same contract.
    pub fn on_cancel<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), EditError> {
        if self.session.take().is_some() {
            debug!("completion cancelled");
            surface.close_completion_popup();
        }
        Ok(())
    }

    /// The host changed the text over `edit` (the pre-edit range).
    ///
    /// # Errors
    ///
    /// [`EditError::StaleSession`] when the edit closed an open popup.
    pub fn on_buffer_edited<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        edit: Range,
    ) -> Result<(), EditError> {
        let result = if self.note_edit(surface, edit) {
            Err(EditError::StaleSession)
        } else {
            Ok(())
        };
        report(surface, result)
    }

    // -- Pointer --------------------------------------------------------------

    /// A pointer button went down at `pos`.
    ///
    /// # Errors
    ///
    /// Whatever the resulting gesture reports: [`EditError::NoSelection`],
    /// [`EditError::EmptyClipboard`], [`EditError::SearchNotFound`].
    pub fn on_pointer_button_down<B, C, S>(
        &mut self,
        buf: &mut B,
        clipboard: &mut C,
        surface: &mut S,
        button: Button,
        pos: Position,
    ) -> Result<(), EditError>
    where
        B: TextBuffer + ?Sized,
        C: Clipboard + ?Sized,
        S: Surface + ?Sized,
    {
        let fresh = !self.chord.held().contains(button.flag());
        let pos = clamp(&*buf, pos);
        let gesture = self.chord.handle(PointerEvent::Down(button, pos));
        if gesture != Gesture::None {
            debug!(?gesture, "chord resolved");
        }

        let result = match gesture {
            Gesture::None => {
                if fresh && button == Button::Primary {
                    buf.set_cursor(pos);
                    buf.set_selection(None);
                }
                Ok(())
            }
            Gesture::Cut => self.cut(buf, clipboard, surface),
            Gesture::Paste {
                at,
                replace_selection,
            } => self.paste(buf, &*clipboard, surface, at, replace_selection),
            Gesture::FindNext { at } => self.find_next(buf, surface, at),
        };
        report(surface, result)
    }

    /// A pointer button was released. Releases never fire a gesture.
    ///
    /// # Errors
    ///
    /// Never.
    pub fn on_pointer_button_up(&mut self, button: Button) -> Result<(), EditError> {
        self.chord.handle(PointerEvent::Up(button));
        Ok(())
    }

    /// Extend the drag selection while the primary button is held.
    ///
    /// # Errors
    ///
    /// Never.
    pub fn on_pointer_moved<B: TextBuffer + ?Sized>(
        &mut self,
        buf: &mut B,
        pos: Position,
    ) -> Result<(), EditError> {
        let Some(anchor) = self.chord.anchor() else {
            return Ok(());
        };
        let pos = clamp(&*buf, pos);
        buf.set_selection(Some(Range::ordered(anchor, pos)));
        buf.set_cursor(pos);
        Ok(())
    }

    // -- Highlighting ---------------------------------------------------------

    /// Host clock tick. Arms a requested rescan and runs a due one.
    /// Returns `true` when new spans were sent to the surface.
    pub fn on_tick<B, S>(&mut self, buf: &B, surface: &mut S, now: Instant) -> bool
    where
        B: TextBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        if std::mem::take(&mut self.rescan_requested) {
            self.highlighter.schedule(now);
        }
        let due = self.highlighter.debounce().deadline().is_some_and(|d| now >= d);
        if !due {
            return false;
        }
        let text = buf.contents();
        match self.highlighter.poll(now, &text) {
            Some(spans) => {
                surface.apply_highlight_spans(spans);
                true
            }
            None => false,
        }
    }

    /// Rescan immediately, e.g. right after a file is loaded.
    pub fn rescan_now<B, S>(&mut self, buf: &B, surface: &mut S)
    where
        B: TextBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        self.rescan_requested = false;
        self.highlighter.cancel();
        self.highlighter.rescan(&buf.contents());
        surface.apply_highlight_spans(self.highlighter.spans());
    }

    // -- Hover ----------------------------------------------------------------

    /// What the suffix of the identifier at `pos` means, e.g.
    /// `count_u32: uint32_t`. Types declared with `struct Name` in the
    /// buffer are recognized as user types.
    #[must_use]
    pub fn describe_at<B: TextBuffer + ?Sized>(&self, buf: &B, pos: Position) -> Option<String> {
        let token = locate(buf, pos);
        let declared = declared_types(buf);
        let names: Vec<&str> = declared.iter().map(String::as_str).collect();
        let entry = self.catalog.describe(&token.text, &names)?;
        Some(format!("{}: {}", token.text, entry.description))
    }

    // -- Gestures -------------------------------------------------------------

    fn cut<B, C, S>(&mut self, buf: &mut B, clipboard: &mut C, surface: &mut S) -> Result<(), EditError>
    where
        B: TextBuffer + ?Sized,
        C: Clipboard + ?Sized,
        S: Surface + ?Sized,
    {
        let selection = buf.selection().ok_or(EditError::NoSelection)?;
        let text = buf
            .get_range(selection)
            .ok_or(EditError::OutOfBounds(selection))?;
        buf.replace_range(selection, "")?;
        clipboard.set(text);
        buf.set_selection(None);
        buf.set_cursor(selection.start);
        self.note_edit(surface, selection);
        Ok(())
    }

    fn paste<B, C, S>(
        &mut self,
        buf: &mut B,
        clipboard: &C,
        surface: &mut S,
        at: Position,
        replace_selection: bool,
    ) -> Result<(), EditError>
    where
        B: TextBuffer + ?Sized,
        C: Clipboard + ?Sized,
        S: Surface + ?Sized,
    {
        let text = clipboard.get().ok_or(EditError::EmptyClipboard)?;
        let target = buf
            .selection()
            .filter(|_| replace_selection)
            .unwrap_or_else(|| Range::point(at));
        let inserted = buf.replace_range(target, &text)?;
        buf.set_selection(None);
        buf.set_cursor(inserted.end);
        self.note_edit(surface, target);
        Ok(())
    }

    fn find_next<B, S>(&self, buf: &mut B, surface: &mut S, at: Position) -> Result<(), EditError>
    where
        B: TextBuffer + ?Sized,
        S: Surface + ?Sized,
    {
        let token = locate(&*buf, at);
        if token.is_empty() {
            surface.set_status_message("No word under the pointer");
            return Ok(());
        }
        let found = search(
            &*buf,
            &token.text,
            at.right(1),
            self.options.wrapscan,
            self.options.case_mode(),
        )
        .ok_or_else(|| EditError::SearchNotFound(token.text.clone()))?;

        buf.set_cursor(found.start);
        surface.flash_match(found.range());
        surface.set_status_message(&format!("Found '{}' at {}", token.text, found.start));
        Ok(())
    }

    /// Record an edit over `edit`. Returns `true` when it closed the popup.
    fn note_edit<S: Surface + ?Sized>(&mut self, surface: &mut S, edit: Range) -> bool {
        self.rescan_requested = true;
        if self.session.as_ref().is_some_and(|s| s.is_stale(edit)) {
            debug!(%edit, "completion closed by edit");
            self.session = None;
            surface.close_completion_popup();
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mirror an error to the status line and hand the result back.
fn report<T, S: Surface + ?Sized>(surface: &mut S, result: Result<T, EditError>) -> Result<T, EditError> {
    if let Err(err) = &result {
        debug!(%err, "edit refused");
        surface.set_status_message(&err.to_string());
    }
    result
}

/// Pull a pointer position back inside the buffer.
fn clamp<B: TextBuffer + ?Sized>(buf: &B, pos: Position) -> Position {
    let line = pos.line.min(buf.line_count().saturating_sub(1));
    let len = buf.line_text(line).map_or(0, |text| text.chars().count());
    Position::new(line, pos.col.min(len))
}

/// Names introduced by `struct Name` anywhere in the buffer.
fn declared_types<B: TextBuffer + ?Sized>(buf: &B) -> Vec<String> {
    let mut names = Vec::new();
    for line in 0..buf.line_count() {
        let Some(text) = buf.line_text(line) else {
            continue;
        };
        let mut words = text.split(|c: char| !crate::token::is_word_char(c));
        while let Some(word) = words.next() {
            if word == "struct" {
                if let Some(name) = words.find(|w| !w.is_empty()) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
