//! Clipboard — where cut text goes and pasted text comes from.
//!
//! The host owns the real system clipboard and lends it to the engine per
//! call through [`Clipboard`]. [`Register`] is an in-memory slot for hosts
//! without one, for the headless binary, and for tests.

/// The clipboard capability.
pub trait Clipboard {
    /// Current contents. `None` when empty.
    fn get(&self) -> Option<String>;

    /// Replace the contents.
    fn set(&mut self, text: String);
}

/// A single in-memory clipboard slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    /// Empty string when nothing has been cut yet.
    content: String,
}

impl Register {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// A register preloaded with `text`.
    #[must_use]
    pub fn with_content(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Clipboard for Register {
    fn get(&self) -> Option<String> {
        (!self.content.is_empty()).then(|| self.content.clone())
    }

    fn set(&mut self, text: String) {
        self.content = text;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
