//! Error conditions reported by the editing core.
//!
//! None of these are faults. Each entry point returns one of them when there
//! was nothing sensible to do, and the engine mirrors the `Display` text to
//! the host's status line. The host never has to handle them to stay alive.

use thiserror::Error;

use crate::position::Range;

/// A non-fatal condition produced by an engine entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The token at the cursor does not end in the completion marker.
    #[error("Type identifier_ first")]
    InvalidTrigger,

    /// An edit touched the completion trigger while the popup was open.
    #[error("Completion closed: the identifier changed")]
    StaleSession,

    /// Navigation or commit arrived with no popup open.
    #[error("No completion menu is open")]
    NoSession,

    /// A cut chord fired with nothing selected.
    #[error("No selection to cut")]
    NoSelection,

    /// A paste fired with nothing on the clipboard.
    #[error("Clipboard is empty")]
    EmptyClipboard,

    /// `FindNext` found no occurrence of the token.
    #[error("'{0}' not found")]
    SearchNotFound(String),

    /// The host buffer rejected a range the core computed.
    #[error("Range {0} is outside the buffer")]
    OutOfBounds(Range),
}

/// A rejected `:set`-style option directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("Unknown option: {0}")]
    Unknown(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Option {0} is not a boolean")]
    NotBoolean(String),
}
