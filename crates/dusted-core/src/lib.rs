//! # dusted-core — editing core for Dust source
//!
//! Dust names every variable with a type suffix: `count_i`, `name_s`,
//! `hero_Playerp`. This crate is the part of an editor that knows about
//! that convention, plus the Acme-style mouse chords the Dust editors use:
//!
//! - **[`position`]** — `Position` (line, col) and `Range`, 0-indexed
//! - **[`buffer`]** — the `TextBuffer` capability and a rope-backed `Buffer`
//! - **[`token`]** — the identifier under a position
//! - **[`catalog`]** — the suffix table and its user-type synthesis
//! - **[`completion`]** — the `identifier_` popup state machine
//! - **[`chord`]** — primary+secondary / primary+tertiary mouse chords
//! - **[`search`]** — case-insensitive find-next with wraparound
//! - **[`highlight`]** — debounced regex highlighting
//! - **[`clipboard`]**, **[`surface`]** — the other host capabilities
//! - **[`options`]** — `:set`-style configuration
//! - **[`engine`]** — the entry points a host calls
//!
//! The core never draws, never owns the text, and never reads a clock. A
//! host drives [`engine::Engine`] with events and lends it a buffer, a
//! clipboard and a surface for each call.

pub mod buffer;
pub mod catalog;
pub mod chord;
pub mod clipboard;
pub mod completion;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod options;
pub mod position;
pub mod search;
pub mod surface;
pub mod token;

pub use engine::Engine;
pub use error::{EditError, OptionError};
