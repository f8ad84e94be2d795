//! Engine options — the `:set` system.
//!
//! Options are changed with Vim-style `:set` directives. This module parses
//! the directives and applies them to an [`Options`] value; the engine picks
//! the new values up from there.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `option`         | Enable boolean / show value   |
//! | `nooption`       | Disable boolean               |
//! | `option!`        | Toggle boolean                |
//! | `option?`        | Query current value           |
//! | `option=value`   | Assign a value                |
//! | *(empty)*        | Show changed options          |
//! | `all`            | Show all options              |
//!
//! # Option names
//!
//! | Full name    | Abbrev | Type             | Default        |
//! |--------------|--------|------------------|----------------|
//! | `debounce`   | `db`   | integer (ms)     | 200            |
//! | `wrapscan`   | `ws`   | bool             | true           |
//! | `ignorecase` | `ic`   | bool             | true           |
//! | `keywords`   | `kw`   | comma list       | Dust keywords  |

use std::time::Duration;

use crate::error::OptionError;
use crate::highlight::{DEFAULT_DEBOUNCE, KEYWORDS};
use crate::search::CaseMode;

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option` — enable a boolean option.
    On(String),

    /// `nooption` — disable a boolean option.
    Off(String),

    /// `option!` — toggle a boolean option.
    Toggle(String),

    /// `option?` — query the current value.
    Query(String),

    /// `option=value` — assign a value.
    Assign(String, String),

    /// No arguments — show changed options.
    ShowChanged,

    /// `all` — show all options.
    ShowAll,
}

/// Canonical name for `name`, accepting abbreviations.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "debounce" | "db" => Some("debounce"),
        "wrapscan" | "ws" => Some("wrapscan"),
        "ignorecase" | "ic" => Some("ignorecase"),
        "keywords" | "kw" => Some("keywords"),
        _ => None,
    }
}

/// Returns `true` if `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(canonical_name(name), Some("wrapscan" | "ignorecase"))
}

/// Returns `true` if `name` is a known option that takes a value.
#[must_use]
pub fn is_value_option(name: &str) -> bool {
    matches!(canonical_name(name), Some("debounce" | "keywords"))
}

/// Parse a full `:set` argument string into directives.
///
/// Several space-separated arguments are allowed (`debounce=50 nows`).
/// An empty string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Only a known boolean after `no`, so a future `notes` option would
    // not read as Off("tes").
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    // Bare value option = query its value (Vim behavior).
    if is_value_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display: `"name"` or `"noname"`.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Delay between the last edit and the highlight rescan.
    pub debounce: Duration,
    /// Find-next restarts at the top after the last match.
    pub wrapscan: bool,
    /// Find-next ignores case.
    pub ignorecase: bool,
    /// Words the highlighter tags as keywords.
    pub keywords: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            wrapscan: true,
            ignorecase: true,
            keywords: KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

impl Options {
    /// The case mode searches should use.
    #[must_use]
    pub const fn case_mode(&self) -> CaseMode {
        if self.ignorecase {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        }
    }

    /// Apply one directive. Queries and shows return the text to display.
    ///
    /// # Errors
    ///
    /// [`OptionError`] for unknown names, bad values, or boolean syntax on
    /// a value option. `self` is unchanged on error.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::ShowAll => Ok(Some(self.show(|_| true))),
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                Ok(Some(self.show(|name| self.differs(&defaults, name))))
            }
            SetDirective::Query(name) => Ok(Some(self.format(known(name)?))),
            SetDirective::On(name) => self.set_bool(name, |_| true),
            SetDirective::Off(name) => self.set_bool(name, |_| false),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v),
            SetDirective::Assign(name, value) => {
                self.assign(known(name)?, value)?;
                Ok(None)
            }
        }
    }

    /// Parse and apply a whole `:set` argument string. Stops at the first
    /// error; earlier directives stay applied. Display text is joined with
    /// newlines.
    ///
    /// # Errors
    ///
    /// The first directive's [`OptionError`].
    pub fn apply_str(&mut self, args: &str) -> Result<Option<String>, OptionError> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(text) = self.apply(&directive)? {
                shown.push(text);
            }
        }
        Ok((!shown.is_empty()).then(|| shown.join("\n")))
    }

    fn set_bool(
        &mut self,
        name: &str,
        f: impl FnOnce(bool) -> bool,
    ) -> Result<Option<String>, OptionError> {
        let slot = match known(name)? {
            "wrapscan" => &mut self.wrapscan,
            "ignorecase" => &mut self.ignorecase,
            other => return Err(OptionError::NotBoolean(other.to_string())),
        };
        *slot = f(*slot);
        Ok(None)
    }

    fn assign(&mut self, name: &'static str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "debounce" => {
                let ms: u64 = value.parse().map_err(|_| invalid())?;
                self.debounce = Duration::from_millis(ms);
            }
            "keywords" => {
                self.keywords = value
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {
                let on = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => return Err(invalid()),
                };
                if name == "wrapscan" {
                    self.wrapscan = on;
                } else {
                    self.ignorecase = on;
                }
            }
        }
        Ok(())
    }

    fn format(&self, name: &str) -> String {
        match name {
            "debounce" => format!("debounce={}", self.debounce.as_millis()),
            "wrapscan" => format_bool(name, self.wrapscan),
            "ignorecase" => format_bool(name, self.ignorecase),
            _ => format!("keywords={}", self.keywords.join(",")),
        }
    }

    fn differs(&self, other: &Self, name: &str) -> bool {
        match name {
            "debounce" => self.debounce != other.debounce,
            "wrapscan" => self.wrapscan != other.wrapscan,
            "ignorecase" => self.ignorecase != other.ignorecase,
            _ => self.keywords != other.keywords,
        }
    }

    fn show(&self, include: impl Fn(&str) -> bool) -> String {
        ["debounce", "wrapscan", "ignorecase", "keywords"]
            .into_iter()
            .filter(|name| include(name))
            .map(|name| self.format(name))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn known(name: &str) -> Result<&'static str, OptionError> {
    canonical_name(name).ok_or_else(|| OptionError::Unknown(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
