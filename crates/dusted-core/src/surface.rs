//! Surface — the outbound half of the host interface.
//!
//! The core never draws. It tells the host what to show through
//! [`Surface`], and the host maps each call onto whatever widgets it has.
//! Hosts that render on their own schedule (and the tests) can use
//! [`RenderQueue`], which just records the calls as [`RenderCommand`]s.

use crate::highlight::HighlightSpan;
use crate::position::{Position, Range};

/// Display operations the engine issues.
pub trait Surface {
    /// Show the popup with `categories` as tabs and `items` as the rows of
    /// the active one, anchored at the trigger token.
    fn show_completion_popup(
        &mut self,
        categories: &[String],
        items: &[String],
        active_category: usize,
        active_item: usize,
        anchor: Position,
    );

    /// Move the popup highlight. `items` is resent when the category changed.
    fn update_completion_selection(
        &mut self,
        items: &[String],
        active_category: usize,
        active_item: usize,
    );

    fn close_completion_popup(&mut self);

    /// Replace every highlight tag with `spans`.
    fn apply_highlight_spans(&mut self, spans: &[HighlightSpan]);

    /// Briefly emphasize a search hit.
    fn flash_match(&mut self, range: Range);

    fn set_status_message(&mut self, text: &str);
}

/// A recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    ShowPopup {
        categories: Vec<String>,
        items: Vec<String>,
        active_category: usize,
        active_item: usize,
        anchor: Position,
    },
    UpdateSelection {
        items: Vec<String>,
        active_category: usize,
        active_item: usize,
    },
    ClosePopup,
    Highlight(Vec<HighlightSpan>),
    Flash(Range),
    Status(String),
}

/// A surface that queues its calls for later.
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    commands: Vec<RenderCommand>,
}

impl RenderQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The most recent status text, if any was set.
    #[must_use]
    pub fn last_status(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::Status(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RenderQueue {
    fn show_completion_popup(
        &mut self,
        categories: &[String],
        items: &[String],
        active_category: usize,
        active_item: usize,
        anchor: Position,
    ) {
        self.commands.push(RenderCommand::ShowPopup {
            categories: categories.to_vec(),
            items: items.to_vec(),
            active_category,
            active_item,
            anchor,
        });
    }

    fn update_completion_selection(
        &mut self,
        items: &[String],
        active_category: usize,
        active_item: usize,
    ) {
        self.commands.push(RenderCommand::UpdateSelection {
            items: items.to_vec(),
            active_category,
            active_item,
        });
    }

    fn close_completion_popup(&mut self) {
        self.commands.push(RenderCommand::ClosePopup);
    }

    fn apply_highlight_spans(&mut self, spans: &[HighlightSpan]) {
        self.commands.push(RenderCommand::Highlight(spans.to_vec()));
    }

    fn flash_match(&mut self, range: Range) {
        self.commands.push(RenderCommand::Flash(range));
    }

    fn set_status_message(&mut self, text: &str) {
        self.commands.push(RenderCommand::Status(text.to_string()));
    }
}
