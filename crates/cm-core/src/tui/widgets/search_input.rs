//! Search box above the record table.
//!
//! The box renders through ftui's TextInput; editing itself happens in
//! the app model (characters arrive as messages), so the state here is
//! just the query text plus a small recall buffer of committed queries.

use std::collections::VecDeque;

use ftui::widgets::block::Block as FtuiBlock;
use ftui::widgets::input::TextInput as FtuiTextInput;
use ftui::widgets::Widget as FtuiWidget;
use ftui::Style as FtuiStyle;

use crate::tui::theme::Theme;

/// Committed queries kept for up/down recall.
const RECALL_CAP: usize = 10;

/// Search box widget.
#[derive(Debug, Default)]
pub struct SearchInput<'a> {
    placeholder: Option<&'a str>,
    scope: Option<&'a str>,
    theme: Option<&'a Theme>,
}

impl<'a> SearchInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder text.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the column scope label. `None` means all columns.
    pub fn scope(mut self, scope: Option<&'a str>) -> Self {
        self.scope = scope;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    fn style_of(&self, class: &str) -> FtuiStyle {
        match self.theme {
            Some(t) => t.class(class),
            None => FtuiStyle::default(),
        }
    }

    fn title(&self, focused: bool) -> String {
        let scope = self.scope.unwrap_or("all columns");
        match focused {
            true => format!(" Search [{scope}] [Esc to close, Ctrl+f to change scope] "),
            false => format!(" Search [{scope}] "),
        }
    }

    /// Render from an immutable state reference (for Elm view()).
    pub fn render_view(
        &self,
        area: ftui::layout::Rect,
        frame: &mut ftui::render::frame::Frame,
        state: &SearchInputState,
    ) {
        let title = self.title(state.focused);
        let border = if state.focused {
            self.style_of("border.focused")
        } else {
            self.style_of("border.normal")
        };

        let block = FtuiBlock::bordered().title(&title).border_style(border);
        let inner = block.inner(area);
        FtuiWidget::render(&block, area, frame);

        let text_style = if state.focused {
            self.style_of("table.header")
        } else {
            FtuiStyle::default()
        };
        let cursor_style = match self.theme {
            Some(t) => t.class("table.selected"),
            None => FtuiStyle::new().reverse(),
        };

        let input = FtuiTextInput::new()
            .with_value(state.value.clone())
            .with_placeholder(self.placeholder.unwrap_or("Search..."))
            .with_style(text_style)
            .with_placeholder_style(self.style_of("status.warning"))
            .with_cursor_style(cursor_style)
            .with_focused(state.focused);
        FtuiWidget::render(&input, inner, frame);
    }
}

/// Query text plus recall buffer.
#[derive(Debug, Clone, Default)]
pub struct SearchInputState {
    /// Current query text.
    pub value: String,
    /// Whether the box has input focus.
    pub focused: bool,
    /// Committed queries, most recent first.
    recent: VecDeque<String>,
    /// Index into `recent` while recalling, `None` when editing fresh text.
    recall: Option<usize>,
}

impl SearchInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Clear the query. The recall buffer survives.
    pub fn clear(&mut self) {
        self.value.clear();
        self.recall = None;
    }

    pub fn type_char(&mut self, ch: char) {
        self.value.push(ch);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Commit the query to the recall buffer. Duplicates move to the
    /// front instead of appearing twice.
    pub fn commit(&mut self) {
        if !self.value.is_empty() {
            self.recent.retain(|q| q != &self.value);
            self.recent.push_front(self.value.clone());
            self.recent.truncate(RECALL_CAP);
        }
        self.recall = None;
    }

    /// Recall an older committed query.
    pub fn history_prev(&mut self) {
        let next = match self.recall {
            None if self.recent.is_empty() => return,
            None => 0,
            Some(i) => (i + 1).min(self.recent.len() - 1),
        };
        self.recall = Some(next);
        self.value = self.recent[next].clone();
    }

    /// Step back toward the newest query; past it, the box empties.
    pub fn history_next(&mut self) {
        match self.recall {
            None => {}
            Some(0) => {
                self.recall = None;
                self.value.clear();
            }
            Some(i) => {
                self.recall = Some(i - 1);
                self.value = self.recent[i - 1].clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(queries: &[&str]) -> SearchInputState {
        let mut state = SearchInputState::new();
        for q in queries {
            state.set_value(q);
            state.commit();
        }
        state.clear();
        state
    }

    #[test]
    fn test_typing_edits_value() {
        let mut state = SearchInputState::new();
        for ch in "cruz".chars() {
            state.type_char(ch);
        }
        assert_eq!(state.value(), "cruz");

        state.backspace();
        assert_eq!(state.value(), "cru");

        state.clear();
        state.backspace();
        assert_eq!(state.value(), "");
    }

    #[test]
    fn test_recall_walks_old_queries() {
        let mut state = committed(&["niche", "garden of peace"]);

        state.history_prev();
        assert_eq!(state.value(), "garden of peace");
        state.history_prev();
        assert_eq!(state.value(), "niche");
        // Already at the oldest entry
        state.history_prev();
        assert_eq!(state.value(), "niche");

        state.history_next();
        assert_eq!(state.value(), "garden of peace");
        state.history_next();
        assert_eq!(state.value(), "");
    }

    #[test]
    fn test_recall_capped_and_deduplicated() {
        let mut state = SearchInputState::new();
        for i in 0..(RECALL_CAP + 2) {
            state.set_value(&format!("q{i}"));
            state.commit();
        }
        assert_eq!(state.recent.len(), RECALL_CAP);
        assert_eq!(state.recent[0], format!("q{}", RECALL_CAP + 1));

        state.set_value("q5");
        state.commit();
        assert_eq!(state.recent[0], "q5");
        assert_eq!(state.recent.iter().filter(|q| *q == "q5").count(), 1);
    }

    #[test]
    fn test_empty_commit_keeps_buffer_clean() {
        let mut state = committed(&["paid"]);
        state.commit();
        assert_eq!(state.recent.len(), 1);
    }
}
