//! Deletion guard dialog.
//!
//! Bulk deletes are irreversible server-side, so they route through this
//! modal. Focus always starts on Cancel; Enter answers with whichever
//! button holds focus.

use ftui::widgets::modal::{
    Dialog as FtuiDialog, DialogButton as FtuiDialogButton, DialogState as FtuiDialogState,
};
use ftui::widgets::StatefulWidget as FtuiStatefulWidget;
use ftui::Style as FtuiStyle;

use crate::tui::theme::Theme;

/// Answer carried out of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    Yes,
    #[default]
    No,
}

/// Deletion confirmation dialog.
#[derive(Debug, Default)]
pub struct ConfirmDialog<'a> {
    title: Option<&'a str>,
    message: Option<&'a str>,
    theme: Option<&'a Theme>,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialog title.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the message text.
    pub fn message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Render from an immutable state reference (for Elm view()).
    pub fn render_view(
        &self,
        area: ftui::layout::Rect,
        frame: &mut ftui::render::frame::Frame,
        state: &ConfirmDialogState,
    ) {
        if !state.visible {
            return;
        }

        let (plain, focused) = match self.theme {
            Some(t) => (t.class("border.normal"), t.class("table.selected")),
            None => (FtuiStyle::default(), FtuiStyle::new().reverse().bold()),
        };

        let title = format!(" {} ", self.title.unwrap_or("Confirm"));
        let dialog = FtuiDialog::custom(title, self.message.unwrap_or("Are you sure?"))
            .button(FtuiDialogButton::new("Delete", "yes"))
            .button(FtuiDialogButton::new("Cancel", "no"))
            .build()
            .button_style(plain)
            .focused_button_style(focused);

        let mut ftui_state = FtuiDialogState::new();
        ftui_state.open = true;
        ftui_state.focused_button = Some(match state.selected {
            ConfirmChoice::Yes => 0,
            ConfirmChoice::No => 1,
        });
        FtuiStatefulWidget::render(&dialog, area, frame, &mut ftui_state);
    }
}

/// Dialog visibility, button focus, and the recorded answer.
#[derive(Debug, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub selected: ConfirmChoice,
    pub result: Option<ConfirmChoice>,
}

impl ConfirmDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog with focus on Cancel and no recorded answer.
    pub fn show(&mut self) {
        self.visible = true;
        self.selected = ConfirmChoice::No;
        self.result = None;
    }

    /// Move focus to the other button.
    pub fn toggle(&mut self) {
        self.selected = match self.selected {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        };
    }

    /// Focus the Delete button.
    pub fn select_left(&mut self) {
        self.selected = ConfirmChoice::Yes;
    }

    /// Focus the Cancel button.
    pub fn select_right(&mut self) {
        self.selected = ConfirmChoice::No;
    }

    /// Answer with the focused button and close.
    pub fn confirm(&mut self) -> ConfirmChoice {
        self.result = Some(self.selected);
        self.visible = false;
        self.selected
    }

    /// Close without deleting, regardless of focus.
    pub fn cancel(&mut self) {
        self.result = Some(ConfirmChoice::No);
        self.visible = false;
    }

    pub fn was_confirmed(&self) -> bool {
        self.result == Some(ConfirmChoice::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_focuses_cancel() {
        let mut state = ConfirmDialogState::new();
        assert!(!state.visible);

        state.show();
        assert!(state.visible);
        assert_eq!(state.selected, ConfirmChoice::No);
        assert!(state.result.is_none());
    }

    #[test]
    fn test_focus_movement() {
        let mut state = ConfirmDialogState::new();
        state.show();

        state.toggle();
        assert_eq!(state.selected, ConfirmChoice::Yes);
        state.toggle();
        assert_eq!(state.selected, ConfirmChoice::No);

        state.select_left();
        assert_eq!(state.selected, ConfirmChoice::Yes);
        state.select_right();
        assert_eq!(state.selected, ConfirmChoice::No);
    }

    #[test]
    fn test_enter_answers_with_focused_button() {
        let mut state = ConfirmDialogState::new();
        state.show();
        // Without moving focus, Enter must NOT delete
        assert_eq!(state.confirm(), ConfirmChoice::No);
        assert!(!state.was_confirmed());
        assert!(!state.visible);

        state.show();
        state.select_left();
        assert_eq!(state.confirm(), ConfirmChoice::Yes);
        assert!(state.was_confirmed());
    }

    #[test]
    fn test_escape_overrides_focus() {
        let mut state = ConfirmDialogState::new();
        state.show();
        state.select_left();

        state.cancel();
        assert!(!state.visible);
        assert!(!state.was_confirmed());
    }

    #[test]
    fn test_reopening_forgets_old_answer() {
        let mut state = ConfirmDialogState::new();
        state.show();
        state.select_left();
        state.confirm();

        state.show();
        assert!(state.result.is_none());
        assert_eq!(state.selected, ConfirmChoice::No);
    }
}
