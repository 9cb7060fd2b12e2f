//! Event handling for the console TUI.
//!
//! Provides keyboard event handling with customizable key bindings.

use ftui::{KeyCode, KeyEvent, Modifiers};

/// Configurable key bindings for TUI navigation.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Key to quit the application.
    pub quit: Vec<KeyEvent>,
    /// Key to confirm selection.
    pub confirm: Vec<KeyEvent>,
    /// Key to cancel/go back.
    pub cancel: Vec<KeyEvent>,
    /// Key to show help.
    pub help: Vec<KeyEvent>,
    /// Key to focus search input.
    pub search: Vec<KeyEvent>,
    /// Key to select next row.
    pub next: Vec<KeyEvent>,
    /// Key to select previous row.
    pub prev: Vec<KeyEvent>,
    /// Key to toggle row selection.
    pub toggle: Vec<KeyEvent>,
    /// Key to select all visible rows.
    pub select_all: Vec<KeyEvent>,
    /// Key to deselect all rows.
    pub deselect_all: Vec<KeyEvent>,
    /// Key to open the create form.
    pub create: Vec<KeyEvent>,
    /// Key to open the edit form for the highlighted row.
    pub edit: Vec<KeyEvent>,
    /// Key to delete the selected rows.
    pub delete: Vec<KeyEvent>,
    /// Key to reload the active tab from the server.
    pub refresh: Vec<KeyEvent>,
    /// Key to cycle the column filter scope.
    pub cycle_filter: Vec<KeyEvent>,
    /// Key to switch to next tab.
    pub next_tab: Vec<KeyEvent>,
    /// Key to switch to previous tab.
    pub prev_tab: Vec<KeyEvent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec![
                KeyEvent::new(KeyCode::Char('q')),
                KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL),
            ],
            confirm: vec![KeyEvent::new(KeyCode::Enter)],
            cancel: vec![KeyEvent::new(KeyCode::Escape)],
            help: vec![
                KeyEvent::new(KeyCode::Char('?')),
                KeyEvent::new(KeyCode::F(1)),
            ],
            search: vec![KeyEvent::new(KeyCode::Char('/'))],
            next: vec![
                KeyEvent::new(KeyCode::Down),
                KeyEvent::new(KeyCode::Char('j')),
            ],
            prev: vec![
                KeyEvent::new(KeyCode::Up),
                KeyEvent::new(KeyCode::Char('k')),
            ],
            toggle: vec![KeyEvent::new(KeyCode::Char(' '))],
            select_all: vec![KeyEvent::new(KeyCode::Char('A'))],
            deselect_all: vec![KeyEvent::new(KeyCode::Char('u'))],
            create: vec![KeyEvent::new(KeyCode::Char('n'))],
            edit: vec![KeyEvent::new(KeyCode::Char('e'))],
            delete: vec![
                KeyEvent::new(KeyCode::Char('d')),
                KeyEvent::new(KeyCode::Delete),
            ],
            refresh: vec![KeyEvent::new(KeyCode::Char('r'))],
            cycle_filter: vec![KeyEvent::new(KeyCode::Char('f'))],
            next_tab: vec![KeyEvent::new(KeyCode::Tab)],
            prev_tab: vec![KeyEvent::new(KeyCode::BackTab)],
        }
    }
}

impl KeyBindings {
    fn matches_any(bindings: &[KeyEvent], key: &KeyEvent) -> bool {
        // Ignore KeyEventKind when matching: ftui will emit both Press and Repeat,
        // and we want bindings to apply to either.
        //
        // Modifier matching allows an extra SHIFT bit. Many terminals report SHIFT
        // even when the shifted character is already encoded in KeyCode::Char('?').
        bindings
            .iter()
            .any(|b| b.code == key.code && mods_match(b.modifiers, key.modifiers))
    }

    /// Check if a key event matches any quit binding.
    pub fn is_quit(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.quit, key)
    }

    /// Check if a key event matches any confirm binding.
    pub fn is_confirm(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.confirm, key)
    }

    /// Check if a key event matches any cancel binding.
    pub fn is_cancel(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.cancel, key)
    }

    /// Check if a key event matches any help binding.
    pub fn is_help(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.help, key)
    }

    /// Check if a key event matches any search binding.
    pub fn is_search(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.search, key)
    }

    /// Check if a key event matches any next binding.
    pub fn is_next(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.next, key)
    }

    /// Check if a key event matches any prev binding.
    pub fn is_prev(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.prev, key)
    }

    /// Check if a key event matches any toggle binding.
    pub fn is_toggle(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.toggle, key)
    }

    /// Check if a key event matches any select-all binding.
    pub fn is_select_all(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.select_all, key)
    }

    /// Check if a key event matches any deselect-all binding.
    pub fn is_deselect_all(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.deselect_all, key)
    }

    /// Check if a key event matches any create binding.
    pub fn is_create(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.create, key)
    }

    /// Check if a key event matches any edit binding.
    pub fn is_edit(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.edit, key)
    }

    /// Check if a key event matches any delete binding.
    pub fn is_delete(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.delete, key)
    }

    /// Check if a key event matches any refresh binding.
    pub fn is_refresh(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.refresh, key)
    }

    /// Check if a key event matches any filter-cycle binding.
    pub fn is_cycle_filter(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.cycle_filter, key)
    }

    /// Check if a key event matches any next-tab binding.
    pub fn is_next_tab(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.next_tab, key)
    }

    /// Check if a key event matches any prev-tab binding.
    pub fn is_prev_tab(&self, key: &KeyEvent) -> bool {
        Self::matches_any(&self.prev_tab, key)
    }
}

fn mods_match(binding: Modifiers, observed: Modifiers) -> bool {
    observed == binding || observed == (binding | Modifiers::SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();

        let q_key = KeyEvent::new(KeyCode::Char('q'));
        assert!(bindings.is_quit(&q_key));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(bindings.is_quit(&ctrl_c));

        let enter = KeyEvent::new(KeyCode::Enter);
        assert!(bindings.is_confirm(&enter));

        let esc = KeyEvent::new(KeyCode::Escape);
        assert!(bindings.is_cancel(&esc));
    }

    #[test]
    fn test_navigation_bindings() {
        let bindings = KeyBindings::default();

        assert!(bindings.is_next(&KeyEvent::new(KeyCode::Down)));
        assert!(bindings.is_next(&KeyEvent::new(KeyCode::Char('j'))));
        assert!(bindings.is_prev(&KeyEvent::new(KeyCode::Up)));
        assert!(bindings.is_prev(&KeyEvent::new(KeyCode::Char('k'))));
    }

    #[test]
    fn test_selection_bindings() {
        let bindings = KeyBindings::default();

        assert!(bindings.is_toggle(&KeyEvent::new(KeyCode::Char(' '))));
        assert!(bindings.is_select_all(&KeyEvent::new(KeyCode::Char('A'))));
        assert!(bindings.is_deselect_all(&KeyEvent::new(KeyCode::Char('u'))));
    }

    #[test]
    fn test_mutation_bindings() {
        let bindings = KeyBindings::default();

        assert!(bindings.is_create(&KeyEvent::new(KeyCode::Char('n'))));
        assert!(bindings.is_edit(&KeyEvent::new(KeyCode::Char('e'))));
        assert!(bindings.is_delete(&KeyEvent::new(KeyCode::Char('d'))));
        assert!(bindings.is_delete(&KeyEvent::new(KeyCode::Delete)));
        assert!(bindings.is_refresh(&KeyEvent::new(KeyCode::Char('r'))));
    }

    #[test]
    fn test_tab_bindings() {
        let bindings = KeyBindings::default();

        assert!(bindings.is_next_tab(&KeyEvent::new(KeyCode::Tab)));
        assert!(bindings.is_prev_tab(&KeyEvent::new(KeyCode::BackTab)));
    }

    #[test]
    fn test_shifted_char_binding_matches_with_shift_modifier() {
        let bindings = KeyBindings::default();

        // Terminals commonly report SHIFT alongside an already-shifted char.
        let shift_a = KeyEvent::new(KeyCode::Char('A')).with_modifiers(Modifiers::SHIFT);
        assert!(bindings.is_select_all(&shift_a));

        let shift_question = KeyEvent::new(KeyCode::Char('?')).with_modifiers(Modifiers::SHIFT);
        assert!(bindings.is_help(&shift_question));
    }

    #[test]
    fn test_ctrl_char_does_not_match_plain_binding() {
        let bindings = KeyBindings::default();

        let ctrl_n = KeyEvent::new(KeyCode::Char('n')).with_modifiers(Modifiers::CTRL);
        assert!(!bindings.is_create(&ctrl_n));
    }
}
