//! Central message type for the ftui Elm-style architecture.
//!
//! This module defines a single `Msg` enum that captures user input, view/state
//! transitions, and async command completions. It is intentionally exhaustive
//! so all transitions can be handled with explicit `match` arms in the model.
//!
//! When adding new variants:
//! - Prefer reusing existing navigation/selection messages over adding key-specific variants
//! - Keep `From<ftui::Event>` mapping shallow (Event -> Msg::KeyPressed/Resized/etc.)
//! - Update `App::update` to handle the new transition explicitly

use ftui::{Event, KeyEvent};

use cm_api::entity::EntityKind;
use cm_common::RecordId;

use crate::table::Record;

/// Outcome of a create/edit/delete round-trip, surfaced in the status bar.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// What happened, for status messaging ("created", "updated", "deleted").
    pub verb: &'static str,
    /// How many records the mutation touched.
    pub affected: usize,
}

/// Single message type used by the ftui model update loop.
#[derive(Debug, Clone)]
pub enum Msg {
    // Input messages
    KeyPressed(KeyEvent),
    Resized { width: u16, height: u16 },
    Tick,
    FocusChanged(bool),
    PasteReceived { text: String, bracketed: bool },
    Noop,

    // Navigation messages
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    PageUp,
    PageDown,

    // Tab messages
    NextTab,
    PrevTab,
    SwitchTab(EntityKind),

    // Selection messages
    ToggleSelection,
    SelectAllVisible,
    DeselectAll,

    // Search messages
    EnterSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchCommit,
    SearchCancel,
    CycleColumnFilter,

    // Form messages
    OpenCreateForm,
    OpenEditForm,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormCycleOption,
    FormSubmit,
    FormCancel,

    // Action messages
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    RequestRefresh,
    ToggleHelp,

    // Async result messages. Each carries the tab it was issued for so
    // completions that arrive after a tab switch can be discarded.
    LoadComplete(EntityKind, Result<Vec<Record>, String>),
    MutationComplete(EntityKind, Result<MutationOutcome, String>),
    DeleteComplete(EntityKind, Vec<RecordId>, Result<MutationOutcome, String>),

    // System messages
    Quit,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Msg::KeyPressed(key),
            Event::Resize { width, height } => Msg::Resized { width, height },
            Event::Tick => Msg::Tick,
            Event::Focus(gained) => Msg::FocusChanged(gained),
            Event::Paste(paste) => Msg::PasteReceived {
                text: paste.text,
                bracketed: paste.bracketed,
            },
            _ => Msg::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftui::{KeyCode, Modifiers};

    fn assert_send_static<T: Send + 'static>() {}

    #[test]
    fn key_event_maps_to_keypressed_msg() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL));
        let msg = Msg::from(event);
        let Msg::KeyPressed(key) = msg else {
            assert!(false, "expected Msg::KeyPressed");
            return;
        };

        assert!(matches!(key.code, KeyCode::Char('q')));
        assert!(key.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn resize_event_maps_to_resized_msg() {
        let msg = Msg::from(Event::Resize {
            width: 123,
            height: 45,
        });
        let Msg::Resized { width, height } = msg else {
            assert!(false, "expected Msg::Resized");
            return;
        };

        assert_eq!(width, 123);
        assert_eq!(height, 45);
    }

    #[test]
    fn mouse_event_maps_to_noop() {
        let msg = Msg::from(Event::Mouse(ftui::MouseEvent::new(
            ftui::MouseEventKind::Moved,
            1,
            2,
        )));
        assert!(matches!(msg, Msg::Noop));
    }

    #[test]
    fn async_payloads_are_send_and_static() {
        assert_send_static::<Result<Vec<Record>, String>>();
        assert_send_static::<Result<MutationOutcome, String>>();
        assert_send_static::<(EntityKind, Vec<RecordId>)>();
    }
}
