//! TUI widgets for the admin console.
//!
//! This module provides widget wrappers integrating ftui components
//! with the console application state.
//!
//! # Widgets
//!
//! - `SearchInput`: Text input for filtering records
//! - `RecordTable`: Descriptor-driven table for the active tab
//! - `RecordForm`: Modal create/edit form
//! - `ConfirmDialog`: Confirmation dialog for bulk deletion
//! - `StatusBar`: Bottom status line with mode and key hints
//! - `HelpOverlay`: Keyboard shortcut reference

mod confirm_dialog;
mod help_overlay;
mod record_form;
mod record_table;
mod search_input;
mod status_bar;

pub use confirm_dialog::{ConfirmChoice, ConfirmDialog, ConfirmDialogState};
pub use help_overlay::HelpOverlay;
pub use record_form::{FormField, RecordForm, RecordFormState};
pub use record_table::{RecordTable, RecordTableState};
pub use search_input::{SearchInput, SearchInputState};
pub use status_bar::{StatusBar, StatusMode};
