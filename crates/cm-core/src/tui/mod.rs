//! Interactive TUI for the columbarium admin console.
//!
//! This module provides the terminal user interface for browsing and
//! maintaining business records. It is built on ftui's Elm-style
//! Model/update/view loop with custom widgets for the console workflow.
//!
//! # Features
//!
//! - Tabbed record tables with per-column typed filtering
//! - Search input with live filtering and column scoping
//! - Create/edit forms built from tab field specs
//! - Bulk deletion behind a confirmation dialog
//!
//! # Module Structure
//!
//! - `app`: Main application state and update loop
//! - `widgets`: Custom widgets for the console
//! - `theme`: Color schemes and styling
//! - `events`: Event handling and key bindings

mod app;
mod events;
pub mod layout;
mod msg;
mod theme;
pub mod widgets;

pub use app::{run_tui, App, AppState};
pub use events::KeyBindings;
pub use layout::{Breakpoint, LayoutState, MainAreas, ResponsiveLayout};
pub use msg::{Msg, MutationOutcome};
pub use theme::{Theme, ThemeMode};

use thiserror::Error;

/// Errors that can occur in the TUI module.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Failed to initialize terminal.
    #[error("terminal initialization failed: {0}")]
    TerminalInit(String),

    /// Failed to restore terminal state.
    #[error("terminal restoration failed: {0}")]
    TerminalRestore(String),

    /// Widget rendering error.
    #[error("widget render error: {0}")]
    WidgetRender(String),

    /// IO error during TUI operation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;
