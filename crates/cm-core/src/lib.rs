//! Columbarium console core: tabular view engine, view registry, and TUI.
//!
//! The engine (`table`) is pure and knows nothing about entities or the
//! network; the registry projects typed wire models into engine records;
//! the TUI composes both into one generic tab screen.

pub mod logging;
pub mod registry;
pub mod table;
pub mod tui;
