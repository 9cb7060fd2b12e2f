//! Status bar widget.
//!
//! Bottom-of-screen status bar showing the active tab, selection count,
//! filter status, mode indicator, and context-sensitive key hints.

use ftui::widgets::Widget as FtuiWidget;

use crate::tui::theme::Theme;

// ---------------------------------------------------------------------------
// Mode enum (mirrors AppState for status display)
// ---------------------------------------------------------------------------

/// Display mode for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMode {
    /// Normal browsing.
    #[default]
    Normal,
    /// Search input active.
    Searching,
    /// Confirmation dialog visible.
    Confirming,
    /// Create/edit form open.
    Editing,
    /// Help overlay visible.
    Help,
}

impl StatusMode {
    /// Display label for the mode.
    pub fn label(self) -> &'static str {
        match self {
            StatusMode::Normal => "Normal",
            StatusMode::Searching => "Search",
            StatusMode::Confirming => "Confirm",
            StatusMode::Editing => "Edit",
            StatusMode::Help => "Help",
        }
    }

    /// Context-sensitive key hints for this mode.
    pub fn hints(self) -> &'static [(&'static str, &'static str)] {
        match self {
            StatusMode::Normal => &[
                ("?", "help"),
                ("/", "search"),
                ("n", "new"),
                ("d", "delete"),
                ("r", "refresh"),
                ("q", "quit"),
            ],
            StatusMode::Searching => &[
                ("Enter", "commit"),
                ("Esc", "cancel"),
                ("Ctrl+f", "scope"),
                ("\u{2191}\u{2193}", "history"),
            ],
            StatusMode::Confirming => &[("Tab", "switch"), ("Enter", "confirm"), ("Esc", "cancel")],
            StatusMode::Editing => &[
                ("Tab", "next field"),
                ("Enter", "save"),
                ("Esc", "discard"),
            ],
            StatusMode::Help => &[("?", "close"), ("Esc", "close")],
        }
    }
}

// ---------------------------------------------------------------------------
// StatusBar widget
// ---------------------------------------------------------------------------

/// Status bar widget for the bottom of the TUI.
#[derive(Debug)]
pub struct StatusBar<'a> {
    /// Theme for styling.
    theme: Option<&'a Theme>,
    /// Current mode.
    mode: StatusMode,
    /// Active tab title.
    tab: Option<&'a str>,
    /// Number of selected records.
    selected_count: usize,
    /// Active filter text (if any).
    filter: Option<&'a str>,
    /// Custom status message (overrides auto-generated content).
    message: Option<&'a str>,
    /// Style class for the message ("status.error" etc.).
    message_class: &'a str,
    /// Whether a server request is in flight.
    loading: bool,
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new() -> Self {
        Self {
            theme: None,
            mode: StatusMode::Normal,
            tab: None,
            selected_count: 0,
            filter: None,
            message: None,
            message_class: "status.success",
            loading: false,
        }
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Set the current mode.
    pub fn mode(mut self, mode: StatusMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the active tab title.
    pub fn tab(mut self, tab: &'a str) -> Self {
        self.tab = Some(tab);
        self
    }

    /// Set the selected record count.
    pub fn selected_count(mut self, count: usize) -> Self {
        self.selected_count = count;
        self
    }

    /// Set the active filter text.
    pub fn filter(mut self, filter: &'a str) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set a custom status message with a style class.
    pub fn message(mut self, message: &'a str, class: &'a str) -> Self {
        self.message = Some(message);
        self.message_class = class;
        self
    }

    /// Mark a server request as in flight.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    // ── Content builders ──────────────────────────────────────────────

    /// Build the left-side status text.
    pub fn build_left_text(&self) -> String {
        if let Some(msg) = self.message {
            return msg.to_string();
        }

        let mut parts = Vec::new();

        if let Some(tab) = self.tab {
            parts.push(tab.to_string());
        }

        if self.loading {
            parts.push("Loading...".to_string());
        }

        if self.selected_count > 0 {
            parts.push(format!("{} selected", self.selected_count));
        }

        if let Some(filter) = self.filter {
            if !filter.is_empty() {
                parts.push(format!("Filter: \"{}\"", filter));
            }
        }

        if parts.is_empty() {
            "Ready".to_string()
        } else {
            parts.join(" \u{2502} ")
        }
    }

    /// Build the mode indicator text.
    pub fn build_mode_text(&self) -> String {
        format!("[{}]", self.mode.label())
    }

    /// Build the key-hints text.
    pub fn build_hints_text(&self) -> String {
        self.mode
            .hints()
            .iter()
            .map(|(key, action)| format!("{}: {}", key, action))
            .collect::<Vec<_>>()
            .join("  ")
    }

    // ── ftui rendering ────────────────────────────────────────────────

    /// Render the status bar.
    ///
    /// Note: this builds a single-line Paragraph because StatusLine requires
    /// `&'a str` references that outlive the dynamic strings we compute
    /// per-frame. The visual result is identical.
    pub fn render_view(&self, area: ftui::layout::Rect, frame: &mut ftui::render::frame::Frame) {
        let style = if self.message.is_some() {
            self.theme
                .map(|t| t.class(self.message_class))
                .unwrap_or_default()
        } else {
            self.theme
                .map(|t| t.class("border.normal"))
                .unwrap_or_default()
        };

        let text = if let Some(msg) = self.message {
            format!("{} | Press ? for help", msg)
        } else {
            let left = self.build_left_text();
            let mode = self.build_mode_text();
            let hints = self.build_hints_text();
            format!("{} \u{2502} {} \u{2502} {}", left, mode, hints)
        };

        let paragraph = ftui::widgets::paragraph::Paragraph::new(text).style(style);
        FtuiWidget::render(&paragraph, area, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_text_ready_when_empty() {
        let bar = StatusBar::new();
        assert_eq!(bar.build_left_text(), "Ready");
    }

    #[test]
    fn test_left_text_combines_parts() {
        let bar = StatusBar::new()
            .tab("Customers")
            .selected_count(3)
            .filter("alice");
        let text = bar.build_left_text();
        assert!(text.contains("Customers"));
        assert!(text.contains("3 selected"));
        assert!(text.contains("Filter: \"alice\""));
    }

    #[test]
    fn test_message_overrides_parts() {
        let bar = StatusBar::new()
            .selected_count(3)
            .message("Deleted 3 records", "status.success");
        assert_eq!(bar.build_left_text(), "Deleted 3 records");
    }

    #[test]
    fn test_loading_indicator() {
        let bar = StatusBar::new().tab("Payments").loading(true);
        assert!(bar.build_left_text().contains("Loading..."));
    }

    #[test]
    fn test_empty_filter_not_shown() {
        let bar = StatusBar::new().filter("");
        assert_eq!(bar.build_left_text(), "Ready");
    }

    #[test]
    fn test_mode_hints() {
        assert!(StatusMode::Normal
            .hints()
            .iter()
            .any(|(k, _)| *k == "q"));
        assert!(StatusMode::Searching
            .hints()
            .iter()
            .any(|(_, a)| *a == "cancel"));
        assert_eq!(StatusMode::Editing.label(), "Edit");
    }
}
