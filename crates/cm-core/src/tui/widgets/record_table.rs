//! Record table widget for displaying tab datasets.
//!
//! Descriptor-driven table with checkbox selection and tone styling.
//! Uses ftui's built-in Table widget for rendering.

use ftui::layout::Constraint as FtuiConstraint;
use ftui::text::{Line as FtuiLine, Span as FtuiSpan, Text as FtuiText};
use ftui::widgets::block::Block as FtuiBlock;
use ftui::widgets::table::{Row as FtuiRow, Table as FtuiTable, TableState as FtuiTableState};
use ftui::widgets::StatefulWidget as FtuiStatefulWidget;
use ftui::Style as FtuiStyle;

use cm_common::RecordId;

use crate::registry::{render_cell, RowTone};
use crate::table::{ColumnSpec, Record, Selection};
use crate::tui::theme::Theme;

const COL_CHECKBOX: u16 = 3;
const COL_ID: u16 = 6;
const MIN_DATA_WIDTH: u16 = 8;

/// Record table widget for the active tab.
#[derive(Debug)]
pub struct RecordTable<'a> {
    /// Theme for styling.
    theme: Option<&'a Theme>,
}

impl<'a> Default for RecordTable<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RecordTable<'a> {
    /// Create a new record table.
    pub fn new() -> Self {
        Self { theme: None }
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Build the title string based on state.
    fn title_string(&self, state: &RecordTableState) -> String {
        let total = state.rows.len();
        if state.has_select() {
            let selected = state.selection.len();
            if selected > 0 {
                format!(
                    " {} [{}/{} selected] [Space: toggle, A: all, u: clear] ",
                    state.title, selected, total
                )
            } else {
                format!(
                    " {} [{}] [Space: toggle, A: all, u: clear] ",
                    state.title, total
                )
            }
        } else {
            format!(" {} [{}] ", state.title, total)
        }
    }

    /// Get the border style from the theme based on focus state.
    fn border_ftui_style(&self, focused: bool) -> FtuiStyle {
        self.theme
            .map(|t| {
                let class = if focused {
                    "border.focused"
                } else {
                    "border.normal"
                };
                t.stylesheet().get_or_default(class)
            })
            .unwrap_or_default()
    }

    /// Build column constraints for the visible data columns.
    ///
    /// Checkbox and id get fixed widths, everything else shares the rest.
    /// On narrow terminals trailing columns are dropped so each visible
    /// data column keeps a readable minimum width.
    fn build_constraints(
        &self,
        state: &RecordTableState,
        area_width: u16,
    ) -> (Vec<FtuiConstraint>, usize) {
        let has_select = state.has_select();
        let data_columns: Vec<&ColumnSpec> =
            state.columns.iter().filter(|c| !c.is_select()).collect();

        let checkbox_width = if has_select { COL_CHECKBOX + 1 } else { 0 };

        let mut visible = data_columns.len();
        while visible > 1 {
            let fixed: u16 = data_columns[..visible]
                .iter()
                .map(|c| if c.key == "id" { COL_ID } else { 0 })
                .sum();
            let flexible = data_columns[..visible]
                .iter()
                .filter(|c| c.key != "id")
                .count() as u16;
            let gaps = visible as u16;
            let remaining = area_width.saturating_sub(fixed + checkbox_width + gaps);
            if flexible == 0 || remaining / flexible.max(1) >= MIN_DATA_WIDTH {
                break;
            }
            visible -= 1;
        }

        let mut constraints = Vec::new();
        if has_select {
            constraints.push(FtuiConstraint::Fixed(COL_CHECKBOX));
        }
        for column in &data_columns[..visible] {
            if column.key == "id" {
                constraints.push(FtuiConstraint::Fixed(COL_ID));
            } else {
                constraints.push(FtuiConstraint::Fill);
            }
        }

        (constraints, visible)
    }

    /// Build ftui table rows, header, constraints, and highlight style (no block).
    fn build_ftui_table_parts(&self, state: &RecordTableState, area_width: u16) -> FtuiTableParts {
        let header_style = self
            .theme
            .map(|t| t.stylesheet().get_or_default("table.header"))
            .unwrap_or_else(|| FtuiStyle::new().bold());

        let highlight_style = self
            .theme
            .map(|t| t.stylesheet().get_or_default("table.selected"))
            .unwrap_or_else(|| FtuiStyle::new().reverse());

        let tone_style = self
            .theme
            .map(|t| t.class("tone.warning"))
            .unwrap_or_else(|| FtuiStyle::new().bold());

        let has_select = state.has_select();
        let (constraints, visible_cols) = self.build_constraints(state, area_width);
        let data_columns: Vec<&ColumnSpec> =
            state.columns.iter().filter(|c| !c.is_select()).collect();

        // Header row
        let mut header_cells: Vec<FtuiText> = Vec::new();
        if has_select {
            let all = state.selection.is_all_selected(state.rows.len());
            header_cells.push(FtuiText::raw(if all { "[x]" } else { "[ ]" }));
        }
        for column in &data_columns[..visible_cols] {
            header_cells.push(FtuiText::raw(column.label.clone()));
        }
        let header = FtuiRow::new(header_cells).style(header_style);

        // Data rows
        let rows: Vec<FtuiRow> = state
            .rows
            .iter()
            .zip(state.tones.iter().chain(std::iter::repeat(&RowTone::Normal)))
            .map(|(record, tone)| {
                let mut cells: Vec<FtuiText> = Vec::new();

                if has_select {
                    let check = if state.selection.contains(record.id) {
                        "\u{2611}"
                    } else {
                        "\u{2610}"
                    };
                    cells.push(FtuiText::raw(check));
                }

                for column in &data_columns[..visible_cols] {
                    cells.push(FtuiText::raw(render_cell(record, column)));
                }

                let row = FtuiRow::new(cells);
                match tone {
                    RowTone::Warning => row.style(tone_style),
                    RowTone::Normal => row,
                }
            })
            .collect();

        FtuiTableParts {
            rows,
            header,
            constraints,
            highlight_style,
        }
    }

    fn render_empty(
        &self,
        area: ftui::layout::Rect,
        frame: &mut ftui::render::frame::Frame,
        state: &RecordTableState,
        title: &str,
        border_style: FtuiStyle,
    ) {
        let msg = if state.filter_active {
            "No matching records"
        } else {
            "No records loaded"
        };
        let muted_style = self
            .theme
            .map(|t| t.class("status.warning"))
            .unwrap_or_default();

        let block = FtuiBlock::bordered()
            .title(title)
            .border_style(border_style);

        let para = ftui::widgets::paragraph::Paragraph::new(FtuiText::from_line(
            FtuiLine::from_spans([FtuiSpan::styled(msg, muted_style)]),
        ))
        .block(block);
        ftui::widgets::Widget::render(&para, area, frame);
    }
}

/// Intermediate parts for building an ftui Table (avoids lifetime issues with title).
struct FtuiTableParts {
    rows: Vec<FtuiRow>,
    header: FtuiRow,
    constraints: Vec<FtuiConstraint>,
    highlight_style: FtuiStyle,
}

impl<'a> RecordTable<'a> {
    /// Render the table from an immutable state reference (for Elm view()).
    ///
    /// `scroll_offset` is not synced back from ftui's clamping; cursor
    /// movement recalculates it on the next update anyway.
    pub fn render_view(
        &self,
        area: ftui::layout::Rect,
        frame: &mut ftui::render::frame::Frame,
        state: &RecordTableState,
    ) {
        let title = self.title_string(state);
        let border_style = self.border_ftui_style(state.focused);

        if state.rows.is_empty() {
            self.render_empty(area, frame, state, &title, border_style);
            return;
        }

        let parts = self.build_ftui_table_parts(state, area.width);

        let block = FtuiBlock::bordered()
            .title(&title)
            .border_style(border_style);

        let table = FtuiTable::new(parts.rows, parts.constraints)
            .header(parts.header)
            .block(block)
            .highlight_style(parts.highlight_style)
            .column_spacing(1);

        let mut ftui_state = FtuiTableState::default();
        ftui_state.selected = Some(state.cursor);
        ftui_state.offset = state.scroll_offset;

        FtuiStatefulWidget::render(&table, area, frame, &mut ftui_state);
        // Note: scroll_offset sync-back intentionally skipped for immutable view()
    }
}

// ---------------------------------------------------------------------------
// RecordTableState
// ---------------------------------------------------------------------------

/// State for the record table widget.
///
/// Holds the already-filtered rows for the active tab. Filtering happens
/// upstream in the app model so the table never sees hidden records.
#[derive(Debug, Default)]
pub struct RecordTableState {
    /// Whether the table is focused.
    pub focused: bool,
    /// Tab title shown in the block border.
    pub title: String,
    /// Column specs for the active tab (including any checkbox column).
    pub columns: Vec<ColumnSpec>,
    /// Visible rows after filtering.
    pub rows: Vec<Record>,
    /// Row tones parallel to `rows`.
    pub tones: Vec<RowTone>,
    /// Selected record ids.
    pub selection: Selection,
    /// Current cursor position into `rows`.
    pub cursor: usize,
    /// Scroll offset (first visible row).
    pub scroll_offset: usize,
    /// Whether a search filter is currently applied.
    pub filter_active: bool,
}

impl RecordTableState {
    /// Create a new record table state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the active tab carries a checkbox column.
    pub fn has_select(&self) -> bool {
        self.columns.iter().any(|c| c.is_select())
    }

    /// Replace the visible rows, clamping the cursor.
    pub fn set_rows(&mut self, rows: Vec<Record>, tones: Vec<RowTone>) {
        self.rows = rows;
        self.tones = tones;
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
        self.scroll_offset = self.scroll_offset.min(self.cursor);
    }

    /// Reset for a new tab: columns, title, and cleared rows/selection.
    pub fn reset_for_tab(&mut self, title: String, columns: Vec<ColumnSpec>) {
        self.title = title;
        self.columns = columns;
        self.rows.clear();
        self.tones.clear();
        self.selection.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
        self.filter_active = false;
    }

    /// Get the record under the cursor.
    pub fn current_record(&self) -> Option<&Record> {
        self.rows.get(self.cursor)
    }

    /// Move cursor down.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
            self.ensure_cursor_visible();
        }
    }

    /// Move cursor up.
    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_cursor_visible();
        }
    }

    /// Move cursor to first row.
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Move cursor to last row.
    pub fn cursor_end(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = self.rows.len() - 1;
            self.ensure_cursor_visible();
        }
    }

    /// Page down.
    pub fn page_down(&mut self, page_size: usize) {
        let new_cursor = (self.cursor + page_size).min(self.rows.len().saturating_sub(1));
        self.cursor = new_cursor;
        self.ensure_cursor_visible();
    }

    /// Page up.
    pub fn page_up(&mut self, page_size: usize) {
        self.cursor = self.cursor.saturating_sub(page_size);
        self.ensure_cursor_visible();
    }

    /// Ensure cursor is visible within scroll view.
    fn ensure_cursor_visible(&mut self) {
        let visible = 20; // Assume typical visible rows
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible {
            self.scroll_offset = self.cursor - visible + 1;
        }
    }

    /// Toggle selection of the row under the cursor.
    pub fn toggle_selection(&mut self) {
        if !self.has_select() {
            return;
        }
        if let Some(record) = self.rows.get(self.cursor) {
            self.selection.toggle(record.id);
        }
    }

    /// Select all visible rows.
    pub fn select_all_visible(&mut self) {
        if !self.has_select() {
            return;
        }
        self.selection
            .select_all(self.rows.iter().map(|r| r.id));
    }

    /// Deselect all rows.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Selected record ids in deterministic order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.sorted_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnType, Value};

    fn sample_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::select(),
            ColumnSpec::new("ID", "id", ColumnType::Number),
            ColumnSpec::new("Name", "name", ColumnType::Text),
        ]
    }

    fn sample_rows() -> Vec<Record> {
        vec![
            Record::new(RecordId(1)).with_field("name", Value::from("Alice")),
            Record::new(RecordId(2)).with_field("name", Value::from("Bob")),
            Record::new(RecordId(3)).with_field("name", Value::from("Carol")),
        ]
    }

    fn sample_state() -> RecordTableState {
        let mut state = RecordTableState::new();
        state.reset_for_tab("Customers".into(), sample_columns());
        state.set_rows(sample_rows(), vec![RowTone::Normal; 3]);
        state
    }

    #[test]
    fn test_cursor_navigation() {
        let mut state = sample_state();
        assert_eq!(state.cursor, 0);

        state.cursor_down();
        assert_eq!(state.cursor, 1);

        state.cursor_end();
        assert_eq!(state.cursor, 2);

        // Cannot move past the end
        state.cursor_down();
        assert_eq!(state.cursor, 2);

        state.cursor_home();
        assert_eq!(state.cursor, 0);

        state.cursor_up();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_toggle_selection_uses_cursor_row() {
        let mut state = sample_state();
        state.cursor_down();
        state.toggle_selection();

        assert!(state.selection.contains(RecordId(2)));
        assert!(!state.selection.contains(RecordId(1)));

        state.toggle_selection();
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_select_all_covers_only_visible_rows() {
        let mut state = sample_state();
        // Simulate a filter hiding Bob
        state.filter_active = true;
        state.set_rows(
            vec![
                Record::new(RecordId(1)).with_field("name", Value::from("Alice")),
                Record::new(RecordId(3)).with_field("name", Value::from("Carol")),
            ],
            vec![RowTone::Normal; 2],
        );

        state.select_all_visible();
        assert_eq!(state.selected_ids(), vec![RecordId(1), RecordId(3)]);
    }

    #[test]
    fn test_selection_noop_without_checkbox_column() {
        let mut state = RecordTableState::new();
        state.reset_for_tab(
            "Audit Logs".into(),
            vec![ColumnSpec::new("User", "user", ColumnType::Text)],
        );
        state.set_rows(sample_rows(), vec![RowTone::Normal; 3]);

        state.toggle_selection();
        state.select_all_visible();
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_set_rows_clamps_cursor() {
        let mut state = sample_state();
        state.cursor_end();
        assert_eq!(state.cursor, 2);

        state.set_rows(
            vec![Record::new(RecordId(1)).with_field("name", Value::from("Alice"))],
            vec![RowTone::Normal],
        );
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_reset_for_tab_clears_selection() {
        let mut state = sample_state();
        state.toggle_selection();
        assert!(!state.selection.is_empty());

        state.reset_for_tab("Payments".into(), sample_columns());
        assert!(state.selection.is_empty());
        assert!(state.rows.is_empty());
        assert_eq!(state.cursor, 0);
    }
}
