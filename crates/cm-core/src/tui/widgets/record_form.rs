//! Record form widget.
//!
//! Modal form for creating and editing records, built from the active
//! tab's field specs. Uses ftui's Block and Paragraph for rendering.

use chrono::NaiveDate;
use ftui::text::{Line as FtuiLine, Span as FtuiSpan, Text as FtuiText};
use ftui::widgets::block::{Alignment as FtuiAlignment, Block as FtuiBlock};
use ftui::widgets::paragraph::Paragraph as FtuiParagraph;
use ftui::widgets::Widget as FtuiWidget;
use ftui::PackedRgba;
use ftui::Style as FtuiStyle;
use serde_json::{json, Map, Value as JsonValue};

use cm_common::RecordId;

use crate::registry::{FieldKind, ViewDescriptor};
use crate::table::{Record, Value};
use crate::tui::theme::Theme;

/// A form field with label, value, and kind.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Wire key sent to the server.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Field kind for validation and rendering.
    pub kind: FieldKind,
    /// Current value as string.
    pub value: String,
    /// Validation error message (if any).
    pub error: Option<String>,
}

impl FormField {
    fn validate(&mut self) {
        let value = self.value.trim();
        self.error = match self.kind {
            FieldKind::Number => {
                if value.is_empty() || value.parse::<f64>().is_ok() {
                    None
                } else {
                    Some("Invalid number".to_string())
                }
            }
            FieldKind::Date => {
                if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
                    None
                } else {
                    Some("Use YYYY-MM-DD".to_string())
                }
            }
            FieldKind::Select(options) => {
                if options.iter().any(|o| *o == value) {
                    None
                } else {
                    Some(format!("One of: {}", options.join(", ")))
                }
            }
            FieldKind::Text | FieldKind::Password => None,
        };
    }

    fn json_value(&self) -> JsonValue {
        let value = self.value.trim();
        if value.is_empty() {
            return JsonValue::Null;
        }
        match self.kind {
            FieldKind::Number => value
                .parse::<f64>()
                .map(|n| json!(n))
                .unwrap_or_else(|_| json!(value)),
            _ => json!(value),
        }
    }
}

/// Record form widget.
#[derive(Debug)]
pub struct RecordForm<'a> {
    /// Theme for styling.
    theme: Option<&'a Theme>,
}

impl<'a> Default for RecordForm<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RecordForm<'a> {
    /// Create a new record form.
    pub fn new() -> Self {
        Self { theme: None }
    }

    /// Set the theme.
    pub fn theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    // ── ftui style helpers ──────────────────────────────────────────

    fn border_ftui_style(&self) -> FtuiStyle {
        self.theme
            .map(|t| t.class("border.focused"))
            .unwrap_or_else(|| FtuiStyle::new().fg(PackedRgba::rgb(0, 255, 255)))
    }

    fn label_ftui_style(&self, is_cursor: bool) -> FtuiStyle {
        if is_cursor {
            self.theme
                .map(|t| t.class("table.header"))
                .unwrap_or_else(|| FtuiStyle::new().bold())
        } else {
            self.theme
                .map(|t| t.class("border.normal"))
                .unwrap_or_default()
        }
    }

    fn value_ftui_style(&self, field: &FormField) -> FtuiStyle {
        if field.error.is_some() {
            self.theme
                .map(|t| t.class("status.error"))
                .unwrap_or_else(|| FtuiStyle::new().fg(PackedRgba::rgb(255, 0, 0)))
        } else {
            FtuiStyle::default()
        }
    }

    fn error_ftui_style(&self) -> FtuiStyle {
        self.theme
            .map(|t| t.class("status.error"))
            .unwrap_or_else(|| FtuiStyle::new().fg(PackedRgba::rgb(255, 0, 0)))
    }

    fn muted_ftui_style(&self) -> FtuiStyle {
        self.theme
            .map(|t| t.class("status.warning"))
            .unwrap_or_else(|| FtuiStyle::new().fg(PackedRgba::rgb(128, 128, 128)))
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Render the form as a modal popup.
    pub fn render_view(
        &self,
        area: ftui::layout::Rect,
        frame: &mut ftui::render::frame::Frame,
        state: &RecordFormState,
    ) {
        let title = format!(" {} ", state.title);
        let block = FtuiBlock::bordered()
            .title(&title)
            .border_style(self.border_ftui_style());

        let inner = block.inner(area);
        FtuiWidget::render(&block, area, frame);

        if inner.width < 2 || inner.height == 0 {
            return;
        }

        if state.fields.is_empty() {
            let text: FtuiText = "No editable fields".into();
            let msg = FtuiParagraph::new(text)
                .style(self.muted_ftui_style())
                .alignment(FtuiAlignment::Center);
            FtuiWidget::render(&msg, inner, frame);
            return;
        }

        let mut lines: Vec<FtuiLine> = Vec::new();
        let max_visible = inner.height as usize;

        for (i, field) in state.fields.iter().enumerate() {
            if lines.len() >= max_visible.saturating_sub(1) {
                break;
            }

            let is_cursor = i == state.cursor;
            let label_style = self.label_ftui_style(is_cursor);
            let value_style = self.value_ftui_style(field);

            let shown = match field.kind {
                FieldKind::Password => "\u{2022}".repeat(field.value.chars().count()),
                FieldKind::Select(_) => format!("< {} >", field.value),
                _ => field.value.clone(),
            };
            let value_display = if is_cursor {
                format!("{}_", shown)
            } else {
                shown
            };

            lines.push(FtuiLine::from_spans([
                FtuiSpan::styled(field.label.clone(), label_style),
                FtuiSpan::styled(": ", label_style),
                FtuiSpan::styled(value_display, value_style),
            ]));
        }

        // Error line for the focused field
        if let Some(field) = state.fields.get(state.cursor) {
            if let Some(ref error) = field.error {
                if lines.len() < max_visible {
                    lines.push(FtuiLine::from_spans([FtuiSpan::styled(
                        error.clone(),
                        self.error_ftui_style(),
                    )]));
                }
            }
        }

        let text: FtuiText = lines.into_iter().collect();
        FtuiWidget::render(
            &FtuiParagraph::new(text).style(FtuiStyle::default()),
            inner,
            frame,
        );
    }
}

// ---------------------------------------------------------------------------
// RecordFormState
// ---------------------------------------------------------------------------

/// State for the record form widget.
#[derive(Debug)]
pub struct RecordFormState {
    /// Form title shown in the block border.
    pub title: String,
    /// Form fields built from the tab's field specs.
    pub fields: Vec<FormField>,
    /// Current cursor position.
    pub cursor: usize,
    /// Record being edited, `None` when creating.
    pub editing: Option<RecordId>,
}

impl RecordFormState {
    /// Build an empty create form from a tab descriptor.
    pub fn for_create(descriptor: &ViewDescriptor) -> Self {
        let fields = descriptor
            .fields
            .iter()
            .map(|spec| {
                let value = match spec.kind {
                    // Selects start on their first option so cycling works
                    FieldKind::Select(options) => {
                        options.first().copied().unwrap_or_default().to_string()
                    }
                    _ => String::new(),
                };
                FormField {
                    key: spec.name.to_string(),
                    label: spec.label.to_string(),
                    kind: spec.kind,
                    value,
                    error: None,
                }
            })
            .collect();

        Self {
            title: format!("New {}", descriptor.kind.singular()),
            fields,
            cursor: 0,
            editing: None,
        }
    }

    /// Build an edit form prefilled from an existing record.
    pub fn for_edit(descriptor: &ViewDescriptor, record: &Record) -> Self {
        let mut form = Self::for_create(descriptor);
        form.title = format!("Edit {} #{}", descriptor.kind.singular(), record.id);
        form.editing = Some(record.id);

        for field in &mut form.fields {
            match record.get(&field.key) {
                Value::Null => {}
                value => field.value = value.as_display().unwrap_or_default(),
            }
        }

        form
    }

    /// Move cursor to the next field.
    pub fn next_field(&mut self) {
        if self.cursor + 1 < self.fields.len() {
            self.cursor += 1;
        } else {
            self.cursor = 0;
        }
    }

    /// Move cursor to the previous field.
    pub fn prev_field(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else {
            self.cursor = self.fields.len().saturating_sub(1);
        }
    }

    /// Type a character into the focused field.
    ///
    /// Select fields only change through [`cycle_option`](Self::cycle_option).
    pub fn type_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if matches!(field.kind, FieldKind::Select(_)) {
                return;
            }
            field.value.push(ch);
            field.error = None;
        }
    }

    /// Delete the last character from the focused field.
    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if matches!(field.kind, FieldKind::Select(_)) {
                return;
            }
            field.value.pop();
            field.error = None;
        }
    }

    /// Cycle the focused select field to its next option.
    pub fn cycle_option(&mut self) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if let FieldKind::Select(options) = field.kind {
                if options.is_empty() {
                    return;
                }
                let current = options.iter().position(|o| *o == field.value);
                let next = match current {
                    Some(i) => (i + 1) % options.len(),
                    None => 0,
                };
                field.value = options[next].to_string();
                field.error = None;
            }
        }
    }

    /// Validate every field. Returns true when all fields are valid.
    pub fn validate(&mut self) -> bool {
        for field in &mut self.fields {
            field.validate();
        }
        // Jump the cursor to the first invalid field
        if let Some(pos) = self.fields.iter().position(|f| f.error.is_some()) {
            self.cursor = pos;
            return false;
        }
        true
    }

    /// Build the JSON payload sent to the server.
    pub fn payload(&self) -> JsonValue {
        let mut map = Map::new();
        for field in &self.fields {
            map.insert(field.key.clone(), field.json_value());
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::descriptor;
    use cm_api::EntityKind;

    #[test]
    fn test_create_form_starts_empty_except_selects() {
        let desc = descriptor(EntityKind::Niches);
        let form = RecordFormState::for_create(&desc);

        assert!(form.editing.is_none());
        assert!(form.title.starts_with("New "));
        for field in &form.fields {
            match field.kind {
                FieldKind::Select(options) => {
                    assert_eq!(field.value, options[0]);
                }
                _ => assert!(field.value.is_empty()),
            }
        }
    }

    #[test]
    fn test_edit_form_prefills_from_record() {
        let desc = descriptor(EntityKind::Customers);
        let record = Record::new(RecordId(7))
            .with_field("name", Value::from("Alice Santos"))
            .with_field("email", Value::from("alice@example.com"));

        let form = RecordFormState::for_edit(&desc, &record);
        assert_eq!(form.editing, Some(RecordId(7)));

        let name = form.fields.iter().find(|f| f.key == "name");
        assert_eq!(name.map(|f| f.value.as_str()), Some("Alice Santos"));
    }

    #[test]
    fn test_edit_form_leaves_absent_fields_empty() {
        let desc = descriptor(EntityKind::Customers);
        let record = Record::new(RecordId(8))
            .with_field("name", Value::from("Bob Reyes"))
            .with_field("email", Value::Null);

        let form = RecordFormState::for_edit(&desc, &record);
        let email = form.fields.iter().find(|f| f.key == "email");
        assert_eq!(email.map(|f| f.value.as_str()), Some(""));
    }

    #[test]
    fn test_field_cursor_wraps() {
        let desc = descriptor(EntityKind::Niches);
        let mut form = RecordFormState::for_create(&desc);
        let count = form.fields.len();

        for _ in 0..count {
            form.next_field();
        }
        assert_eq!(form.cursor, 0);

        form.prev_field();
        assert_eq!(form.cursor, count - 1);
    }

    #[test]
    fn test_number_validation() {
        let desc = descriptor(EntityKind::Niches);
        let mut form = RecordFormState::for_create(&desc);

        let idx = form
            .fields
            .iter()
            .position(|f| matches!(f.kind, FieldKind::Number))
            .unwrap();
        form.fields[idx].value = "not a number".into();

        assert!(!form.validate());
        assert_eq!(form.cursor, idx);
        assert!(form.fields[idx].error.is_some());

        form.fields[idx].value = "5000".into();
        assert!(form.validate());
    }

    #[test]
    fn test_date_validation() {
        let mut field = FormField {
            key: "deceased_date".into(),
            label: "Deceased Date".into(),
            kind: FieldKind::Date,
            value: "06/01/2024".into(),
            error: None,
        };
        field.validate();
        assert!(field.error.is_some());

        field.value = "2024-06-01".into();
        field.validate();
        assert!(field.error.is_none());

        // Empty dates are allowed; the server decides if they are required
        field.value.clear();
        field.validate();
        assert!(field.error.is_none());
    }

    #[test]
    fn test_select_cycles_and_rejects_typing() {
        let desc = descriptor(EntityKind::Niches);
        let mut form = RecordFormState::for_create(&desc);

        let idx = form
            .fields
            .iter()
            .position(|f| matches!(f.kind, FieldKind::Select(_)))
            .unwrap();
        form.cursor = idx;
        let first = form.fields[idx].value.clone();

        form.type_char('x');
        assert_eq!(form.fields[idx].value, first);

        form.cycle_option();
        assert_ne!(form.fields[idx].value, first);
    }

    #[test]
    fn test_payload_types() {
        let desc = descriptor(EntityKind::Niches);
        let mut form = RecordFormState::for_create(&desc);

        for field in &mut form.fields {
            match field.kind {
                FieldKind::Number => field.value = "5000".into(),
                FieldKind::Date => field.value = "2024-06-01".into(),
                FieldKind::Select(_) => {}
                _ => field.value = "Block A".into(),
            }
        }

        let payload = form.payload();
        let obj = payload.as_object().unwrap();
        assert!(obj.values().any(|v| v.is_number()));
        assert!(obj.values().any(|v| v.is_string()));
    }

    #[test]
    fn test_empty_optional_fields_serialize_as_null() {
        let desc = descriptor(EntityKind::Customers);
        let form = RecordFormState::for_create(&desc);

        let payload = form.payload();
        let obj = payload.as_object().unwrap();
        assert!(obj.values().any(|v| v.is_null()));
    }
}
