//! Main TUI application state and update loop.
//!
//! Manages the overall application state, terminal setup/teardown,
//! and the main render/event loop.
//!
//! ## ftui Model Contract
//!
//! `App` implements `ftui::Model`:
//! - `init()` initializes model state (and may return a startup `Cmd`)
//! - `update(msg)` applies a single `Msg` and may return a `Cmd`
//! - `view(frame)` renders state into a frame (pure w.r.t. input state)
//! - `subscriptions()` registers periodic ticks and other streams
//!
//! Async work (tab loads, saves, deletes) is injected via closures and
//! executed via `Cmd::task`, returning completion messages back into
//! `update()`. Every completion is tagged with the tab it was issued for,
//! so results that arrive after a tab switch are discarded instead of
//! populating the wrong table.

use std::sync::Arc;
use std::time::Duration;

use ftui::layout::Rect;
use ftui::runtime::{Every, Subscription};
use ftui::text::{Line as FtuiLine, Span as FtuiSpan, Text as FtuiText};
use ftui::widgets::notification_queue::{NotificationQueue, NotificationStack, QueueConfig};
use ftui::widgets::paragraph::Paragraph as FtuiParagraph;
use ftui::widgets::toast::{Toast, ToastIcon, ToastPosition, ToastStyle};
use ftui::widgets::Widget;
use ftui::{
    Cell as FtuiCell, Cmd as FtuiCmd, Frame as FtuiFrame, KeyCode as FtuiKeyCode,
    KeyEvent as FtuiKeyEvent, KeyEventKind as FtuiKeyEventKind, Model as FtuiModel,
    Modifiers as FtuiModifiers, Program, ProgramConfig,
};
use serde_json::Value as JsonValue;

use cm_api::entity::{EntityKind, ALL_KINDS};
use cm_common::RecordId;

use super::events::KeyBindings;
use super::layout::{Breakpoint, LayoutState, ResponsiveLayout};
use super::msg::{Msg, MutationOutcome};
use super::theme::Theme;
use super::widgets::{
    ConfirmChoice, ConfirmDialog, ConfirmDialogState, FormField, HelpOverlay, RecordForm,
    RecordFormState, RecordTable, RecordTableState, SearchInput, SearchInputState, StatusBar,
    StatusMode,
};
use super::{TuiError, TuiResult};
use crate::registry::{descriptor, FieldKind, RowTone, ViewDescriptor};
use crate::table::{filter_records, filterable_columns, ColumnFilter, QueryState, Record};

/// Focus targets in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// Search input field.
    Search,
    /// Record table.
    Table,
}

/// Current application state/mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Normal browsing mode.
    #[default]
    Normal,
    /// Search input is active.
    Searching,
    /// Confirmation dialog is visible.
    Confirming,
    /// Create/edit form is open.
    Editing,
    /// Help overlay is visible.
    Help,
    /// Application is quitting.
    Quitting,
}

type LoadOp = Arc<dyn Fn(EntityKind) -> Result<Vec<Record>, String> + Send + Sync>;
type SaveOp =
    Arc<dyn Fn(EntityKind, Option<RecordId>, JsonValue) -> Result<MutationOutcome, String> + Send + Sync>;
type DeleteOp =
    Arc<dyn Fn(EntityKind, Vec<RecordId>) -> Result<MutationOutcome, String> + Send + Sync>;

/// Main TUI application.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Theme for styling.
    pub theme: Theme,
    /// Key bindings configuration.
    pub key_bindings: KeyBindings,
    /// Current focus target.
    focus: FocusTarget,
    /// Active tab.
    active: EntityKind,
    /// Descriptor for the active tab.
    view: ViewDescriptor,
    /// Full dataset for the active tab, unfiltered.
    records: Vec<Record>,
    /// Column scope for the search query.
    filter_column: ColumnFilter,
    /// Search input state.
    pub search: SearchInputState,
    /// Record table state (visible rows only).
    pub table: RecordTableState,
    /// Confirmation dialog state.
    pub confirm_dialog: ConfirmDialogState,
    /// Open create/edit form, if any.
    pub form: Option<RecordFormState>,
    /// Status message to display.
    status_message: Option<String>,
    /// Style class for the status message.
    status_class: &'static str,
    /// Whether a server request is in flight.
    loading: bool,
    /// Responsive layout state for tracking breakpoint changes.
    layout_state: LayoutState,
    /// Injected tab load operation for ftui Cmd::task (Send + 'static).
    load_op: Option<LoadOp>,
    /// Injected create/edit operation for ftui Cmd::task.
    save_op: Option<SaveOp>,
    /// Injected delete operation for ftui Cmd::task.
    delete_op: Option<DeleteOp>,
    /// Toast notification queue for async operation feedback.
    notifications: NotificationQueue,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application instance on the first tab.
    pub fn new() -> Self {
        let active = EntityKind::Customers;
        let view = descriptor(active);
        let mut table = RecordTableState::new();
        table.reset_for_tab(view.title().to_string(), view.columns.clone());
        table.focused = true; // Start with the table focused

        Self {
            state: AppState::Normal,
            theme: Theme::default(),
            key_bindings: KeyBindings::default(),
            focus: FocusTarget::Table,
            active,
            view,
            records: Vec::new(),
            filter_column: ColumnFilter::All,
            search: SearchInputState::new(),
            table,
            confirm_dialog: ConfirmDialogState::new(),
            form: None,
            status_message: None,
            status_class: "status.success",
            loading: false,
            // Initialize with reasonable defaults; updated on first render
            layout_state: LayoutState::new(80, 24),
            load_op: None,
            save_op: None,
            delete_op: None,
            notifications: NotificationQueue::new(QueueConfig {
                max_visible: 3,
                max_queued: 10,
                default_duration: Duration::from_secs(5),
                position: ToastPosition::TopRight,
                stagger_offset: 1,
                dedup_window_ms: 1000,
            }),
        }
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set custom key bindings.
    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    /// Set the async tab load operation for ftui Cmd::task.
    pub fn set_load_op(&mut self, op: LoadOp) {
        self.load_op = Some(op);
    }

    /// Set the async create/edit operation for ftui Cmd::task.
    pub fn set_save_op(&mut self, op: SaveOp) {
        self.save_op = Some(op);
    }

    /// Set the async delete operation for ftui Cmd::task.
    pub fn set_delete_op(&mut self, op: DeleteOp) {
        self.delete_op = Some(op);
    }

    /// Get the active tab.
    pub fn active_tab(&self) -> EntityKind {
        self.active
    }

    /// Get the current layout breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.layout_state.breakpoint()
    }

    /// Update layout state for new terminal size.
    /// Returns true if breakpoint changed.
    pub fn update_layout(&mut self, width: u16, height: u16) -> bool {
        self.layout_state.update(width, height)
    }

    /// Set a status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_class = "status.success";
    }

    /// Set an error status message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_class = "status.error";
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Push a toast notification for transient user feedback.
    fn push_toast(&mut self, message: impl Into<String>, icon: ToastIcon, style: ToastStyle) {
        let toast = Toast::new(message)
            .icon(icon)
            .style_variant(style)
            .duration(Duration::from_secs(4));
        self.notifications.notify(toast);
    }

    /// Update focus state on widgets.
    fn update_focus(&mut self) {
        self.search.focused = self.focus == FocusTarget::Search;
        self.table.focused = self.focus == FocusTarget::Table;
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state == AppState::Quitting
    }

    // ── Tab management ────────────────────────────────────────────────

    /// Switch to a tab: clear search, selection, and rows, then load.
    ///
    /// The table stays empty until the load for this tab completes, so a
    /// slow response for the previous tab can never show up here.
    fn switch_tab(&mut self, kind: EntityKind) -> FtuiCmd<Msg> {
        tracing::info!(target: "tui.tabs", tab = %kind, "Switching tab");
        self.active = kind;
        self.view = descriptor(kind);
        self.records.clear();
        self.filter_column = ColumnFilter::All;
        self.search.clear();
        self.table
            .reset_for_tab(self.view.title().to_string(), self.view.columns.clone());
        self.clear_status();
        self.spawn_load()
    }

    fn neighbor_tab(&self, offset: isize) -> EntityKind {
        let pos = ALL_KINDS
            .iter()
            .position(|k| *k == self.active)
            .unwrap_or(0) as isize;
        let len = ALL_KINDS.len() as isize;
        let next = (pos + offset).rem_euclid(len);
        ALL_KINDS[next as usize]
    }

    /// Start an async load of the active tab.
    fn spawn_load(&mut self) -> FtuiCmd<Msg> {
        let kind = self.active;
        self.loading = true;
        if let Some(load) = self.load_op.clone() {
            FtuiCmd::task_named("load-tab", move || Msg::LoadComplete(kind, load(kind)))
        } else {
            self.loading = false;
            self.set_status(format!("{}: no data source wired", kind.title()));
            FtuiCmd::none()
        }
    }

    // ── Filtering ─────────────────────────────────────────────────────

    fn query(&self) -> QueryState {
        QueryState {
            text: self.search.value().to_string(),
            column: self.filter_column.clone(),
        }
    }

    /// Re-filter the dataset into the table, recomputing row tones.
    fn apply_filter(&mut self) {
        let query = self.query();
        let visible = filter_records(&self.records, &self.view.columns, &query);
        let tones: Vec<RowTone> = match self.view.tone {
            Some(tone) => visible.iter().map(tone).collect(),
            None => vec![RowTone::Normal; visible.len()],
        };
        self.table.filter_active = !query.is_empty();
        self.table.set_rows(visible, tones);
    }

    /// Cycle the column filter scope: all columns, then each filterable
    /// column in order, then back to all.
    fn cycle_column_filter(&mut self) {
        let keys: Vec<String> = filterable_columns(&self.view.columns)
            .iter()
            .map(|c| c.key.clone())
            .collect();
        if keys.is_empty() {
            return;
        }

        self.filter_column = match &self.filter_column {
            ColumnFilter::All => ColumnFilter::Key(keys[0].clone()),
            ColumnFilter::Key(current) => match keys.iter().position(|k| k == current) {
                Some(i) if i + 1 < keys.len() => ColumnFilter::Key(keys[i + 1].clone()),
                _ => ColumnFilter::All,
            },
        };
        self.apply_filter();
    }

    /// Label for the current filter scope, shown in the search title.
    fn scope_label(&self) -> Option<String> {
        match &self.filter_column {
            ColumnFilter::All => None,
            ColumnFilter::Key(key) => self
                .view
                .columns
                .iter()
                .find(|c| &c.key == key)
                .map(|c| c.label.clone()),
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────

    fn open_create_form(&mut self) {
        if !self.active.is_mutable() {
            self.set_error(format!("{} is read-only", self.view.title()));
            return;
        }
        self.form = Some(RecordFormState::for_create(&self.view));
        self.state = AppState::Editing;
    }

    fn open_edit_form(&mut self) {
        if !self.active.is_mutable() {
            self.set_error(format!("{} is read-only", self.view.title()));
            return;
        }
        match self.table.current_record() {
            Some(record) => {
                self.form = Some(RecordFormState::for_edit(&self.view, record));
                self.state = AppState::Editing;
            }
            None => self.set_error("No record highlighted"),
        }
    }

    fn submit_form(&mut self) -> FtuiCmd<Msg> {
        let Some(form) = self.form.as_mut() else {
            return FtuiCmd::none();
        };
        if !form.validate() {
            return FtuiCmd::none();
        }

        let kind = self.active;
        let editing = form.editing;
        let payload = form.payload();
        self.form = None;
        self.state = AppState::Normal;
        self.loading = true;

        tracing::info!(
            target: "tui.mutation",
            tab = %kind,
            editing = ?editing,
            "Submitting form"
        );

        if let Some(save) = self.save_op.clone() {
            FtuiCmd::task_named("save-record", move || {
                Msg::MutationComplete(kind, save(kind, editing, payload))
            })
        } else {
            self.loading = false;
            self.set_error("Saving is not wired");
            FtuiCmd::none()
        }
    }

    fn request_delete(&mut self) {
        if !self.active.is_mutable() {
            self.set_error(format!("{} is read-only", self.view.title()));
            return;
        }
        let count = self.table.selection.len();
        if count == 0 {
            self.set_error("No records selected");
            return;
        }
        self.confirm_dialog.show();
        self.state = AppState::Confirming;
    }

    fn spawn_delete(&mut self) -> FtuiCmd<Msg> {
        let kind = self.active;
        let ids = self.table.selected_ids();
        self.loading = true;

        tracing::info!(
            target: "tui.mutation",
            tab = %kind,
            count = ids.len(),
            "Deleting records"
        );

        if let Some(delete) = self.delete_op.clone() {
            let task_ids = ids.clone();
            FtuiCmd::task_named("delete-records", move || {
                Msg::DeleteComplete(kind, task_ids.clone(), delete(kind, task_ids.clone()))
            })
        } else {
            self.loading = false;
            self.set_error("Deletion is not wired");
            FtuiCmd::none()
        }
    }

    // ── Message handling ──────────────────────────────────────────────

    fn handle_msg(&mut self, msg: Msg) -> FtuiCmd<Msg> {
        match msg {
            Msg::KeyPressed(key) => self.handle_key_event(key),
            Msg::Resized { width, height } => {
                let from_breakpoint = self.layout_state.breakpoint();
                self.update_layout(width, height);
                tracing::debug!(
                    target: "tui.state_transition",
                    ?from_breakpoint,
                    to_breakpoint = ?self.layout_state.breakpoint(),
                    width,
                    height,
                    "Terminal resized"
                );
                FtuiCmd::none()
            }
            Msg::Tick => {
                let _ = self.notifications.tick(Duration::from_secs(5));
                FtuiCmd::none()
            }
            Msg::FocusChanged(_) => FtuiCmd::none(),
            Msg::PasteReceived { text, .. } => {
                self.search.set_value(&text);
                self.state = AppState::Searching;
                self.focus = FocusTarget::Search;
                self.update_focus();
                self.apply_filter();
                FtuiCmd::none()
            }
            Msg::Noop => FtuiCmd::none(),

            Msg::CursorUp => {
                self.table.cursor_up();
                FtuiCmd::none()
            }
            Msg::CursorDown => {
                self.table.cursor_down();
                FtuiCmd::none()
            }
            Msg::CursorHome => {
                self.table.cursor_home();
                FtuiCmd::none()
            }
            Msg::CursorEnd => {
                self.table.cursor_end();
                FtuiCmd::none()
            }
            Msg::PageUp => {
                self.table.page_up(10);
                FtuiCmd::none()
            }
            Msg::PageDown => {
                self.table.page_down(10);
                FtuiCmd::none()
            }

            Msg::NextTab => {
                let next = self.neighbor_tab(1);
                self.switch_tab(next)
            }
            Msg::PrevTab => {
                let prev = self.neighbor_tab(-1);
                self.switch_tab(prev)
            }
            Msg::SwitchTab(kind) => {
                if kind == self.active {
                    FtuiCmd::none()
                } else {
                    self.switch_tab(kind)
                }
            }

            Msg::ToggleSelection => {
                self.table.toggle_selection();
                FtuiCmd::none()
            }
            Msg::SelectAllVisible => {
                self.table.select_all_visible();
                FtuiCmd::none()
            }
            Msg::DeselectAll => {
                self.table.deselect_all();
                FtuiCmd::none()
            }

            Msg::EnterSearchMode => {
                self.state = AppState::Searching;
                self.focus = FocusTarget::Search;
                self.update_focus();
                FtuiCmd::none()
            }
            Msg::SearchInput(c) => {
                self.search.type_char(c);
                self.apply_filter();
                FtuiCmd::none()
            }
            Msg::SearchBackspace => {
                self.search.backspace();
                self.apply_filter();
                FtuiCmd::none()
            }
            Msg::SearchCommit => {
                self.search.commit();
                self.apply_filter();
                self.state = AppState::Normal;
                self.focus = FocusTarget::Table;
                self.update_focus();
                FtuiCmd::none()
            }
            Msg::SearchCancel => {
                self.search.clear();
                self.apply_filter();
                self.state = AppState::Normal;
                self.focus = FocusTarget::Table;
                self.update_focus();
                FtuiCmd::none()
            }
            Msg::CycleColumnFilter => {
                self.cycle_column_filter();
                FtuiCmd::none()
            }

            Msg::OpenCreateForm => {
                self.open_create_form();
                FtuiCmd::none()
            }
            Msg::OpenEditForm => {
                self.open_edit_form();
                FtuiCmd::none()
            }
            Msg::FormInput(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.type_char(c);
                }
                FtuiCmd::none()
            }
            Msg::FormBackspace => {
                if let Some(form) = self.form.as_mut() {
                    form.backspace();
                }
                FtuiCmd::none()
            }
            Msg::FormNextField => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
                FtuiCmd::none()
            }
            Msg::FormPrevField => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
                FtuiCmd::none()
            }
            Msg::FormCycleOption => {
                if let Some(form) = self.form.as_mut() {
                    form.cycle_option();
                }
                FtuiCmd::none()
            }
            Msg::FormSubmit => self.submit_form(),
            Msg::FormCancel => {
                self.form = None;
                self.state = AppState::Normal;
                FtuiCmd::none()
            }

            Msg::RequestDelete => {
                self.request_delete();
                FtuiCmd::none()
            }
            Msg::ConfirmDelete => self.spawn_delete(),
            Msg::CancelDelete => {
                self.confirm_dialog.cancel();
                self.state = AppState::Normal;
                FtuiCmd::none()
            }
            Msg::RequestRefresh => {
                tracing::info!(target: "tui.user_input", action = "refresh", tab = %self.active);
                self.spawn_load()
            }
            Msg::ToggleHelp => {
                self.state = if self.state == AppState::Help {
                    AppState::Normal
                } else {
                    AppState::Help
                };
                FtuiCmd::none()
            }

            Msg::LoadComplete(kind, result) => self.handle_load_complete(kind, result),
            Msg::MutationComplete(kind, result) => self.handle_mutation_complete(kind, result),
            Msg::DeleteComplete(kind, ids, result) => {
                self.handle_delete_complete(kind, ids, result)
            }

            Msg::Quit => {
                self.state = AppState::Quitting;
                FtuiCmd::quit()
            }
        }
    }

    fn handle_load_complete(
        &mut self,
        kind: EntityKind,
        result: Result<Vec<Record>, String>,
    ) -> FtuiCmd<Msg> {
        if kind != self.active {
            // Stale response from a previous tab; discard it.
            tracing::debug!(target: "tui.async_complete", stale = %kind, active = %self.active, "Dropping stale load");
            return FtuiCmd::none();
        }
        self.loading = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.apply_filter();
                self.clear_status();
                tracing::debug!(target: "tui.async_complete", tab = %kind, count, "Tab loaded");
            }
            Err(error) => {
                tracing::error!(target: "tui.async_complete", tab = %kind, error = %error, "Load failed");
                self.set_error(format!("Load failed: {}", error));
                self.push_toast(
                    format!("Load failed: {}", error),
                    ToastIcon::Error,
                    ToastStyle::Error,
                );
            }
        }
        FtuiCmd::none()
    }

    fn handle_mutation_complete(
        &mut self,
        kind: EntityKind,
        result: Result<MutationOutcome, String>,
    ) -> FtuiCmd<Msg> {
        if kind != self.active {
            tracing::debug!(target: "tui.async_complete", stale = %kind, "Dropping stale mutation result");
            return FtuiCmd::none();
        }
        self.loading = false;
        match result {
            Ok(outcome) => {
                let status = format!("{} {}", kind.singular(), outcome.verb);
                self.set_status(status.clone());
                self.push_toast(status, ToastIcon::Success, ToastStyle::Success);
                // Reload so the new server state is visible
                self.spawn_load()
            }
            Err(error) => {
                tracing::error!(target: "tui.async_complete", tab = %kind, error = %error, "Save failed");
                self.set_error(format!("Save failed: {}", error));
                self.push_toast(
                    format!("Save failed: {}", error),
                    ToastIcon::Error,
                    ToastStyle::Error,
                );
                FtuiCmd::none()
            }
        }
    }

    fn handle_delete_complete(
        &mut self,
        kind: EntityKind,
        ids: Vec<RecordId>,
        result: Result<MutationOutcome, String>,
    ) -> FtuiCmd<Msg> {
        if kind != self.active {
            tracing::debug!(target: "tui.async_complete", stale = %kind, "Dropping stale delete result");
            return FtuiCmd::none();
        }
        self.loading = false;
        match result {
            Ok(outcome) => {
                self.table.deselect_all();
                let status = format!("Deleted {} record(s)", outcome.affected.max(ids.len()));
                self.set_status(status.clone());
                self.push_toast(status, ToastIcon::Success, ToastStyle::Success);
                self.spawn_load()
            }
            Err(error) => {
                tracing::error!(target: "tui.async_complete", tab = %kind, error = %error, "Delete failed");
                self.set_error(format!("Delete failed: {}", error));
                self.push_toast(
                    format!("Delete failed: {}", error),
                    ToastIcon::Error,
                    ToastStyle::Error,
                );
                FtuiCmd::none()
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        if !matches!(key.kind, FtuiKeyEventKind::Press | FtuiKeyEventKind::Repeat) {
            return FtuiCmd::none();
        }

        tracing::debug!(
            target: "tui.user_input",
            key_code = ?key.code,
            modifiers = ?key.modifiers,
            app_state = ?self.state,
            "Key event received"
        );

        match self.state {
            AppState::Normal => self.handle_normal_key(key),
            AppState::Searching => self.handle_search_key(key),
            AppState::Confirming => self.handle_confirm_key(key),
            AppState::Editing => self.handle_form_key(key),
            AppState::Help => self.handle_help_key(key),
            AppState::Quitting => FtuiCmd::quit(),
        }
    }

    fn handle_normal_key(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        if self.key_bindings.is_quit(&key) {
            tracing::info!(target: "tui.user_input", action = "quit", "Quit requested");
            self.state = AppState::Quitting;
            return FtuiCmd::quit();
        }
        if self.key_bindings.is_help(&key) {
            self.state = AppState::Help;
            return FtuiCmd::none();
        }
        if self.key_bindings.is_search(&key) {
            return FtuiCmd::msg(Msg::EnterSearchMode);
        }
        if self.key_bindings.is_next(&key) {
            self.table.cursor_down();
            return FtuiCmd::none();
        }
        if self.key_bindings.is_prev(&key) {
            self.table.cursor_up();
            return FtuiCmd::none();
        }
        if self.key_bindings.is_toggle(&key) {
            self.table.toggle_selection();
            return FtuiCmd::none();
        }
        if self.key_bindings.is_select_all(&key) {
            self.table.select_all_visible();
            return FtuiCmd::none();
        }
        if self.key_bindings.is_deselect_all(&key) {
            self.table.deselect_all();
            return FtuiCmd::none();
        }
        if self.key_bindings.is_create(&key) {
            return FtuiCmd::msg(Msg::OpenCreateForm);
        }
        if self.key_bindings.is_edit(&key) {
            return FtuiCmd::msg(Msg::OpenEditForm);
        }
        if self.key_bindings.is_delete(&key) {
            return FtuiCmd::msg(Msg::RequestDelete);
        }
        if self.key_bindings.is_refresh(&key) {
            return FtuiCmd::msg(Msg::RequestRefresh);
        }
        if self.key_bindings.is_cycle_filter(&key) {
            return FtuiCmd::msg(Msg::CycleColumnFilter);
        }
        if self.key_bindings.is_next_tab(&key) {
            return FtuiCmd::msg(Msg::NextTab);
        }
        if self.key_bindings.is_prev_tab(&key) {
            return FtuiCmd::msg(Msg::PrevTab);
        }

        match key.code {
            FtuiKeyCode::Home => self.table.cursor_home(),
            FtuiKeyCode::End => self.table.cursor_end(),
            FtuiKeyCode::PageDown => self.table.page_down(10),
            FtuiKeyCode::PageUp => self.table.page_up(10),
            FtuiKeyCode::Char('d') if key.modifiers.contains(FtuiModifiers::CTRL) => {
                self.table.page_down(10)
            }
            FtuiKeyCode::Char('u') if key.modifiers.contains(FtuiModifiers::CTRL) => {
                self.table.page_up(10)
            }
            FtuiKeyCode::Escape => {
                if self.table.filter_active {
                    return FtuiCmd::msg(Msg::SearchCancel);
                }
            }
            _ => {}
        }
        FtuiCmd::none()
    }

    fn handle_search_key(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        match key.code {
            FtuiKeyCode::Escape => return FtuiCmd::msg(Msg::SearchCancel),
            FtuiKeyCode::Enter => return FtuiCmd::msg(Msg::SearchCommit),
            FtuiKeyCode::Char('f') if key.modifiers.contains(FtuiModifiers::CTRL) => {
                return FtuiCmd::msg(Msg::CycleColumnFilter)
            }
            FtuiKeyCode::Up => self.search.history_prev(),
            FtuiKeyCode::Down => self.search.history_next(),
            FtuiKeyCode::Backspace => return FtuiCmd::msg(Msg::SearchBackspace),
            FtuiKeyCode::Char(c) => return FtuiCmd::msg(Msg::SearchInput(c)),
            _ => {}
        }
        FtuiCmd::none()
    }

    fn handle_confirm_key(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        match key.code {
            FtuiKeyCode::Left | FtuiKeyCode::Char('h') => self.confirm_dialog.select_left(),
            FtuiKeyCode::Right | FtuiKeyCode::Char('l') => self.confirm_dialog.select_right(),
            FtuiKeyCode::Tab => self.confirm_dialog.toggle(),
            FtuiKeyCode::Enter => {
                let choice = self.confirm_dialog.confirm();
                self.state = AppState::Normal;
                if choice == ConfirmChoice::Yes {
                    return FtuiCmd::msg(Msg::ConfirmDelete);
                }
            }
            FtuiKeyCode::Escape => {
                self.confirm_dialog.cancel();
                self.state = AppState::Normal;
            }
            _ => {}
        }
        FtuiCmd::none()
    }

    fn handle_form_key(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        match key.code {
            FtuiKeyCode::Escape => return FtuiCmd::msg(Msg::FormCancel),
            FtuiKeyCode::Enter => return FtuiCmd::msg(Msg::FormSubmit),
            FtuiKeyCode::Tab | FtuiKeyCode::Down => return FtuiCmd::msg(Msg::FormNextField),
            FtuiKeyCode::BackTab | FtuiKeyCode::Up => return FtuiCmd::msg(Msg::FormPrevField),
            FtuiKeyCode::Left | FtuiKeyCode::Right => {
                if self.focused_field_is_select() {
                    return FtuiCmd::msg(Msg::FormCycleOption);
                }
            }
            FtuiKeyCode::Backspace => return FtuiCmd::msg(Msg::FormBackspace),
            FtuiKeyCode::Char(' ') if self.focused_field_is_select() => {
                return FtuiCmd::msg(Msg::FormCycleOption)
            }
            FtuiKeyCode::Char(c) => return FtuiCmd::msg(Msg::FormInput(c)),
            _ => {}
        }
        FtuiCmd::none()
    }

    fn focused_field_is_select(&self) -> bool {
        self.form
            .as_ref()
            .and_then(|form| form.fields.get(form.cursor))
            .map(|field: &FormField| matches!(field.kind, FieldKind::Select(_)))
            .unwrap_or(false)
    }

    fn handle_help_key(&mut self, key: FtuiKeyEvent) -> FtuiCmd<Msg> {
        if matches!(
            key.code,
            FtuiKeyCode::Escape | FtuiKeyCode::Char('q') | FtuiKeyCode::Char('?')
        ) {
            self.state = AppState::Normal;
        }
        FtuiCmd::none()
    }

    // ── Rendering helpers ─────────────────────────────────────────────

    fn render_tab_strip(&self, area: Rect, frame: &mut FtuiFrame) {
        let active_style = self.theme.class("table.selected");
        let normal_style = self.theme.class("border.normal");

        let mut spans = Vec::new();
        for kind in ALL_KINDS {
            let style = if *kind == self.active {
                active_style
            } else {
                normal_style
            };
            spans.push(FtuiSpan::styled(format!(" {} ", kind.title()), style));
            spans.push(FtuiSpan::styled(" ".to_string(), normal_style));
        }

        let text = FtuiText::from_line(FtuiLine::from_spans(spans));
        Widget::render(&FtuiParagraph::new(text), area, frame);
    }
}

impl FtuiModel for App {
    type Message = Msg;

    fn init(&mut self) -> FtuiCmd<Self::Message> {
        tracing::info!(
            target: "tui.startup",
            terminal_size = ?self.layout_state.size(),
            theme = ?self.theme.mode,
            tab = %self.active,
            "TUI model initialized"
        );
        self.spawn_load()
    }

    fn update(&mut self, msg: Self::Message) -> FtuiCmd<Self::Message> {
        self.handle_msg(msg)
    }

    fn view(&self, frame: &mut FtuiFrame) {
        let full_area = Rect::new(0, 0, frame.width(), frame.height());
        let layout = ResponsiveLayout::new(full_area);

        // Degrade gracefully for tiny terminals
        if layout.is_too_small() {
            draw_ftui_text(frame, 0, 0, "Terminal too small (min 40x10)");
            return;
        }

        let areas = layout.main_areas();

        // ── Tab strip ──────────────────────────────────────────────────
        self.render_tab_strip(areas.tabs, frame);

        // ── Search input ───────────────────────────────────────────────
        let scope = self.scope_label();
        let placeholder = match &scope {
            Some(label) => format!("Search {}...", label.to_lowercase()),
            None => format!("Search {}...", self.view.title().to_lowercase()),
        };
        SearchInput::new()
            .theme(&self.theme)
            .placeholder(&placeholder)
            .scope(scope.as_deref())
            .render_view(areas.search, frame, &self.search);

        // ── Record table ───────────────────────────────────────────────
        RecordTable::new()
            .theme(&self.theme)
            .render_view(areas.table, frame, &self.table);

        // ── Status bar ─────────────────────────────────────────────────
        let status_mode = match self.state {
            AppState::Normal | AppState::Quitting => StatusMode::Normal,
            AppState::Searching => StatusMode::Searching,
            AppState::Confirming => StatusMode::Confirming,
            AppState::Editing => StatusMode::Editing,
            AppState::Help => StatusMode::Help,
        };
        let filter_text = self.search.value().to_string();
        let mut status_bar = StatusBar::new()
            .theme(&self.theme)
            .mode(status_mode)
            .tab(self.view.title())
            .selected_count(self.table.selection.len())
            .loading(self.loading);
        if !filter_text.is_empty() {
            status_bar = status_bar.filter(&filter_text);
        }
        if let Some(ref msg) = self.status_message {
            status_bar = status_bar.message(msg, self.status_class);
        }
        status_bar.render_view(areas.status, frame);

        // ── Overlays (rendered on top of everything) ───────────────────

        if self.state == AppState::Help {
            HelpOverlay::new()
                .theme(&self.theme)
                .breakpoint(layout.breakpoint())
                .render_view(full_area, frame);
        }

        if self.state == AppState::Editing {
            if let Some(ref form) = self.form {
                let popup_area = layout.popup_area(60, 70);
                RecordForm::new()
                    .theme(&self.theme)
                    .render_view(popup_area, frame, form);
            }
        }

        if self.state == AppState::Confirming {
            let popup_area = layout.popup_area(50, 30);
            let msg = format!(
                "Delete {} selected record(s) from {}? This cannot be undone.",
                self.table.selection.len(),
                self.view.title()
            );
            ConfirmDialog::new()
                .theme(&self.theme)
                .title("Confirm Deletion")
                .message(&msg)
                .render_view(popup_area, frame, &self.confirm_dialog);
        }

        // Toast notifications (top-right overlay)
        if !self.notifications.is_empty() {
            NotificationStack::new(&self.notifications).render(full_area, frame);
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        vec![Box::new(Every::with_id(
            0x434d_5449_434b,
            Duration::from_secs(5),
            || Msg::Tick,
        ))]
    }
}

fn draw_ftui_text(frame: &mut FtuiFrame, x: u16, y: u16, text: &str) {
    if y >= frame.height() || x >= frame.width() {
        return;
    }

    let mut col = x;
    let max_col = frame.width();
    for ch in text.chars() {
        if col >= max_col {
            break;
        }
        frame.buffer.set(col, y, FtuiCell::from_char(ch));
        col = col.saturating_add(1);
    }
}

/// Run the TUI using the ftui runtime.
///
/// Delegates terminal setup, event polling, and teardown entirely to
/// ftui's `Program` runtime. The `App` model drives the Elm-style
/// init → update → view loop; server calls are wired through `Cmd::task`
/// closures set with `set_load_op`/`set_save_op`/`set_delete_op`.
pub fn run_tui(app: App, config: ProgramConfig) -> TuiResult<()> {
    let mut program =
        Program::with_config(app, config).map_err(|e| TuiError::TerminalInit(e.to_string()))?;
    program
        .run()
        .map_err(|e| TuiError::TerminalInit(e.to_string()))
}
