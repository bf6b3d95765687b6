// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Wires the outline tree, the search footer, the dialogs and the source pane to crossterm key
//! events. Every user action goes through the navigation/edit layers and posts one log record.

use std::{
    collections::{BTreeSet, VecDeque},
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendEvent, LogAction, LogIdentity, LogRecord};
use crate::model::{Judgment, NodeId, Session};
use crate::nav::{
    back, callee_choice, change_data_source, clear_search, collapse_all, confirm_callee_jump,
    expand_all, expand_loops, jump_next, jump_prev, jump_to_comments, jump_to_targets, on_ready,
    plan_expand_all, search, CalleeChoice, DataSource, Debouncer, ExpandPlan, Finalized, LoopFlag,
    SearchOutcome, SEARCH_DEBOUNCE,
};
use crate::ops::{apply_edit, EditOp};
use crate::query::{
    list_comments, progress, visible_rows, CommentEntry, VisibleRow, MAX_COMMENT_LIST_SIZE,
};
use crate::render::{render_text_tree, texttree_url, truncate_with_ellipsis};
use crate::viewer::{LinkContext, MarkAction, SourceRequest, SourceView, SOURCE_PANE_HEIGHT_PERCENT};

mod theme;

use theme::OutlineTheme;

const FOCUS_COLOR: Color = Color::LightGreen;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "EBT";
const TOAST_TTL: Duration = Duration::from_secs(2);
const TICK: Duration = Duration::from_millis(250);

/// Everything the TUI needs besides the session.
pub struct AppContext {
    pub identity: LogIdentity,
    pub link: LinkContext,
    pub judgments: Vec<Judgment>,
    /// Tree data URL, used for the text tree link.
    pub data_url: Option<String>,
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(
    session: Session,
    backend: Box<dyn Backend>,
    context: AppContext,
) -> Result<(), Box<dyn Error>> {
    let theme = OutlineTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session, backend, context);
    app.theme = theme;

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    info!("outline viewer closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let toast_suffix = match &app.toast {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        _ => String::new(),
    };

    if let Some(pane) = app.text_tree.as_mut() {
        render_text_tree_pane(frame, pane, main_area);
    } else if app.source.is_some() {
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(100 - SOURCE_PANE_HEIGHT_PERCENT),
                Constraint::Percentage(SOURCE_PANE_HEIGHT_PERCENT),
            ])
            .split(main_area);
        render_tree(frame, app, panes[0]);
        render_source(frame, app, panes[1]);
    } else {
        render_tree(frame, app, main_area);
    }

    let footer = if app.search_mode == SearchMode::Editing {
        search_footer_line(app, &toast_suffix)
    } else {
        footer_help_line(app, &toast_suffix)
    };
    let footer_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_BRAND.len() as u16 + 1)])
        .split(status_area);
    frame.render_widget(Paragraph::new(footer), footer_layout[0]);
    frame.render_widget(
        Paragraph::new(footer_brand_line()).alignment(Alignment::Right),
        footer_layout[1],
    );

    if let Some(dialog) = &app.dialog {
        render_dialog(frame, app, dialog, main_area);
    }
    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn render_tree(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Outline", 'o', Some(app.context.link.proj.as_str())))
        .border_style(Style::default().fg(if app.source.is_some() {
            Color::Gray
        } else {
            FOCUS_COLOR
        }));
    app.viewport_height = block.inner(area).height;

    let width = usize::from(block.inner(area).width);
    let items = app
        .rows
        .iter()
        .map(|row| ListItem::new(tree_row_line(app, row, width)))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.cursor_style());
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_source(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let Some(pane) = app.source.as_mut() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Source", 'O', Some(&pane.request.path)))
        .title_bottom(Line::from(pane.status_line()).right_aligned())
        .border_style(Style::default().fg(FOCUS_COLOR));
    let inner = block.inner(area);
    pane.viewport_height = inner.height;

    let lines = match &pane.view {
        Some(view) => source_lines(view, pane.focused_mark, &app.theme),
        None => vec![Line::from(Span::styled(
            "loading…",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let scroll = u16::try_from(pane.scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn render_text_tree_pane(frame: &mut Frame<'_>, pane: &mut TextTreePane, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Text tree", 'T', pane.url.as_deref()))
        .border_style(Style::default().fg(FOCUS_COLOR));
    pane.viewport_height = block.inner(area).height;
    let scroll = u16::try_from(pane.scroll).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(pane.text.as_str())
            .block(block)
            .scroll((scroll, 0)),
        area,
    );
}

include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
    Results,
}

/// Modal dialogs; at most one is open and it takes every key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialog {
    /// Leaf with a resolvable callee: jump to the callee or open the source.
    JumpOrOpen {
        node_id: NodeId,
        callee: String,
        candidates: Vec<NodeId>,
    },
    CommentEditor {
        node_id: NodeId,
        buffer: String,
    },
    CommentList {
        entries: Vec<CommentEntry>,
        cursor: usize,
        picked: BTreeSet<usize>,
    },
    ExpandConfirm {
        node_id: NodeId,
        descendants: usize,
    },
    Alert(String),
}

#[derive(Debug, Clone)]
struct SourcePane {
    request: SourceRequest,
    /// `None` until the backend delivers the text.
    view: Option<SourceView>,
    scroll: usize,
    focused_mark: Option<usize>,
    viewport_height: u16,
}

impl SourcePane {
    fn status_line(&self) -> String {
        let focused = self
            .focused_mark
            .and_then(|idx| self.view.as_ref()?.marks.get(idx));
        match focused {
            Some(mark) => format!(" {} ", mark.action.title()),
            None if self.request.link.is_empty() => String::new(),
            None => format!(" {} ", self.request.link),
        }
    }

    fn max_scroll(&self) -> usize {
        let lines = self.view.as_ref().map_or(0, |view| view.lines.len());
        lines.saturating_sub(usize::from(self.viewport_height.max(1)))
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
    }
}

#[derive(Debug, Clone)]
struct TextTreePane {
    text: String,
    url: Option<String>,
    scroll: usize,
    viewport_height: u16,
}

pub(crate) struct App {
    session: Session,
    backend: Box<dyn Backend>,
    context: AppContext,
    theme: OutlineTheme,
    rows: Vec<VisibleRow>,
    list_state: ListState,
    viewport_height: u16,
    search_mode: SearchMode,
    search_query: String,
    data_source: DataSource,
    debouncer: Debouncer<String>,
    dialog: Option<Dialog>,
    alerts: VecDeque<String>,
    source: Option<SourcePane>,
    text_tree: Option<TextTreePane>,
    toast: Option<Toast>,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(mut session: Session, backend: Box<dyn Backend>, context: AppContext) -> Self {
        let last = on_ready(&mut session);
        let mut app = Self {
            session,
            backend,
            context,
            theme: OutlineTheme::default(),
            rows: Vec::new(),
            list_state: ListState::default(),
            viewport_height: 0,
            search_mode: SearchMode::Inactive,
            search_query: String::new(),
            data_source: DataSource::default(),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            dialog: None,
            alerts: VecDeque::new(),
            source: None,
            text_tree: None,
            toast: None,
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            should_quit: false,
        };
        app.refresh_rows();
        match last {
            Some(last) => app.focus(&last),
            None if !app.rows.is_empty() => app.list_state.select(Some(0)),
            None => {}
        }
        app
    }

    /// Runs due debounced searches and drains backend completions.
    pub(crate) fn tick(&mut self, now: Instant) {
        if let Some(keyword) = self.debouncer.take_due(now) {
            self.run_search(&keyword);
        }
        for event in self.backend.poll() {
            match event {
                BackendEvent::Alert(message) => self.alerts.push_back(message),
                BackendEvent::SourceLoaded { request, text } => self.source_loaded(request, &text),
                BackendEvent::SourceFailed { request } => self.source_failed(&request),
            }
        }
        if self.dialog.is_none() {
            if let Some(message) = self.alerts.pop_front() {
                self.dialog = Some(Dialog::Alert(message));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => self.help_scroll_by(1),
                KeyCode::Up | KeyCode::Char('k') => self.help_scroll_by(-1),
                KeyCode::PageDown => self.help_scroll_by(i32::from(self.help_viewport_height)),
                KeyCode::PageUp => self.help_scroll_by(-i32::from(self.help_viewport_height)),
                KeyCode::Home => self.help_scroll = 0,
                KeyCode::End => self.help_scroll = u16::MAX,
                _ => {}
            }
            return false;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(code);
            return false;
        }

        if self.search_mode == SearchMode::Editing {
            self.handle_search_edit_key(code);
            return false;
        }

        if self.text_tree.is_some() {
            self.handle_text_tree_key(code);
            return false;
        }

        if self.source.is_some() && self.handle_source_key(code) {
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(self.page()),
            KeyCode::PageUp => self.move_cursor(-self.page()),
            KeyCode::Home => self.select_row(0),
            KeyCode::End => self.select_row(self.rows.len().saturating_sub(1)),
            KeyCode::Enter | KeyCode::Char('l') => self.toggle_open(),
            KeyCode::Char('h') => self.close_or_parent(),
            KeyCode::Char(' ') => self.toggle_checked(),
            KeyCode::Char('/') => self.search_mode = SearchMode::Editing,
            KeyCode::Tab => self.cycle_data_source(),
            KeyCode::Char('n') => self.step_result(true),
            KeyCode::Char('N') => self.step_result(false),
            KeyCode::Char('x') | KeyCode::Esc => self.clear_results(),
            KeyCode::Char('t') => self.jump_targets(),
            KeyCode::Char('g') => self.jump_callee(),
            KeyCode::Char('o') => self.jump_or_open(),
            KeyCode::Char('O') => self.open_selected_source(),
            KeyCode::Char('J') => self.cycle_judgment(),
            KeyCode::Char('L') => self.cycle_estimation(),
            KeyCode::Char('c') => self.open_comment_editor(),
            KeyCode::Char('C') => self.open_comment_list(),
            KeyCode::Char('e') => self.request_expand_all(),
            KeyCode::Char('E') => self.expand_flagged(LoopFlag::Target),
            KeyCode::Char('R') => self.expand_flagged(LoopFlag::Relevant),
            KeyCode::Char('z') => self.collapse_selected(),
            KeyCode::Char('b') => self.go_back(),
            KeyCode::Char('T') => self.open_text_tree(),
            _ => {}
        }
        false
    }

    // Cursor and rows.

    fn refresh_rows(&mut self) {
        let selected = self.selected_id().cloned();
        self.rows = visible_rows(self.session.tree());
        match selected {
            Some(id) => self.focus(&id),
            None if !self.rows.is_empty() => self.list_state.select(Some(0)),
            None => self.list_state.select(None),
        }
    }

    fn selected_id(&self) -> Option<&NodeId> {
        let idx = self.list_state.selected()?;
        self.rows.get(idx).map(|row| &row.id)
    }

    /// Selects `id`, or its nearest visible ancestor when it is hidden.
    fn focus(&mut self, id: &NodeId) {
        let position = |target: &NodeId| self.rows.iter().position(|row| &row.id == target);
        let found = position(id).or_else(|| {
            self.session
                .tree()
                .get(id.as_str())?
                .parents()
                .iter()
                .find_map(|parent| position(parent))
        });
        match found {
            Some(idx) => self.select_row(idx),
            None if !self.rows.is_empty() => self.select_row(0),
            None => self.list_state.select(None),
        }
    }

    fn select_row(&mut self, idx: usize) {
        if self.rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        self.list_state.select(Some(idx.min(self.rows.len() - 1)));
    }

    fn move_cursor(&mut self, delta: isize) {
        let current = self.list_state.selected().unwrap_or(0);
        self.select_row(current.saturating_add_signed(delta));
    }

    fn page(&self) -> isize {
        isize::from(i16::try_from(self.viewport_height.max(1)).unwrap_or(i16::MAX))
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn help_scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.help_scroll).saturating_add(delta).max(0);
        self.help_scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }

    fn post(&mut self, ids: &[NodeId], action: LogAction) {
        let tree = self.session.tree();
        let nodes = ids.iter().filter_map(|id| tree.get(id.as_str()));
        let record = LogRecord::new(&self.context.identity, nodes, action);
        self.backend.post_log(record);
    }

    fn edit(&mut self, op: EditOp) -> bool {
        match apply_edit(&mut self.session, &op) {
            Ok(result) => {
                debug!(
                    node_id = op.node_id().as_str(),
                    affected = result.affected.len(),
                    visible = result.visible.len(),
                    "edit applied"
                );
                self.post(&result.affected, LogAction::from(&op));
                self.refresh_rows();
                true
            }
            Err(err) => {
                warn!(error = %err, "edit rejected");
                self.set_toast(err.to_string());
                false
            }
        }
    }

    /// Scrolls to the first hit of a finalized result set.
    fn show_result(&mut self, result: &Finalized, what: &str) {
        self.refresh_rows();
        match &result.first {
            Some(first) => {
                self.focus(first);
                self.search_mode = SearchMode::Results;
                self.set_toast(format!("{what}: {}", result.count));
            }
            None => self.set_toast(format!("{what}: none")),
        }
    }

    // Node state.

    fn toggle_open(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        if node.is_leaf() {
            self.set_toast("Leaf node");
            return;
        }
        let op = EditOp::SetOpened { node_id: node.id().clone(), opened: !node.state().opened };
        self.edit(op);
    }

    fn close_or_parent(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        if node.state().opened && !node.is_leaf() {
            let op = EditOp::SetOpened { node_id: node.id().clone(), opened: false };
            self.edit(op);
        } else if let Some(parent) = node.parents().first().cloned() {
            self.focus(&parent);
        }
    }

    fn toggle_checked(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        let op = EditOp::SetChecked { node_id: node.id().clone(), checked: !node.state().checked };
        self.edit(op);
    }

    // Search.

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.debouncer.cancel();
                self.search_mode = if self.session.search().is_empty() {
                    SearchMode::Inactive
                } else {
                    SearchMode::Results
                };
            }
            KeyCode::Enter => {
                self.debouncer.cancel();
                let keyword = self.search_query.clone();
                // Committing a keyword whose scan already ran keeps the cursor on the first hit.
                let current = self.session.search();
                if current.is_empty() || current.keyword() != keyword.to_lowercase() {
                    self.run_search(&keyword);
                }
                self.search_mode = if self.session.search().is_empty() {
                    SearchMode::Inactive
                } else {
                    SearchMode::Results
                };
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.debouncer.schedule(Instant::now(), self.search_query.clone());
            }
            KeyCode::Char(ch) => {
                self.search_query.push(ch);
                self.debouncer.schedule(Instant::now(), self.search_query.clone());
            }
            _ => {}
        }
    }

    fn run_search(&mut self, keyword: &str) {
        let outcome = search(&mut self.session, keyword, self.data_source);
        self.apply_search_outcome(outcome);
    }

    fn apply_search_outcome(&mut self, outcome: SearchOutcome) {
        match outcome {
            SearchOutcome::Cleared { deselected } => {
                debug!(deselected = deselected.len(), "search cleared");
                self.refresh_rows();
            }
            SearchOutcome::Advanced { node, .. } => self.focus(&node),
            SearchOutcome::Scanned { keyword, source, result } => {
                self.post(&[], LogAction::Search { keyword, source });
                self.refresh_rows();
                if let Some(first) = &result.first {
                    self.focus(first);
                }
            }
        }
    }

    fn cycle_data_source(&mut self) {
        self.data_source = self.data_source.next();
        self.set_toast(format!("Data source: {}", self.data_source.as_str()));
        let keyword = self.search_query.clone();
        if let Some(outcome) = change_data_source(&mut self.session, &keyword, self.data_source) {
            self.apply_search_outcome(outcome);
        }
    }

    fn step_result(&mut self, forward: bool) {
        let step = if forward {
            jump_next(&mut self.session)
        } else {
            jump_prev(&mut self.session)
        };
        match step {
            Some((_, node)) => self.focus(&node),
            None => self.set_toast("No results"),
        }
    }

    fn clear_results(&mut self) {
        if self.session.search().is_empty() && self.search_query.is_empty() {
            return;
        }
        self.debouncer.cancel();
        clear_search(&mut self.session);
        self.search_query.clear();
        self.search_mode = SearchMode::Inactive;
        self.refresh_rows();
    }

    // Jumps.

    fn jump_targets(&mut self) {
        self.search_query.clear();
        match jump_to_targets(&mut self.session) {
            Some(result) => self.show_result(&result, "Targets"),
            None => self.set_toast("No target nodes"),
        }
    }

    fn jump_callee(&mut self) {
        let Some(node_id) = self.selected_id().cloned() else {
            return;
        };
        self.search_query.clear();
        match callee_choice(&mut self.session, node_id.as_str()) {
            CalleeChoice::Ask { candidates, .. } => {
                let result = confirm_callee_jump(&mut self.session, node_id.as_str(), candidates);
                self.show_result(&result, "Callees");
            }
            CalleeChoice::OpenSource => {
                self.refresh_rows();
                self.set_toast("No callee to jump to");
            }
        }
    }

    fn jump_or_open(&mut self) {
        let Some(node_id) = self.selected_id().cloned() else {
            return;
        };
        self.search_query.clear();
        match callee_choice(&mut self.session, node_id.as_str()) {
            CalleeChoice::Ask { callee, candidates } => {
                self.refresh_rows();
                self.dialog = Some(Dialog::JumpOrOpen { node_id, callee, candidates });
            }
            CalleeChoice::OpenSource => {
                self.refresh_rows();
                self.open_source(&node_id);
            }
        }
    }

    fn go_back(&mut self) {
        match back(&self.session).cloned() {
            Some(id) => self.focus(&id),
            None => self.set_toast("History is empty"),
        }
    }

    // Judgment and comments.

    fn cycle_judgment(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        let Some(current) = node.label().judgment() else {
            self.set_toast("No judgment for this node");
            return;
        };
        let judgments = &self.context.judgments;
        let next = judgments
            .iter()
            .position(|value| value == current)
            .map_or(0, |idx| (idx + 1) % judgments.len());
        let Some(judgment) = judgments.get(next).cloned() else {
            return;
        };
        let op = EditOp::SetJudgment { node_id: node.id().clone(), judgment };
        self.edit(op);
    }

    fn cycle_estimation(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        let Some(scheme) = node.label().estimation() else {
            self.set_toast("No estimation scheme for this node");
            return;
        };
        let op = EditOp::SetEstimationLevel { node_id: node.id().clone(), level: scheme.next_level() };
        self.edit(op);
    }

    fn open_comment_editor(&mut self) {
        let Some(node) = self.selected_id().and_then(|id| self.session.tree().get(id.as_str())) else {
            return;
        };
        self.dialog = Some(Dialog::CommentEditor {
            node_id: node.id().clone(),
            buffer: node.label().comment().unwrap_or_default().to_owned(),
        });
    }

    fn open_comment_list(&mut self) {
        let entries = list_comments(self.session.tree());
        if entries.is_empty() {
            self.set_toast("No comments");
            return;
        }
        self.dialog = Some(Dialog::CommentList { entries, cursor: 0, picked: BTreeSet::new() });
    }

    // Expansion.

    fn request_expand_all(&mut self) {
        let Some(node_id) = self.selected_id().cloned() else {
            return;
        };
        match plan_expand_all(self.session.tree(), node_id.as_str()) {
            ExpandPlan::Nothing => self.set_toast("Nothing to expand"),
            ExpandPlan::Run => self.run_expand_all(&node_id),
            ExpandPlan::Confirm { descendants } => {
                self.dialog = Some(Dialog::ExpandConfirm { node_id, descendants });
            }
        }
    }

    fn run_expand_all(&mut self, node_id: &NodeId) {
        let changed = expand_all(self.session.tree_mut(), node_id.as_str());
        debug!(node_id = node_id.as_str(), changed, "expand all");
        self.post(std::slice::from_ref(node_id), LogAction::ExpandAll);
        self.refresh_rows();
    }

    fn expand_flagged(&mut self, flag: LoopFlag) {
        let Some(node_id) = self.selected_id().cloned() else {
            return;
        };
        let is_leaf = self
            .session
            .tree()
            .get(node_id.as_str())
            .map_or(true, |node| node.children_d().is_empty());
        if is_leaf {
            return;
        }
        let changed = expand_loops(self.session.tree_mut(), node_id.as_str(), flag);
        let action = match flag {
            LoopFlag::Target => LogAction::ExpandTargetLoops,
            LoopFlag::Relevant => LogAction::ExpandRelevantLoops,
        };
        debug!(node_id = node_id.as_str(), changed, ?flag, "expand loops");
        self.post(std::slice::from_ref(&node_id), action);
        self.refresh_rows();
    }

    fn collapse_selected(&mut self) {
        let Some(node_id) = self.selected_id().cloned() else {
            return;
        };
        collapse_all(self.session.tree_mut(), node_id.as_str());
        self.post(std::slice::from_ref(&node_id), LogAction::CollapseAll);
        self.refresh_rows();
    }

    // Dialogs.

    fn handle_dialog_key(&mut self, code: KeyCode) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        let keep = match dialog {
            Dialog::JumpOrOpen { node_id, callee, candidates } => match code {
                KeyCode::Char('j') | KeyCode::Char('y') | KeyCode::Enter => {
                    let result = confirm_callee_jump(&mut self.session, node_id.as_str(), candidates);
                    self.show_result(&result, "Callees");
                    None
                }
                KeyCode::Char('o') | KeyCode::Char('n') => {
                    self.open_source(&node_id);
                    None
                }
                KeyCode::Esc => None,
                _ => Some(Dialog::JumpOrOpen { node_id, callee, candidates }),
            },
            Dialog::CommentEditor { node_id, mut buffer } => match code {
                KeyCode::Enter => {
                    self.edit(EditOp::SetComment { node_id, comment: buffer });
                    None
                }
                KeyCode::Esc => None,
                KeyCode::Backspace => {
                    buffer.pop();
                    Some(Dialog::CommentEditor { node_id, buffer })
                }
                KeyCode::Char(ch) => {
                    buffer.push(ch);
                    Some(Dialog::CommentEditor { node_id, buffer })
                }
                _ => Some(Dialog::CommentEditor { node_id, buffer }),
            },
            Dialog::CommentList { entries, mut cursor, mut picked } => match code {
                KeyCode::Down | KeyCode::Char('j') => {
                    cursor = (cursor + 1).min(entries.len().saturating_sub(1));
                    Some(Dialog::CommentList { entries, cursor, picked })
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    cursor = cursor.saturating_sub(1);
                    Some(Dialog::CommentList { entries, cursor, picked })
                }
                KeyCode::Char(' ') => {
                    if !picked.remove(&cursor) {
                        picked.insert(cursor);
                    }
                    Some(Dialog::CommentList { entries, cursor, picked })
                }
                KeyCode::Enter => {
                    if picked.is_empty() {
                        picked.insert(cursor);
                    }
                    let ids = picked
                        .iter()
                        .filter_map(|idx| entries.get(*idx))
                        .map(|entry| entry.id.clone())
                        .collect::<Vec<_>>();
                    self.search_query.clear();
                    if let Some(result) = jump_to_comments(&mut self.session, &ids) {
                        self.show_result(&result, "Comments");
                    }
                    None
                }
                KeyCode::Esc => None,
                _ => Some(Dialog::CommentList { entries, cursor, picked }),
            },
            Dialog::ExpandConfirm { node_id, descendants } => match code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.run_expand_all(&node_id);
                    None
                }
                KeyCode::Char('n') | KeyCode::Esc => None,
                _ => Some(Dialog::ExpandConfirm { node_id, descendants }),
            },
            Dialog::Alert(_) => None,
        };
        self.dialog = keep.or_else(|| self.alerts.pop_front().map(Dialog::Alert));
    }

    // Source pane.

    fn open_selected_source(&mut self) {
        if let Some(node_id) = self.selected_id().cloned() {
            self.open_source(&node_id);
        }
    }

    fn open_source(&mut self, node_id: &NodeId) {
        let Some(node) = self.session.tree().get(node_id.as_str()) else {
            return;
        };
        let request = match SourceRequest::for_node(node, &self.context.link) {
            Ok(request) => request,
            Err(err) => {
                self.set_toast(err.to_string());
                return;
            }
        };
        info!(node_id = node_id.as_str(), path = request.path.as_str(), "open source");
        self.post(std::slice::from_ref(node_id), LogAction::OpenSource);
        self.backend.request_source(request.clone());
        self.source = Some(SourcePane {
            request,
            view: None,
            scroll: 0,
            focused_mark: None,
            viewport_height: 0,
        });
    }

    fn source_loaded(&mut self, request: SourceRequest, text: &str) {
        let Some(pane) = self.source.as_mut().filter(|pane| pane.request == request) else {
            debug!(path = request.path.as_str(), "stale source dropped");
            return;
        };
        match SourceView::build(text, &request) {
            Ok(view) => {
                pane.scroll = view.scroll_to.unwrap_or(0);
                pane.view = Some(view);
            }
            Err(err) => {
                warn!(error = %err, "source view failed");
                self.source = None;
                self.set_toast(err.to_string());
            }
        }
    }

    fn source_failed(&mut self, request: &SourceRequest) {
        if self.source.as_ref().is_some_and(|pane| &pane.request == request) {
            debug!(path = request.path.as_str(), "source unavailable, pane closed");
            self.source = None;
        }
    }

    /// Source pane keys; `false` hands the key on to the tree.
    fn handle_source_key(&mut self, code: KeyCode) -> bool {
        let Some(pane) = self.source.as_mut() else {
            return false;
        };
        let page = isize::from(i16::try_from(pane.viewport_height.max(1)).unwrap_or(i16::MAX));
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.source = None,
            KeyCode::Down | KeyCode::Char('j') => pane.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => pane.scroll_by(-1),
            KeyCode::PageDown => pane.scroll_by(page),
            KeyCode::PageUp => pane.scroll_by(-page),
            KeyCode::Home => pane.scroll = 0,
            KeyCode::End => pane.scroll = pane.max_scroll(),
            KeyCode::Tab => {
                let count = pane.view.as_ref().map_or(0, |view| view.marks.len());
                pane.focused_mark = match (pane.focused_mark, count) {
                    (_, 0) => None,
                    (None, _) => Some(0),
                    (Some(idx), count) => Some((idx + 1) % count),
                };
                if let Some(line) = pane
                    .focused_mark
                    .and_then(|idx| Some(pane.view.as_ref()?.marks.get(idx)?.from.0))
                {
                    pane.scroll = line.saturating_sub(usize::from(pane.viewport_height / 2));
                }
            }
            KeyCode::Enter => {
                let Some(action) = pane
                    .focused_mark
                    .and_then(|idx| pane.view.as_ref()?.marks.get(idx))
                    .map(|mark| mark.action.clone())
                else {
                    return true;
                };
                match action {
                    MarkAction::ScrollToLine { line, .. } => pane.scroll = line.min(pane.max_scroll()),
                    MarkAction::DefinitionLink { href, title } if href.is_empty() => {
                        self.set_toast(title);
                    }
                    MarkAction::DefinitionLink { href, .. } => self.set_toast(href),
                    MarkAction::TypeGuess(guess) => self.set_toast(guess.title()),
                }
            }
            _ => return false,
        }
        true
    }

    // Text tree.

    fn open_text_tree(&mut self) {
        self.text_tree = Some(TextTreePane {
            text: render_text_tree(self.session.tree()),
            url: self.context.data_url.as_deref().map(texttree_url),
            scroll: 0,
            viewport_height: 0,
        });
    }

    fn handle_text_tree_key(&mut self, code: KeyCode) {
        let Some(pane) = self.text_tree.as_mut() else {
            return;
        };
        let lines = pane.text.lines().count();
        let max_scroll = lines.saturating_sub(usize::from(pane.viewport_height.max(1)));
        let page = usize::from(pane.viewport_height.max(1));
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('T') => self.text_tree = None,
            KeyCode::Down | KeyCode::Char('j') => pane.scroll = (pane.scroll + 1).min(max_scroll),
            KeyCode::Up | KeyCode::Char('k') => pane.scroll = pane.scroll.saturating_sub(1),
            KeyCode::PageDown => pane.scroll = (pane.scroll + page).min(max_scroll),
            KeyCode::PageUp => pane.scroll = pane.scroll.saturating_sub(page),
            KeyCode::Home => pane.scroll = 0,
            KeyCode::End => pane.scroll = max_scroll,
            _ => {}
        }
    }
}

fn tree_row_line(app: &App, row: &VisibleRow, width: usize) -> Line<'static> {
    let Some(node) = app.session.tree().get(row.id.as_str()) else {
        return Line::from(row.id.to_string());
    };
    let state = node.state();
    let label = node.label();

    let mut spans = Vec::new();
    spans.push(Span::raw("  ".repeat(row.depth)));
    let disclosure = match (node.is_leaf(), state.opened) {
        (true, _) => "  ",
        (false, true) => "▾ ",
        (false, false) => "▸ ",
    };
    spans.push(Span::raw(disclosure));
    spans.push(Span::raw(if state.checked { "[x] " } else { "[ ] " }));
    spans.push(Span::styled(
        format!("{} ", node.kind().glyph()),
        Style::default().fg(Color::DarkGray),
    ));

    let used = row.depth * 2 + 8;
    let text = truncate_with_ellipsis(label.text(), width.saturating_sub(used).max(8));
    let mut text_style = app.theme.mark_style(label.mark());
    if state.selected {
        text_style = text_style.patch(app.theme.hit_style());
    }
    spans.push(Span::styled(text, text_style));

    if let Some(judgment) = label.judgment() {
        spans.push(Span::styled(
            format!("  <{}>", judgment.as_str()),
            app.theme.mark_style(label.mark()),
        ));
    }
    if let Some(scheme) = label.estimation() {
        let value = node
            .payload()
            .metrics
            .as_ref()
            .and_then(|metrics| metrics.level(scheme.level()));
        let estimation = match value {
            Some(value) => format!("  L{}:{value}", scheme.level()),
            None => format!("  L{}", scheme.level()),
        };
        spans.push(Span::styled(estimation, Style::default().fg(FOOTER_KEY_COLOR)));
    }
    if label.has_comment() {
        spans.push(Span::styled("  ✎", app.theme.comment_style()));
    }
    Line::from(spans)
}

fn source_lines(
    view: &SourceView,
    focused_mark: Option<usize>,
    theme: &OutlineTheme,
) -> Vec<Line<'static>> {
    let number_width = view.lines.len().to_string().len();
    view.lines
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            let in_node = view.highlight.as_ref().is_some_and(|range| range.contains(&idx));
            let base = if in_node { theme.highlight_style() } else { Style::default() };

            let mut spans = vec![Span::styled(
                format!("{:>number_width$} ", idx + 1),
                Style::default().fg(Color::DarkGray),
            )];
            let chars = text.chars().collect::<Vec<_>>();
            let mut styles = vec![base; chars.len()];
            for (mark_idx, mark) in view.marks.iter().enumerate() {
                if mark.from.0 > idx || mark.to.0 < idx {
                    continue;
                }
                let start = if mark.from.0 == idx { mark.from.1 } else { 0 };
                let end = if mark.to.0 == idx { mark.to.1 } else { chars.len() };
                let mut style = base.add_modifier(Modifier::UNDERLINED);
                if focused_mark == Some(mark_idx) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                for slot in styles.iter_mut().take(end.min(chars.len())).skip(start) {
                    *slot = style;
                }
            }

            // Merge runs of equal style into spans.
            let mut run = String::new();
            let mut run_style = base;
            for (ch, style) in chars.into_iter().zip(styles) {
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            Line::from(spans).style(base)
        })
        .collect()
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
