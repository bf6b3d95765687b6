// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};

use super::{draw, footer_help_line, match_counter, App, AppContext, Dialog, SearchMode};
use crate::backend::{LogAction, LogIdentity, LogRecord, OfflineBackend};
use crate::config::ViewerConfig;
use crate::model::fixtures::{demo_session, demo_source, wide_session};
use crate::model::{Judgment, Mark, Session};
use crate::nav::{DataSource, EXPAND_CONFIRM_THRESHOLD, SEARCH_DEBOUNCE};
use crate::viewer::LinkContext;

type Records = Arc<Mutex<Vec<LogRecord>>>;

fn context() -> AppContext {
    AppContext {
        identity: LogIdentity {
            user: "alice".to_owned(),
            proj: "demo".to_owned(),
            ver: "v1".to_owned(),
        },
        link: LinkContext {
            proj: "demo".to_owned(),
            ver: "v1".to_owned(),
            view_id: "v1".to_owned(),
            ..LinkContext::default()
        },
        judgments: ViewerConfig::default().judgment_values(),
        data_url: Some("outline.json?proj=demo&ver=v1".to_owned()),
    }
}

fn app_with(session: Session, backend: OfflineBackend) -> (App, Records) {
    let records = backend.records();
    (App::new(session, Box::new(backend), context()), records)
}

fn demo_app() -> (App, Records) {
    app_with(demo_session().expect("demo"), OfflineBackend::new(demo_source))
}

fn press(app: &mut App, keys: &str) {
    for ch in keys.chars() {
        assert!(!app.handle_key_code(KeyCode::Char(ch)), "unexpected quit on {ch:?}");
    }
}

fn selected(app: &App) -> &str {
    app.selected_id().map(|id| id.as_str()).unwrap_or_default()
}

fn last_action(records: &Records) -> Option<LogAction> {
    records.lock().expect("records").last().map(|record| record.action.clone())
}

fn last_nids(records: &Records) -> Vec<String> {
    records
        .lock()
        .expect("records")
        .last()
        .map(|record| record.node_data.iter().map(|data| data.nid.clone()).collect())
        .unwrap_or_default()
}

fn commit_search(app: &mut App, keyword: &str) {
    press(app, "/");
    press(app, keyword);
    app.handle_key_code(KeyCode::Enter);
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 32)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn ready_focuses_nearest_visible_ancestor_of_last_view() {
    let (app, records) = demo_app();
    // l2 sits below the closed l1.
    assert_eq!(selected(&app), "l1");
    assert!(app.rows.iter().all(|row| row.id.as_str() != "l2"));
    assert!(records.lock().expect("records").is_empty());
}

#[test]
fn enter_toggles_open_and_posts_opened() {
    let (mut app, records) = demo_app();
    app.handle_key_code(KeyCode::Enter);

    assert!(app.session.tree().get("l1").expect("l1").state().opened);
    assert!(app.rows.iter().any(|row| row.id.as_str() == "l2"));
    assert_eq!(last_action(&records), Some(LogAction::Opened(true)));
    assert_eq!(last_nids(&records), ["l1"]);
}

#[test]
fn h_closes_then_walks_to_parent() {
    let (mut app, records) = demo_app();
    press(&mut app, "l");
    press(&mut app, "h");
    assert!(!app.session.tree().get("l1").expect("l1").state().opened);
    assert_eq!(last_action(&records), Some(LogAction::Opened(false)));

    press(&mut app, "h");
    assert_eq!(selected(&app), "p1");
}

#[test]
fn space_toggles_check() {
    let (mut app, records) = demo_app();
    press(&mut app, " ");
    assert!(app.session.tree().get("l1").expect("l1").state().checked);
    assert_eq!(last_action(&records), Some(LogAction::Checked(true)));
}

#[test]
fn typed_search_waits_for_the_debounce() {
    let (mut app, records) = demo_app();
    press(&mut app, "/");
    press(&mut app, "do k =");
    assert_eq!(app.search_mode, SearchMode::Editing);
    assert!(app.session.search().is_empty());

    app.tick(Instant::now());
    assert!(app.session.search().is_empty());

    app.tick(Instant::now() + SEARCH_DEBOUNCE);
    assert_eq!(app.session.search().nodes().len(), 2);
    assert_eq!(selected(&app), "l3");
    assert_eq!(
        last_action(&records),
        Some(LogAction::Search { keyword: "do k =".to_owned(), source: DataSource::All })
    );
    assert!(last_nids(&records).is_empty());
}

#[test]
fn enter_commits_search_and_n_cycles_matches() {
    let (mut app, _records) = demo_app();
    commit_search(&mut app, "call");

    assert_eq!(app.search_mode, SearchMode::Results);
    assert!(!app.debouncer.is_pending());
    assert_eq!(selected(&app), "c1");
    assert_eq!(match_counter(&app).as_deref(), Some("1/2"));

    press(&mut app, "n");
    assert_eq!(selected(&app), "c2");
    assert_eq!(match_counter(&app).as_deref(), Some("2/2"));
    press(&mut app, "N");
    assert_eq!(selected(&app), "c1");

    press(&mut app, "x");
    assert!(app.session.search().is_empty());
    assert_eq!(match_counter(&app), None);
}

#[test]
fn enter_after_idle_scan_keeps_first_hit() {
    let (mut app, records) = demo_app();
    press(&mut app, "/");
    press(&mut app, "call");
    app.tick(Instant::now() + SEARCH_DEBOUNCE);
    assert_eq!(selected(&app), "c1");
    let logged = records.lock().expect("records").len();

    app.handle_key_code(KeyCode::Enter);
    assert_eq!(app.search_mode, SearchMode::Results);
    assert_eq!(app.session.search().cursor(), 0);
    assert_eq!(selected(&app), "c1");
    assert_eq!(records.lock().expect("records").len(), logged);
}

#[test]
fn tab_changes_data_source_and_rescans() {
    let (mut app, records) = demo_app();
    commit_search(&mut app, "vectorize");
    assert_eq!(app.session.search().nodes().len(), 1);

    app.handle_key_code(KeyCode::Tab);
    assert_eq!(app.data_source, DataSource::Code);
    assert!(app.session.search().is_empty());
    assert_eq!(match_counter(&app).as_deref(), Some("0"));
    assert_eq!(
        last_action(&records),
        Some(LogAction::Search { keyword: "vectorize".to_owned(), source: DataSource::Code })
    );
}

#[test]
fn targets_jump_in_line_order() {
    let (mut app, _records) = demo_app();
    press(&mut app, "t");
    assert_eq!(selected(&app), "l3");
    assert_eq!(match_counter(&app).as_deref(), Some("1/2"));
    press(&mut app, "n");
    assert_eq!(selected(&app), "l1");
}

#[test]
fn callee_jump_and_back() {
    let (mut app, _records) = demo_app();
    commit_search(&mut app, "call compute");
    assert_eq!(selected(&app), "c1");

    press(&mut app, "g");
    assert_eq!(selected(&app), "s1");
    assert_eq!(app.session.history().latest().map(|id| id.as_str()), Some("c1"));

    press(&mut app, "b");
    assert_eq!(selected(&app), "c1");
}

#[test]
fn jump_or_open_asks_then_opens_source() {
    let (mut app, records) = demo_app();
    commit_search(&mut app, "call compute");

    press(&mut app, "o");
    assert!(matches!(app.dialog, Some(Dialog::JumpOrOpen { ref callee, .. }) if callee == "compute"));

    press(&mut app, "o");
    assert!(app.dialog.is_none());
    assert_eq!(last_action(&records), Some(LogAction::OpenSource));
    let pane = app.source.as_ref().expect("source pane");
    assert_eq!(pane.request.path, "src/main.f90");
    assert!(pane.view.is_none());

    app.tick(Instant::now());
    let view = app.source.as_ref().and_then(|pane| pane.view.as_ref()).expect("view");
    assert_eq!(view.marks.len(), 3);
    assert_eq!(app.source.as_ref().map(|pane| pane.scroll), Some(11));

    app.handle_key_code(KeyCode::Esc);
    assert!(app.source.is_none());
}

#[test]
fn unresolved_callee_opens_source_directly() {
    let (mut app, records) = demo_app();
    commit_search(&mut app, "output");
    assert_eq!(selected(&app), "c2");

    press(&mut app, "o");
    assert!(app.dialog.is_none());
    assert!(app.source.is_some());
    assert_eq!(last_nids(&records), ["c2"]);
}

#[test]
fn judgment_cycles_through_checked_group() {
    let (mut app, records) = demo_app();
    press(&mut app, "t");
    press(&mut app, "J");

    let l3 = app.session.tree().get("l3").expect("l3");
    assert_eq!(l3.label().judgment(), Some(&Judgment::from_value("Kernel")));
    assert_eq!(l3.label().mark(), Mark::TargetCompleted);
    assert_eq!(last_action(&records), Some(LogAction::Judgment("Kernel".to_owned())));
    assert_eq!(last_nids(&records), ["l4", "l3", "l3b"]);

    let footer = footer_help_line(&app, "")
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect::<String>();
    assert!(footer.contains("Progress:1/2 (50%)"), "{footer}");
}

#[test]
fn judgment_without_selector_only_toasts() {
    let (mut app, records) = demo_app();
    press(&mut app, "k");
    assert_eq!(selected(&app), "p1");
    press(&mut app, "J");
    assert!(records.lock().expect("records").is_empty());
    assert!(app.toast.is_some());
}

#[test]
fn estimation_level_cycles() {
    let (mut app, records) = demo_app();
    press(&mut app, "L");
    let level = app
        .session
        .tree()
        .get("l1")
        .and_then(|node| node.label().estimation())
        .map(|scheme| scheme.level());
    assert_eq!(level, Some(1));
    assert_eq!(last_action(&records), Some(LogAction::EstimationScheme(1)));
}

#[test]
fn comment_editor_saves_on_enter() {
    let (mut app, records) = demo_app();
    press(&mut app, "c");
    press(&mut app, "hot");
    app.handle_key_code(KeyCode::Backspace);
    press(&mut app, "t!");
    app.handle_key_code(KeyCode::Enter);

    assert!(app.dialog.is_none());
    assert_eq!(app.session.tree().get("l1").and_then(|n| n.label().comment()), Some("hot!"));
    assert_eq!(last_action(&records), Some(LogAction::Comment("hot!".to_owned())));
}

#[test]
fn comment_editor_escape_discards() {
    let (mut app, records) = demo_app();
    press(&mut app, "cdraft");
    app.handle_key_code(KeyCode::Esc);
    assert!(app.dialog.is_none());
    assert!(!app.session.tree().get("l1").expect("l1").label().has_comment());
    assert!(records.lock().expect("records").is_empty());
}

#[test]
fn comment_list_jumps_to_commented_nodes() {
    let (mut app, _records) = demo_app();
    press(&mut app, "C");
    assert!(matches!(app.dialog, Some(Dialog::CommentList { ref entries, .. }) if entries.len() == 1));

    app.handle_key_code(KeyCode::Enter);
    assert!(app.dialog.is_none());
    assert_eq!(selected(&app), "l3");
    assert_eq!(app.session.search().nodes().len(), 1);
}

#[test]
fn large_expand_all_needs_confirmation() {
    let (mut app, records) = app_with(
        wide_session(1, EXPAND_CONFIRM_THRESHOLD + 1),
        OfflineBackend::new(demo_source),
    );
    assert_eq!(selected(&app), "f0");

    press(&mut app, "e");
    assert!(matches!(
        app.dialog,
        Some(Dialog::ExpandConfirm { descendants, .. }) if descendants == EXPAND_CONFIRM_THRESHOLD + 1
    ));
    press(&mut app, "n");
    assert!(app.dialog.is_none());
    assert_eq!(app.rows.len(), 1);

    press(&mut app, "ey");
    assert_eq!(app.rows.len(), EXPAND_CONFIRM_THRESHOLD + 2);
    assert_eq!(last_action(&records), Some(LogAction::ExpandAll));

    press(&mut app, "z");
    assert_eq!(app.rows.len(), 1);
    assert_eq!(last_action(&records), Some(LogAction::CollapseAll));
}

#[test]
fn expand_target_loops_reveals_targets() {
    let (mut app, records) = demo_app();
    app.handle_key_code(KeyCode::Home);
    assert_eq!(selected(&app), "f1");
    press(&mut app, "E");
    assert!(app.session.tree().get("l1").expect("l1").state().opened);
    assert_eq!(last_action(&records), Some(LogAction::ExpandTargetLoops));
}

#[test]
fn expand_loops_on_a_leaf_is_a_no_op() {
    let (mut app, records) = demo_app();
    commit_search(&mut app, "output");
    assert_eq!(selected(&app), "c2");
    let logged = records.lock().expect("records").len();

    press(&mut app, "E");
    press(&mut app, "R");
    assert_eq!(records.lock().expect("records").len(), logged);
    assert_eq!(
        last_action(&records),
        Some(LogAction::Search { keyword: "output".to_owned(), source: DataSource::All })
    );
}

#[test]
fn unavailable_source_closes_the_pane() {
    let backend = OfflineBackend::new(|_| None);
    let (mut app, _records) = app_with(demo_session().expect("demo"), backend);
    commit_search(&mut app, "output");
    press(&mut app, "O");
    assert!(app.source.as_ref().is_some_and(|pane| pane.view.is_none()));

    app.tick(Instant::now());
    assert!(app.source.is_none());
    assert!(app.dialog.is_none());
}

#[test]
fn log_failures_surface_as_alert() {
    let backend = OfflineBackend::new(demo_source).with_failure("comment:too long");
    let (mut app, _records) = app_with(demo_session().expect("demo"), backend);

    press(&mut app, " ");
    assert!(app.dialog.is_none());
    app.tick(Instant::now());
    assert_eq!(app.dialog, Some(Dialog::Alert("comment:too long".to_owned())));

    press(&mut app, "q");
    assert!(app.dialog.is_none());
}

#[test]
fn text_tree_pane_lists_every_node() {
    let (mut app, _records) = demo_app();
    press(&mut app, "T");
    let pane = app.text_tree.as_ref().expect("text tree");
    assert_eq!(pane.text.lines().count(), 12);
    assert_eq!(pane.url.as_deref(), Some("texttree?proj=demo&ver=v1"));

    app.handle_key_code(KeyCode::Esc);
    assert!(app.text_tree.is_none());
}

#[test]
fn q_quits_and_help_swallows_keys() {
    let (mut app, _records) = demo_app();
    press(&mut app, "?");
    assert!(app.show_help);
    press(&mut app, "J");
    assert!(app.show_help);
    app.handle_key_code(KeyCode::Esc);
    assert!(!app.show_help);
    assert!(app.handle_key_code(KeyCode::Char('q')));
}

#[test]
fn draw_shows_tree_footer_and_source_pane() {
    let (mut app, _records) = demo_app();
    let text = screen(&mut app);
    assert!(text.contains("program main"));
    assert!(text.contains("Src:All"));
    assert!(text.contains("Progress:0/2 (0%)"));

    commit_search(&mut app, "call compute");
    press(&mut app, "O");
    app.tick(Instant::now());
    let text = screen(&mut app);
    assert!(text.contains("Source src/main.f90"));
    assert!(text.contains("call compute(a, i, j)"));
}
