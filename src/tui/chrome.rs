// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail.map(str::trim).filter(|tail| !tail.is_empty()) {
        title.push(' ');
        title.push_str(tail);
    }
    title.push(' ');
    title
}

/// `idx/total` of the active result set; `None` when there is nothing to show.
fn match_counter(app: &App) -> Option<String> {
    let result = app.session.search();
    if result.is_empty() {
        return (!app.search_query.is_empty()).then(|| "0".to_owned());
    }
    Some(format!("{}/{}", result.cursor() + 1, result.nodes().len()))
}

fn progress_label(app: &App) -> Option<String> {
    let current = progress(&app.session);
    let percent = current.percent()?;
    Some(format!("{}/{} ({percent}%)", current.judged, current.total))
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(count) = match_counter(app) {
        push_footer_entry(&mut spans, "match", &count);
    }
    push_footer_entry(&mut spans, "src", app.data_source.as_str());
    if let Some(progress) = progress_label(app) {
        push_footer_entry(&mut spans, "progress", &progress);
    }

    if app.source.is_some() {
        push_footer_entry(&mut spans, "marks", "Tab/Enter");
        push_footer_entry(&mut spans, "close", "Esc");
    } else if app.search_mode == SearchMode::Results {
        push_footer_entry(&mut spans, "next", "n/N");
        push_footer_entry(&mut spans, "clear", "x");
    } else {
        push_footer_entry(&mut spans, "search", "/");
        push_footer_entry(&mut spans, "targets", "t");
    }
    push_footer_entry(&mut spans, "help", "?");

    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            Style::default().fg(FOCUS_COLOR),
        ));
    }
    Line::from(spans)
}

fn search_footer_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            "/".to_owned(),
            Style::default()
                .fg(FOOTER_KEY_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(app.search_query.clone()),
        Span::styled("█".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::raw("   "),
    ];
    if app.debouncer.is_pending() {
        spans.push(Span::styled("…".to_owned(), Style::default().fg(Color::DarkGray)));
    } else if let Some(count) = match_counter(app) {
        spans.push(Span::styled(count, Style::default().fg(Color::LightGreen)));
    }

    push_footer_entry_with_separator(&mut spans, "Src", app.data_source.as_str(), " | ");
    push_footer_entry_with_separator(&mut spans, "Accept", "Enter", " | ");
    push_footer_entry_with_separator(&mut spans, "Close", "Esc", " | ");

    let toast_message = toast_suffix.strip_prefix(" | ").unwrap_or(toast_suffix).trim();
    if !toast_message.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            toast_message.to_owned(),
            Style::default().fg(FOCUS_COLOR),
        ));
    }
    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default()
            .fg(FOOTER_BRAND_COLOR)
            .add_modifier(Modifier::BOLD),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Tree",
        &[
            ("j/k, ↑/↓, PgUp/PgDn, Home/End", "Move cursor"),
            ("Enter/l", "Open or close node"),
            ("h", "Close node or go to parent"),
            ("Space", "Toggle check"),
            ("e / z", "Expand all / collapse all below node"),
            ("E / R", "Expand target / relevant loops"),
            ("T", "Text tree"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Search keyword (Enter runs now)"),
            ("Tab", "Cycle data source All/Code/Comment"),
            ("n/N", "Next/previous match"),
            ("x", "Clear matches"),
        ],
    ),
    (
        "Navigate",
        &[
            ("t", "Jump to target nodes"),
            ("g", "Jump to callee"),
            ("o", "Jump to callee or open source"),
            ("O", "Open source"),
            ("C", "Jump to comments"),
            ("b", "Back"),
        ],
    ),
    (
        "Edit",
        &[
            ("J", "Cycle judgment"),
            ("L", "Cycle estimation level"),
            ("c", "Edit comment"),
        ],
    ),
    (
        "Source",
        &[
            ("j/k, PgUp/PgDn", "Scroll"),
            ("Tab", "Next annotated range"),
            ("Enter", "Follow annotated range"),
            ("Esc", "Close source"),
        ],
    ),
];

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(82, 84, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = HELP_SECTIONS
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (header, entries) in HELP_SECTIONS {
        lines.push(Line::from(Span::styled(format!("--- {header} ---"), header_style)));
        lines.extend(entries.iter().map(|(key, desc)| help_kv(key, desc, key_col_width, key_style)));
        lines.push(Line::from(""));
    }
    lines.push(help_kv("Esc/?", "Close help", key_col_width, key_style));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(Style::default().fg(FOCUS_COLOR))
        .title_style(
            Style::default()
                .fg(FOCUS_COLOR)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn dialog_block(title: &str, style: Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!("─ {title} ─"))
        .border_style(style)
        .title_style(style.add_modifier(Modifier::BOLD))
}

fn render_dialog(frame: &mut Frame<'_>, app: &App, dialog: &Dialog, main_area: Rect) {
    let key_style = help_key_style();
    let focus = Style::default().fg(FOCUS_COLOR);

    let (area, block, lines) = match dialog {
        Dialog::JumpOrOpen { callee, candidates, .. } => (
            centered_rect(60, 30, main_area),
            dialog_block("Callee", focus),
            vec![
                Line::from(format!("`{callee}` has {} definition(s).", candidates.len())),
                Line::from(""),
                help_kv("j/Enter", "Jump to callee", 8, key_style),
                help_kv("o", "Open source", 8, key_style),
                help_kv("Esc", "Cancel", 8, key_style),
            ],
        ),
        Dialog::CommentEditor { node_id, buffer } => (
            centered_rect(70, 30, main_area),
            dialog_block(&format!("Comment {node_id}"), focus),
            vec![
                Line::from(vec![
                    Span::raw(buffer.clone()),
                    Span::styled("█", Style::default().fg(FOOTER_LABEL_COLOR)),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter saves, empty text removes the comment, Esc cancels.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
        Dialog::CommentList { entries, cursor, picked } => {
            let first = cursor.saturating_sub(MAX_COMMENT_LIST_SIZE - 1);
            let mut lines = entries
                .iter()
                .enumerate()
                .skip(first)
                .take(MAX_COMMENT_LIST_SIZE)
                .map(|(idx, entry)| {
                    let check = if picked.contains(&idx) { "[x]" } else { "[ ]" };
                    let text = format!("{check} {}: {}", entry.id, entry.comment);
                    let style = if idx == *cursor {
                        app.theme.cursor_style()
                    } else {
                        app.theme.comment_style()
                    };
                    Line::from(Span::styled(text, style))
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Space picks, Enter jumps, Esc cancels.",
                Style::default().fg(Color::DarkGray),
            )));
            (
                centered_rect(70, 50, main_area),
                dialog_block(&format!("Comments ({})", entries.len()), focus),
                lines,
            )
        }
        Dialog::ExpandConfirm { node_id, descendants } => (
            centered_rect(60, 25, main_area),
            dialog_block("Expand all", focus),
            vec![
                Line::from(format!("Expand {descendants} nodes below {node_id}?")),
                Line::from(""),
                help_kv("y/Enter", "Expand", 8, key_style),
                help_kv("n/Esc", "Cancel", 8, key_style),
            ],
        ),
        Dialog::Alert(message) => (
            centered_rect(60, 25, main_area),
            dialog_block("Log failure", app.theme.error_style()),
            vec![
                Line::from(Span::styled(message.clone(), app.theme.error_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
    };

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_with_separator(spans, label, value, " | ");
}

fn push_footer_entry_with_separator(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    separator: &'static str,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            separator.to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
