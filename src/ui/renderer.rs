use crate::core::app::App;
use crate::core::message::Role;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const SIDEBAR_WIDTH: u16 = 30;
/// Below this terminal width the sidebar is folded into the transcript title.
pub const SIDEBAR_MIN_TOTAL_WIDTH: u16 = 70;
const MAX_INPUT_LINES: u16 = 5;

const INPUT_TITLE: &str = "Message Ollama AI... (Enter to send, Alt+Enter for newline)";
const INPUT_BUSY_TITLE: &str = "Waiting for the reply...";
const STATUS_HINT: &str = "/help for commands • Ctrl+T theme • Ctrl+C quit";

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.ui.theme;
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let main_area = if area.width >= SIDEBAR_MIN_TOTAL_WIDTH {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        render_sidebar(f, app, columns[0]);
        columns[1]
    } else {
        area
    };

    let input_lines = input_line_count(app.ui.input(), main_area.width.saturating_sub(2));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2), // +2 for borders
        ])
        .split(main_area);

    render_transcript(f, app, chunks[0], main_area.width < area.width);
    render_status(f, app, chunks[1]);
    render_input(f, app, chunks[2]);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let connected = app.is_connected();

    let (indicator_style, connection, connection_detail) = if connected {
        (theme.connected_style, "Connected", "Ollama Server Online")
    } else {
        (theme.disconnected_style, "Disconnected", "Check Ollama Server")
    };

    let lines = vec![
        Line::from(Span::styled("Ollama Chat", theme.title_style)),
        Line::from(Span::styled("Local AI assistant", theme.muted_text_style)),
        Line::default(),
        Line::from(vec![
            Span::styled("● ", indicator_style),
            Span::styled(connection, theme.secondary_text_style),
        ]),
        Line::from(Span::styled(
            format!("  {connection_detail}"),
            theme.muted_text_style,
        )),
        Line::default(),
        Line::from(Span::styled("AI Model", theme.secondary_text_style)),
        Line::from(Span::styled(
            format!("  {}", app.session.model),
            theme.accent_style,
        )),
        Line::default(),
        Line::from(Span::styled("Messages", theme.secondary_text_style)),
        Line::from(Span::styled(
            format!("  {}", visible_turn_count(app)),
            theme.accent_style,
        )),
        Line::default(),
        Line::from(Span::styled("Theme", theme.secondary_text_style)),
        Line::from(Span::styled(
            format!("  {}", app.ui.theme_kind.as_str()),
            theme.accent_style,
        )),
    ];

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme.muted_text_style)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(theme.sidebar_background));

    let footer_height = 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
        .split(block.inner(area));

    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), rows[0]);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Private and local: chats never leave this machine",
            theme.muted_text_style,
        )))
        .wrap(Wrap { trim: true }),
        rows[1],
    );
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect, sidebar_visible: bool) {
    let theme = &app.ui.theme;
    let lines = build_display_lines(app);

    let block = if sidebar_visible {
        Block::default().padding(Padding::horizontal(1))
    } else {
        let connection = if app.is_connected() {
            "Online"
        } else {
            "Offline"
        };
        Block::default()
            .title(Line::from(Span::styled(
                format!("Ollama Chat • {} • {}", app.session.model, connection),
                theme.title_style,
            )))
            .padding(Padding::horizontal(1))
    };

    let inner = block.inner(area);
    let total_wrapped_lines = wrapped_line_count(&lines, inner.width);
    let scroll_offset = scroll_offset_for(
        total_wrapped_lines,
        inner.height,
        app.ui.scroll_from_bottom,
    );

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));

    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let line = match app.ui.status.as_deref() {
        Some(status) => Line::from(Span::styled(status.to_string(), theme.status_style)),
        None => Line::from(Span::styled(STATUS_HINT, theme.muted_text_style)),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let busy = app.is_busy();

    let (title, text_style) = if busy {
        (
            Span::styled(INPUT_BUSY_TITLE, theme.input_disabled_style),
            theme.input_disabled_style,
        )
    } else {
        (
            Span::styled(INPUT_TITLE, theme.input_title_style),
            theme.input_text_style,
        )
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(if busy {
            theme.input_disabled_style
        } else {
            theme.input_border_style
        })
        .title(Line::from(title));

    if app.ui.is_activity_indicator_visible() {
        let symbol = pulse_symbol(app.ui.activity_elapsed_ms());
        block = block.title_bottom(
            Line::from(Span::styled(format!(" {symbol} "), theme.thinking_indicator_style))
                .right_aligned(),
        );
    }

    let inner_width = area.width.saturating_sub(2);
    let rows = wrap_input(app.ui.input(), inner_width);
    let visible_rows = area.height.saturating_sub(2).max(1);
    let last_row = saturating_u16(rows.len() - 1);
    let input_scroll = last_row.saturating_add(1).saturating_sub(visible_rows);
    let last_row_width = rows
        .last()
        .map(|row| saturating_u16(UnicodeWidthStr::width(row.as_str())))
        .unwrap_or(0);

    let input = Paragraph::new(rows.into_iter().map(Line::from).collect::<Vec<_>>())
        .style(text_style)
        .block(block)
        .scroll((input_scroll, 0));

    f.render_widget(input, area);

    if !busy {
        let cursor_x = area.x + 1 + last_row_width.min(inner_width.saturating_sub(1));
        let cursor_y = area.y + 1 + (last_row - input_scroll);
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Input text split into display rows of at most `width` columns. A row
/// that fills the width is followed by an empty one for the cursor.
pub fn wrap_input(input: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();

    for line in input.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;
        for ch in line.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if row_width + ch_width > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += ch_width;
        }
        rows.push(row);
    }

    if rows
        .last()
        .is_some_and(|row| UnicodeWidthStr::width(row.as_str()) >= width)
    {
        rows.push(String::new());
    }
    rows
}

fn saturating_u16(value: usize) -> u16 {
    value.min(u16::MAX as usize) as u16
}

/// Turns the transcript pane shows; empty placeholders are hidden.
fn visible_turn_count(app: &App) -> usize {
    app.transcript
        .turns()
        .iter()
        .filter(|turn| !turn.content.is_empty())
        .count()
}

/// Transcript lines as rendered: a role header per turn followed by its
/// content, and a thinking row while a reply is pending with no text yet.
pub fn build_display_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.ui.theme;
    let mut lines = Vec::new();

    for turn in app.transcript.turns() {
        if turn.content.is_empty() {
            continue;
        }
        let (label, prefix_style, text_style) = role_styles(theme, turn.role);
        lines.push(Line::from(Span::styled(label, prefix_style)));
        for content_line in turn.content.split('\n') {
            lines.push(Line::from(Span::styled(
                content_line.to_string(),
                text_style,
            )));
        }
        lines.push(Line::default());
    }

    if app.is_busy() && !reply_has_text(app) {
        let dots = ".".repeat(1 + (app.ui.activity_elapsed_ms() / 400 % 3) as usize);
        lines.push(Line::from(Span::styled(
            "AI",
            theme.assistant_prefix_style,
        )));
        lines.push(Line::from(Span::styled(
            format!("AI is thinking{dots}"),
            theme.thinking_indicator_style,
        )));
    }

    lines
}

fn reply_has_text(app: &App) -> bool {
    app.transcript.has_in_progress()
        && app
            .transcript
            .last()
            .is_some_and(|turn| !turn.content.is_empty())
}

fn role_styles(theme: &Theme, role: Role) -> (&'static str, Style, Style) {
    match role {
        Role::User => ("You", theme.user_prefix_style, theme.user_text_style),
        Role::Assistant => (
            "AI",
            theme.assistant_prefix_style,
            theme.assistant_text_style,
        ),
    }
}

/// Rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let total: usize = lines
        .iter()
        .map(|line| {
            let line_width: usize = line
                .spans
                .iter()
                .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
                .sum();
            line_width.div_ceil(width).max(1)
        })
        .sum();
    total.min(u16::MAX as usize) as u16
}

/// Top offset for the transcript given how far the user scrolled up from the
/// newest line.
pub fn scroll_offset_for(total_lines: u16, visible_height: u16, from_bottom: u16) -> u16 {
    let max_offset = total_lines.saturating_sub(visible_height);
    max_offset.saturating_sub(from_bottom.min(max_offset))
}

fn input_line_count(input: &str, width: u16) -> u16 {
    saturating_u16(wrap_input(input, width).len()).clamp(1, MAX_INPUT_LINES)
}

fn pulse_symbol(elapsed_ms: u128) -> &'static str {
    let phase = (elapsed_ms % 1000) as f32 / 500.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}
