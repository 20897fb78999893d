use std::borrow::Cow;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::app::{Candidate, SelectMode, SelectorState};
use crate::tui::pager::{Pager, PagerState};
use crate::tui::theme::Styles;

const ELLIPSIS: &str = "…";

/// Cut `s` to at most `max_width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if s.width() <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - ELLIPSIS.width();
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

pub fn render_pager(frame: &mut Frame, pager: &Pager, styles: &Styles) {
    let PagerState::Ready {
        header_height,
        footer_height,
        ..
    } = pager.state()
    else {
        frame.render_widget(Paragraph::new("\n  Initializing..."), frame.area());
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(footer_height),
        ])
        .split(frame.area());

    render_title_bar(frame, pager.title(), chunks[0], styles);

    let body: Vec<Line> = pager
        .visible_lines()
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(body), chunks[1]);

    render_scroll_bar(frame, &pager.scroll_percent(), chunks[2], styles);
}

/// Boxed title on the left, rule to the right.
fn render_title_bar(frame: &mut Frame, title: &str, area: Rect, styles: &Styles) {
    let chrome = styles.bar_chrome_width();
    let title = truncate_to_width(title, usize::from(area.width.saturating_sub(chrome)));
    let box_width = (title.width() as u16 + chrome).min(area.width);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(box_width), Constraint::Min(0)])
        .split(area);

    let label = Paragraph::new(Span::styled(title, styles.title)).block(styles.bar_block());
    frame.render_widget(label, chunks[0]);
    frame.render_widget(rule(chunks[1], styles.border), chunks[1]);
}

/// Rule on the left, boxed percentage on the right.
fn render_scroll_bar(frame: &mut Frame, percent: &str, area: Rect, styles: &Styles) {
    let box_width = (percent.width() as u16 + styles.bar_chrome_width()).min(area.width);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(box_width)])
        .split(area);

    frame.render_widget(rule(chunks[0], styles.border), chunks[0]);
    let info = Paragraph::new(Span::styled(percent.to_string(), styles.scroll_info))
        .block(styles.bar_block());
    frame.render_widget(info, chunks[1]);
}

/// A horizontal line through the vertical middle of `area`.
fn rule(area: Rect, style: Style) -> Paragraph<'static> {
    let middle = area.height / 2;
    let lines: Vec<Line> = (0..area.height)
        .map(|row| {
            if row == middle {
                Line::styled("─".repeat(usize::from(area.width)), style)
            } else {
                Line::default()
            }
        })
        .collect();
    Paragraph::new(lines)
}

pub fn render_selector(frame: &mut Frame, state: &mut SelectorState<'_>, styles: &Styles) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(frame.area());

    let status_height = u16::from(state.status_message.is_some());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(status_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(columns[0]);

    render_candidates(frame, state, rows[0], styles);
    if let Some(message) = &state.status_message {
        let status = Paragraph::new(message.as_str()).style(styles.status);
        frame.render_widget(status, rows[1]);
    }
    render_counter(frame, state, rows[2], styles);
    render_prompt(frame, state, rows[3], styles);
    render_preview(frame, state, columns[1], styles);
}

fn render_candidates(frame: &mut Frame, state: &mut SelectorState<'_>, area: Rect, styles: &Styles) {
    let multi = state.mode() == SelectMode::Multi;
    let rows: Vec<ListItem> = state
        .matches
        .iter()
        .map(|candidate| {
            let mut spans = Vec::new();
            if multi {
                let marker = if state.is_marked(candidate.index) { "* " } else { "  " };
                spans.push(Span::styled(marker, styles.marked));
            }
            let label = state.label(candidate.index).unwrap_or_default();
            spans.extend(highlight_label(label, candidate, styles));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(rows)
        .highlight_style(styles.selection)
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state.list_state);
}

/// Split a label into spans, styling the characters the query matched.
fn highlight_label(label: &str, candidate: &Candidate, styles: &Styles) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;

    for (i, c) in label.chars().enumerate() {
        let matched = candidate.positions.contains(&i);
        if matched != run_matched && !run.is_empty() {
            let style = if run_matched { styles.match_highlight } else { Style::default() };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_matched = matched;
        run.push(c);
    }
    if !run.is_empty() {
        let style = if run_matched { styles.match_highlight } else { Style::default() };
        spans.push(Span::styled(run, style));
    }
    spans
}

fn render_counter(frame: &mut Frame, state: &SelectorState<'_>, area: Rect, styles: &Styles) {
    let mut text = format!("  {}/{}", state.matches.len(), state.total());
    if state.mode() == SelectMode::Multi && !state.marked.is_empty() {
        text.push_str(&format!(" ({} marked)", state.marked.len()));
    }
    frame.render_widget(Paragraph::new(Span::styled(text, styles.counter)), area);
}

fn render_prompt(frame: &mut Frame, state: &SelectorState<'_>, area: Rect, styles: &Styles) {
    let line = Line::from(vec![
        Span::styled("> ", styles.prompt),
        Span::raw(state.query.clone()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + 2 + state.query.width() as u16;
    if cursor_x < area.x + area.width {
        frame.set_cursor_position((cursor_x, area.y));
    }
}

fn render_preview(frame: &mut Frame, state: &SelectorState<'_>, area: Rect, styles: &Styles) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.preview_border)
        .title(" Preview ");

    let text = state.preview().map(Text::raw).unwrap_or_default();
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
