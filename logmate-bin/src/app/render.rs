use super::{App, HELP_POPUP_WIDTH, LoadStatus};
use crate::{status_bar::StatusBar, theme};
use logmate_engine::{Line as LogLine, SearchState};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const TAB_WIDTH: usize = 4;

/// terminal-safe copy of a log line: tabs expand, other control chars drop
fn sanitize_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// one row of the log view: line-number gutter, then the colored text with
/// query matches emphasized
fn log_row(
    line: &LogLine,
    gutter_width: usize,
    search: &SearchState,
    highlighted: bool,
) -> Line<'static> {
    let text = sanitize_control_chars(&line.text);
    let base_style = Style::default().fg(theme::category_color(line.category));

    let mut spans = vec![Span::styled(
        format!("{:>width$} ", line.index + 1, width = gutter_width),
        theme::GUTTER_STYLE,
    )];

    let mut last = 0;
    for range in search.highlight_ranges(&text) {
        if last < range.start {
            spans.push(Span::styled(text[last..range.start].to_string(), base_style));
        }
        spans.push(Span::styled(
            text[range.clone()].to_string(),
            base_style.add_modifier(theme::MATCH_MODIFIER),
        ));
        last = range.end;
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_string(), base_style));
    }

    let row = Line::from(spans);
    if highlighted {
        row.style(theme::SELECTED_STYLE)
    } else {
        row
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stats_rows = match (&self.session, self.show_stats) {
            (Some(session), true) => session.summary().stats_lines(&chrono::Local),
            _ => Vec::new(),
        };
        let stats_height = if stats_rows.is_empty() {
            0
        } else {
            stats_rows.len() as u16 + 2
        };
        let search_height = if self.search_focused || !self.search_input.is_empty() {
            3
        } else {
            0
        };

        let [categories_area, stats_area, search_area, logs_area, footer_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(stats_height),
                Constraint::Length(search_height),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        self.render_categories(categories_area, buf);
        if stats_height > 0 {
            render_stats(stats_rows, stats_area, buf);
        }
        if search_height > 0 {
            self.render_search(search_area, buf);
        }
        self.render_logs(logs_area, buf);
        self.render_footer(footer_area, buf);

        if self.show_help_popup {
            self.render_help_popup(area, buf);
        }
    }
}

fn render_stats(rows: Vec<String>, area: Rect, buf: &mut Buffer) {
    let block = Block::default().title(" Stats ").borders(Borders::ALL);
    let text: Vec<Line> = rows.into_iter().map(Line::from).collect();
    Paragraph::new(text).block(block).render(area, buf);
}

impl App {
    fn render_categories(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Categories ")
            .borders(Borders::ALL);

        let line = match &self.session {
            None => Line::styled("Loading...", theme::DIM_STYLE),
            Some(session) if session.category_index().is_empty() => {
                Line::styled("No categorized lines", theme::DIM_STYLE)
            }
            Some(session) => {
                let mut spans = Vec::new();
                for cat in session.category_index().categories() {
                    if !spans.is_empty() {
                        spans.push(Span::raw("  "));
                    }
                    let mut style = Style::default().fg(theme::category_color(Some(cat)));
                    if self.picked_category == Some(cat) {
                        style = style.add_modifier(theme::PICKED_MODIFIER);
                    }
                    spans.push(Span::styled(format!(" {} ", session.category_label(cat)), style));
                }
                Line::from(spans)
            }
        };

        Paragraph::new(line).block(block).render(area, buf);
    }

    fn render_search(&self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default().title(" Search ").borders(Borders::ALL);
        if self.search_focused {
            block = block.border_style(theme::FOCUS_BORDER_STYLE);
        }

        let counter = self.session.as_ref().and_then(|session| {
            let search = session.search();
            if search.query().is_empty() {
                None
            } else {
                Some(search.counter().unwrap_or_else(|| "No matches".to_string()))
            }
        });
        if let Some(counter) = counter {
            block = block.title(Line::from(format!(" {} ", counter)).right_aligned());
        }

        let mut spans = vec![Span::raw("/"), Span::raw(self.search_input.clone())];
        if self.search_focused {
            spans.push(Span::styled("_", theme::DIM_STYLE));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }

    fn render_logs(&mut self, area: Rect, buf: &mut Buffer) {
        let total = self.session.as_ref().map_or(0, |s| s.lines().len());
        let block = Block::default()
            .title(format!(" {} - {} lines ", self.file_name(), total))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        // viewport size is only known here; scroll state follows it
        self.viewport_height = (inner.height as usize).max(1);
        if self.follow_pending {
            self.follow_highlight();
            self.follow_pending = false;
        }
        self.clamp_scroll();

        let Some(session) = self.session.as_ref() else {
            let message = match &self.status {
                LoadStatus::Failed(reason) => {
                    Line::styled(format!("Failed to load: {}", reason), theme::FAILURE_STYLE)
                }
                _ => Line::styled("Loading...", theme::DIM_STYLE),
            };
            Paragraph::new(message).render(inner, buf);
            return;
        };

        let lines = session.lines();
        let gutter_width = digits(lines.len());
        let search = session.search();
        let highlighted = session.highlighted_line();

        let end = (self.scroll + inner.height as usize).min(lines.len());
        let start = self.scroll.min(end);
        let rows: Vec<Line> = lines[start..end]
            .iter()
            .map(|line| log_row(line, gutter_width, search, highlighted == Some(line.index)))
            .collect();

        Paragraph::new(rows).render(inner, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let (left_text, left_style) = match &self.status {
            LoadStatus::Loading => ("Loading...".to_string(), theme::DIM_STYLE),
            LoadStatus::Loaded => (format!("Opened: {}", self.file_name()), theme::DIM_STYLE),
            LoadStatus::Failed(reason) => (format!("Failed: {}", reason), theme::FAILURE_STYLE),
        };

        let mut status_bar = StatusBar::new()
            .left(left_text, left_style)
            .right(format!("v{}", env!("CARGO_PKG_VERSION")), theme::DIM_STYLE);

        status_bar = if let Some(notice) = &self.notice {
            status_bar.mid(notice.text.clone(), theme::NOTICE_STYLE)
        } else if self.search_focused {
            status_bar.mid(format!("/{}", self.search_input), Style::default())
        } else {
            status_bar.mid("?: help | q: quit", Style::default())
        };

        status_bar.render(area, buf);
    }

    fn render_help_popup(&self, area: Rect, buf: &mut Buffer) {
        let help_text = vec![
            Line::from("Navigation:".bold()),
            Line::from("  j/k/↑/↓    - Move to next/prev line (or match)"),
            Line::from("  ^d/^u      - Move half a page down/up"),
            Line::from("  g/G        - Go to top/bottom (clears search)"),
            Line::from(""),
            Line::from("Search:".bold()),
            Line::from("  /          - Type a search query"),
            Line::from("  n/N        - Next/prev match"),
            Line::from("  Esc        - Clear search"),
            Line::from(""),
            Line::from("Categories:".bold()),
            Line::from("  Tab/S-Tab  - Pick next/prev category"),
            Line::from("  ]/[        - Next/prev line of the category"),
            Line::from("  y          - Copy category lines to clipboard"),
            Line::from(""),
            Line::from("Other:".bold()),
            Line::from("  t          - Toggle stats"),
            Line::from("  r          - Reload file"),
            Line::from("  q          - Quit program"),
        ];

        let popup_height = help_text.len() as u16 + 2;

        let popup_area = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(popup_height),
            Constraint::Fill(1),
        ])
        .split(area)[1];

        let popup_area = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(HELP_POPUP_WIDTH),
            Constraint::Fill(1),
        ])
        .split(popup_area)[1];

        Clear.render(popup_area, buf);

        let block = Block::default().title(" Help ").borders(Borders::ALL);
        Paragraph::new(help_text).block(block).render(popup_area, buf);
    }
}
