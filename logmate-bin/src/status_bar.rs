use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};
use std::time::{Duration, Instant};

/// transient footer message, e.g. after copying lines to the clipboard
pub struct Notice {
    pub text: String,
    pub duration: Duration,
    pub start_time: Instant,
}

impl Notice {
    pub fn new(text: String, duration: Duration) -> Self {
        Self {
            text,
            duration,
            start_time: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }

    pub fn check_and_clear(notice: Option<Self>) -> Option<Self> {
        match notice {
            Some(n) if n.is_expired() => None,
            other => other,
        }
    }
}

/// one-row footer: left text, centered text, right text
#[derive(Default)]
pub struct StatusBar {
    left: Vec<Span<'static>>,
    mid: Vec<Span<'static>>,
    right: Vec<Span<'static>>,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, text: impl Into<String>, style: Style) -> Self {
        self.left.push(Span::styled(text.into(), style));
        self
    }

    pub fn mid(mut self, text: impl Into<String>, style: Style) -> Self {
        self.mid.push(Span::styled(text.into(), style));
        self
    }

    pub fn right(mut self, text: impl Into<String>, style: Style) -> Self {
        self.right.push(Span::styled(text.into(), style));
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn width(spans: &[Span<'_>]) -> usize {
        spans.iter().map(Span::width).sum()
    }

    /// lay the three groups out on one line of `total_width` columns
    fn compose(self, total_width: usize) -> Line<'static> {
        let left_len = Self::width(&self.left);
        let mid_len = Self::width(&self.mid);
        let right_len = Self::width(&self.right);

        let mid_start = total_width.saturating_sub(mid_len) / 2;
        let left_to_mid = mid_start.saturating_sub(left_len);
        let right_start = total_width.saturating_sub(right_len);
        let mid_to_right = right_start.saturating_sub(mid_start + mid_len);

        let mut spans = self.left;
        spans.push(Span::raw(" ".repeat(left_to_mid)));
        spans.extend(self.mid);
        spans.push(Span::raw(" ".repeat(mid_to_right)));
        spans.extend(self.right);

        Line::from(spans)
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.style;
        let line = self.compose(area.width as usize);
        Paragraph::new(line).style(style).render(area, buf);
    }
}
