use logmate_engine::Category;
use ratatui::{prelude::*, style::Color};

pub const ORANGE: Color = Color::Rgb(255, 165, 0);

/// foreground color of a line of the given category
pub fn category_color(category: Option<Category>) -> Color {
    match category {
        Some(Category::Info) => Color::LightBlue,
        Some(Category::Note) => Color::LightMagenta,
        Some(Category::Warning) => ORANGE,
        Some(Category::Debug) => Color::Gray,
        Some(Category::Error) => Color::LightRed,
        None => Color::Reset,
    }
}

pub const SELECTED_STYLE: Style = Style::new().bg(Color::DarkGray);

pub const GUTTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const MATCH_MODIFIER: Modifier = Modifier::BOLD.union(Modifier::UNDERLINED);

pub const PICKED_MODIFIER: Modifier = Modifier::BOLD.union(Modifier::REVERSED);

pub const NOTICE_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FAILURE_STYLE: Style = Style::new().fg(Color::LightRed);

pub const FOCUS_BORDER_STYLE: Style = Style::new().fg(Color::LightGreen);

pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
