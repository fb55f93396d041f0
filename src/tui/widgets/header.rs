use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::TrackerCategory;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, hijri_str: &str, active: TrackerCategory) {
    let gregorian_str = Local::now().format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  مُحاسَبة  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("muhasaba", theme::gold()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(hijri_str, theme::gold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian_str, theme::dim()),
    ]);

    let mut tabs = Vec::new();
    for (i, category) in TrackerCategory::all().into_iter().enumerate() {
        if i > 0 {
            tabs.push(Span::styled("   │   ", theme::dim()));
        }
        let style = if category == active {
            theme::gold().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            theme::dim()
        };
        tabs.push(Span::styled(category.title(), style));
    }

    let text = vec![title_line, date_line, Line::from(tabs)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
