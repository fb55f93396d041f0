use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{EventKind, HistoryEntry, TrackerCategory};
use crate::tui::theme;
use crate::utils::format::{format_date, pad_display};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    category: TrackerCategory,
    entries: &[HistoryEntry],
    limit: usize,
    total: usize,
) {
    let block = Block::default()
        .title(Span::styled(format!(" History (Last {} of {}) ", entries.len().min(limit), total), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("  No history yet", theme::dim())));
    }

    for h in entries {
        let status_style = match h.kind {
            EventKind::Missed => theme::red(),
            EventKind::Completed => theme::green(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  • {}  →  ", format_date(h.date)), theme::dim()),
            Span::styled(pad_display(&category.label(&h.counter_id), 15), theme::bold()),
            Span::styled(h.kind.as_str(), status_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
