use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::store::TrackerStore;
use crate::tui::theme;
use crate::utils::format::pad_display;

pub fn render(frame: &mut Frame, area: Rect, store: &TrackerStore, focused_idx: usize) {
    let category = store.category();
    let block = Block::default()
        .title(Span::styled(format!(" {} ", category.title()), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        format!(
            "    {}{:>8}{:>11}{:>9}",
            pad_display("", 16),
            "Missed",
            "Completed",
            "Balance"
        ),
        theme::dim(),
    )))];

    for (i, c) in store.counters().iter().enumerate() {
        let is_focused = i == focused_idx;
        let marker = if is_focused { "  ▸ " } else { "    " };
        let name_style = if is_focused {
            theme::gold().add_modifier(Modifier::BOLD)
        } else {
            theme::bold()
        };
        let balance = c.missed as i64 - c.completed as i64;

        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, theme::gold()),
            Span::styled(pad_display(&category.label(&c.id), 16), name_style),
            Span::styled(format!("{:>8}", c.missed), theme::red()),
            Span::styled(format!("{:>11}", c.completed), theme::green()),
            Span::styled(format!("{:>9}", balance), theme::balance(balance)),
        ])));
    }

    let owed = store.total_outstanding();
    items.push(ListItem::new(Line::from("")));
    items.push(ListItem::new(Line::from(if owed == 0 {
        Span::styled("    ✓ Nothing outstanding", theme::green())
    } else {
        Span::styled(
            format!("    {} {}s outstanding", owed, category.noun()),
            theme::red(),
        )
    })));

    frame.render_widget(List::new(items).block(block), area);
}
