use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, flash: Option<&(String, Style)>) {
    let line = match flash {
        Some((message, style)) => Line::from(Span::styled(message.as_str(), *style)),
        None => {
            let hints = [
                ("[m]", " missed  "),
                ("[c]", " completed  "),
                ("[x]", " clear  "),
                ("[Tab]", " prayers/fasts  "),
                ("[?]", " help  "),
                ("[Esc]", " quit"),
            ];
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(key, theme::gold()));
                spans.push(Span::styled(label, theme::dim()));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
