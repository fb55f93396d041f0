use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 18, 20);
pub const SURFACE: Color = Color::Rgb(22, 28, 32);
pub const BORDER: Color = Color::Rgb(46, 60, 66);
pub const TEXT: Color = Color::Rgb(226, 232, 228);
pub const TEXT_DIM: Color = Color::Rgb(120, 134, 136);
pub const GOLD: Color = Color::Rgb(241, 196, 15);
pub const GREEN: Color = Color::Rgb(46, 204, 113);
pub const RED: Color = Color::Rgb(231, 76, 60);
pub const BLUE: Color = Color::Rgb(41, 128, 185);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn blue() -> Style {
    Style::default().fg(BLUE)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

/// Owed → red, settled → gold, ahead → green.
pub fn balance(balance: i64) -> Style {
    let style = if balance > 0 {
        red()
    } else if balance < 0 {
        green()
    } else {
        gold()
    };
    style.add_modifier(Modifier::BOLD)
}
