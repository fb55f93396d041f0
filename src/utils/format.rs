use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

/// Format a money amount with a currency prefix and two decimals.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, currency, group_thousands(rounded.abs()))
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{}", grouped, frac)
}

/// Format a history date as "19 Oct 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Render a 0..=1 ratio as a percentage with two decimals
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Right-pad to a display width, counting wide glyphs correctly.
pub fn pad_display(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
