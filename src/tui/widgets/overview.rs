use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{GoalKind, SavingsGoal};
use crate::tui::theme;
use crate::utils::format::{format_amount, format_percent, pad_display, progress_bar};

/// Read-only snapshot of the finance side, refreshed when the app loads.
#[derive(Debug, Clone, Default)]
pub struct FinanceSnapshot {
    pub assets: f64,
    pub liabilities: f64,
    pub zakat_due: Option<f64>,
    pub goals: Vec<(GoalKind, SavingsGoal)>,
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &FinanceSnapshot,
    prayers_owed: u32,
    fasts_owed: u32,
    currency: &str,
) {
    let block = Block::default()
        .title(Span::styled(" Overview ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let owed_style = |n: u32| if n == 0 { theme::green() } else { theme::red() };
    let net = snapshot.assets - snapshot.liabilities;

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(pad_display("  Prayers owed", 18), theme::dim()),
            Span::styled(prayers_owed.to_string(), owed_style(prayers_owed)),
        ]),
        Line::from(vec![
            Span::styled(pad_display("  Fasts owed", 18), theme::dim()),
            Span::styled(fasts_owed.to_string(), owed_style(fasts_owed)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(pad_display("  Net worth", 18), theme::dim()),
            Span::styled(
                format_amount(net, currency),
                theme::bold().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    if let Some(due) = snapshot.zakat_due {
        lines.push(Line::from(vec![
            Span::styled(pad_display("  Zakat due", 18), theme::dim()),
            Span::styled(format_amount(due, currency), theme::blue()),
        ]));
    }

    lines.push(Line::from(""));
    let bar_width = (area.width.saturating_sub(30) as usize).clamp(6, 20);
    for (kind, goal) in &snapshot.goals {
        let style = if goal.progress() >= 1.0 {
            theme::green()
        } else {
            theme::gold()
        };
        lines.push(Line::from(vec![
            Span::styled(pad_display(&format!("  {}", kind.display_name()), 10), theme::dim()),
            Span::styled(progress_bar(goal.progress(), bar_width), style),
            Span::styled(format!("  {}", format_percent(goal.progress())), theme::dim()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
