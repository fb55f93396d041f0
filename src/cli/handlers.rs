use anyhow::{Context, Result};
use rusqlite::Connection;
use std::str::FromStr;

use crate::cli::args::{LedgerCommands, SavingsCommands, TrackerCommands, ZakatCommands};
use crate::config::AppConfig;
use crate::db::{KvRepo, MetaRepo};
use crate::error::AppError;
use crate::models::{
    Counter, EventKind, GoalKind, LedgerItem, LedgerKind, TrackerCategory, ZakatField,
};
use crate::store::{LedgerStore, SavingsStore, TrackerStore, ZakatStore};
use crate::utils::format::{
    format_amount, format_date, format_percent, pad_display, progress_bar,
};
use crate::utils::hijri::hijri_string;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn balance_color(counter: &Counter) -> &'static str {
    if counter.balance() > 0 { RED } else { GOLD }
}

fn open_tracker<'a>(
    conn: &'a Connection,
    config: &AppConfig,
    category: TrackerCategory,
) -> TrackerStore<'a> {
    TrackerStore::load(conn, category, config.tracker.options())
}

fn resolve_id(store: &TrackerStore, name: &str) -> Result<String> {
    store.find_id(name).map(str::to_string).ok_or_else(|| {
        let expected = store
            .counters()
            .iter()
            .map(|c| c.id.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::UnknownCounter {
            kind: store.category().noun(),
            name: name.to_string(),
            expected,
        }
        .into()
    })
}

// ─── Prayer / fast trackers ─────────────────────────────────────────────────

pub fn handle_tracker(
    conn: &Connection,
    config: &AppConfig,
    category: TrackerCategory,
    action: &TrackerCommands,
) -> Result<()> {
    let mut store = open_tracker(conn, config, category);

    match action {
        TrackerCommands::Missed { name } => {
            let id = resolve_id(&store, name)?;
            if let Some(r) = store.record_event(&id, EventKind::Missed) {
                println_colored!(
                    RED,
                    "  ✗ {} recorded as missed — {} owed",
                    category.label(&id),
                    r.counter.balance()
                );
            }
        }
        TrackerCommands::Done { name } => {
            let id = resolve_id(&store, name)?;
            if let Some(r) = store.record_event(&id, EventKind::Completed) {
                if r.applied {
                    println_colored!(
                        GREEN,
                        "  ✓ {} made up — {} still owed",
                        category.label(&id),
                        r.counter.balance()
                    );
                } else {
                    println_colored!(
                        DIM,
                        "  Nothing owed for {}, nothing recorded",
                        category.label(&id)
                    );
                }
            }
        }
        TrackerCommands::Clear { name } => {
            let id = resolve_id(&store, name)?;
            let owed = store.counter(&id).map(Counter::balance).unwrap_or(0);
            if store.clear(&id).is_some() {
                println_colored!(
                    AMBER,
                    "  {} reset to zero ({} were owed)",
                    category.label(&id),
                    owed
                );
            }
        }
        TrackerCommands::List => print_counters(&store),
    }
    Ok(())
}

fn print_counters(store: &TrackerStore) {
    let category = store.category();
    println!();
    println_colored!(GOLD, "  {}", category.title());
    println!();
    println_colored!(
        DIM,
        "  {}{:>8}{:>11}{:>9}",
        pad_display("", 16),
        "Missed",
        "Completed",
        "Balance"
    );
    for c in store.counters() {
        println!(
            "  {}{:>8}{:>11}{}{:>9}\x1b[0m",
            pad_display(&category.label(&c.id), 16),
            c.missed,
            c.completed,
            balance_color(c),
            c.balance()
        );
    }
    println!();
    let owed = store.total_outstanding();
    if owed == 0 {
        println_colored!(GREEN, "  ✓ Nothing outstanding");
    } else {
        println_colored!(AMBER, "  {} {}s outstanding", owed, category.noun());
    }
    println!();
}

// ─── History ─────────────────────────────────────────────────────────────────

pub fn handle_history(
    conn: &Connection,
    config: &AppConfig,
    fasts: bool,
    limit: Option<usize>,
    hijri: bool,
) -> Result<()> {
    let category = if fasts {
        TrackerCategory::Fasts
    } else {
        TrackerCategory::Prayers
    };
    let store = open_tracker(conn, config, category);
    let limit = limit.unwrap_or(config.tracker.history_limit);
    let entries = store.history(limit);

    println!();
    println_colored!(GOLD, "  {} history (last {})", category.title(), limit);
    println!();
    if entries.is_empty() {
        println_colored!(DIM, "  No history yet");
    }
    for h in &entries {
        let color = match h.kind {
            EventKind::Missed => RED,
            EventKind::Completed => GREEN,
        };
        let hijri_col = if hijri {
            hijri_string(h.date, config.display.hijri_offset)
                .map(|s| format!("  {}", pad_display(&s, 26)))
                .unwrap_or_default()
        } else {
            String::new()
        };
        println!(
            "  • {}{}  →  {}{}{}\x1b[0m",
            format_date(h.date),
            hijri_col,
            pad_display(&category.label(&h.counter_id), 16),
            color,
            h.kind
        );
    }
    println!();
    Ok(())
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

pub fn handle_ledger(
    conn: &Connection,
    config: &AppConfig,
    kind: &str,
    action: &LedgerCommands,
) -> Result<()> {
    let kind = LedgerKind::from_str(kind)?;
    let currency = &config.finance.currency;
    let mut ledger = LedgerStore::load(conn, kind);

    match action {
        LedgerCommands::Add { name, amount } => {
            ledger.add(LedgerItem::new(Some(name.as_str()), *amount));
            println_colored!(GREEN, "  ✓ Added to {}", kind.title());
        }
        LedgerCommands::Edit {
            index,
            name,
            amount,
        } => {
            let at = ledger_index(&ledger, *index)?;
            ledger.update(at, LedgerItem::new(Some(name.as_str()), *amount))?;
            println_colored!(GREEN, "  ✓ Updated item {}", index);
        }
        LedgerCommands::Delete { index } => {
            let at = ledger_index(&ledger, *index)?;
            let removed = ledger.delete(at)?;
            println_colored!(
                AMBER,
                "  Deleted {}",
                removed.name.as_deref().unwrap_or("-")
            );
        }
        LedgerCommands::List => {
            println!();
            println_colored!(GOLD, "  {}", kind.title());
            println!();
            if ledger.items().is_empty() {
                println_colored!(DIM, "  No items yet");
            }
            for (i, item) in ledger.items().iter().enumerate() {
                let amount = item
                    .amount
                    .map(|a| format_amount(a, currency))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:>3}. {}{:>16}",
                    i + 1,
                    pad_display(item.name.as_deref().unwrap_or("-"), 28),
                    amount
                );
            }
            println!();
            println_colored!(BOLD, "  Total: {}", format_amount(ledger.total(), currency));
            println!();
        }
    }
    Ok(())
}

/// Map a 1-based position, as printed by `list`, to a store index. Errors
/// carry the position the user typed.
fn ledger_index(ledger: &LedgerStore, position: usize) -> Result<usize, AppError> {
    let len = ledger.items().len();
    match position.checked_sub(1) {
        Some(index) if index < len => Ok(index),
        _ => Err(AppError::IndexOutOfRange {
            index: position,
            len,
        }),
    }
}

// ─── Zakat ───────────────────────────────────────────────────────────────────

pub fn handle_zakat(conn: &Connection, config: &AppConfig, action: &ZakatCommands) -> Result<()> {
    let currency = &config.finance.currency;
    let mut zakat = ZakatStore::load(conn);

    match action {
        ZakatCommands::Set { field, value } => {
            let field = ZakatField::from_str(field)?;
            zakat.set(field, Some(*value))?;
            println_colored!(
                GREEN,
                "  ✓ {} set to {}",
                field.display_name(),
                format_amount(*value, currency)
            );
        }
        ZakatCommands::Unset { field } => {
            let field = ZakatField::from_str(field)?;
            zakat.set(field, None)?;
            println_colored!(DIM, "  {} cleared", field.display_name());
        }
        ZakatCommands::Calc => {
            let due = zakat.calculate(config.finance.zakat_rate)?;
            println_colored!(
                GREEN,
                "  Total Zakat to pay: {}",
                format_amount(due, currency)
            );
        }
        ZakatCommands::Show => {
            let form = zakat.form();
            println!();
            println_colored!(GOLD, "  Zakat Calculator");
            println!();
            for field in ZakatField::all() {
                let value = form
                    .get(field)
                    .map(|v| format_amount(v, currency))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {}{:>16}", pad_display(field.display_name(), 18), value);
            }
            println!();
            println_colored!(
                BOLD,
                "  Zakatable wealth: {}",
                format_amount(form.total(), currency)
            );
            match form.result {
                Some(due) => println_colored!(
                    GREEN,
                    "  Zakat due ({}): {}",
                    format_percent(config.finance.zakat_rate),
                    format_amount(due, currency)
                ),
                None => println_colored!(DIM, "  Not calculated yet — run `muhasaba zakat calc`"),
            }
            println!();
        }
        ZakatCommands::Clear => {
            zakat.clear();
            println_colored!(AMBER, "  Zakat inputs cleared");
        }
    }
    Ok(())
}

// ─── Savings ─────────────────────────────────────────────────────────────────

pub fn handle_savings(
    conn: &Connection,
    config: &AppConfig,
    goal: &str,
    action: &SavingsCommands,
) -> Result<()> {
    let kind = GoalKind::from_str(goal)?;
    let currency = &config.finance.currency;
    let mut savings = SavingsStore::load(conn, kind, config.savings.default_target(kind));

    match action {
        SavingsCommands::Add { amount } => {
            let total = savings.add_savings(*amount)?;
            println_colored!(
                GREEN,
                "  ✓ Saved {} — {} total for {}",
                format_amount(*amount, currency),
                format_amount(total, currency),
                kind.display_name()
            );
        }
        SavingsCommands::Target { amount } => {
            savings.set_target(*amount)?;
            println_colored!(
                GREEN,
                "  ✓ New {} target is {}",
                kind.display_name(),
                format_amount(*amount, currency)
            );
        }
        SavingsCommands::Clear => {
            savings.clear_savings();
            println_colored!(AMBER, "  {} savings reset to zero", kind.display_name());
        }
        SavingsCommands::Note { text } => {
            if savings.add_note(text) {
                println_colored!(GREEN, "  ✓ Note added");
            } else {
                println_colored!(DIM, "  Empty note ignored");
            }
        }
        SavingsCommands::ClearNotes => {
            savings.clear_notes();
            println_colored!(AMBER, "  {} notes cleared", kind.display_name());
        }
        SavingsCommands::Show => {
            let g = savings.goal();
            println!();
            println_colored!(GOLD, "  {} Savings", kind.display_name());
            println!();
            println!(
                "  {}  {}",
                progress_bar(g.progress(), 24),
                format_percent(g.progress())
            );
            println!();
            println!("  Target:     {}", format_amount(g.target, currency));
            println!("  Saved:      {}", format_amount(g.saved, currency));
            println!("  Remaining:  {}", format_amount(g.remaining(), currency));
            if !g.notes.is_empty() {
                println!();
                println_colored!(GOLD, "  Notes");
                for note in &g.notes {
                    println!("  • {}", note);
                }
            }
            println!();
        }
    }
    Ok(())
}

// ─── Summary ─────────────────────────────────────────────────────────────────

pub fn handle_summary(conn: &Connection, config: &AppConfig) -> Result<()> {
    let currency = &config.finance.currency;

    println!();
    println_colored!(GOLD, "  Muhasaba — Summary");
    if let Some(since) = MetaRepo::get(conn, "first_run")? {
        println_colored!(DIM, "  Tracking since {}", since);
    }
    println!();

    for category in TrackerCategory::all() {
        let store = open_tracker(conn, config, category);
        let owed = store.total_outstanding();
        let color = if owed == 0 { GREEN } else { AMBER };
        println_colored!(
            color,
            "  {}{} {}s owed",
            pad_display(category.title(), 18),
            owed,
            category.noun()
        );
    }
    println!();

    let assets = LedgerStore::load(conn, LedgerKind::Asset).total();
    let liabilities = LedgerStore::load(conn, LedgerKind::Liability).total();
    println!("  {}{}", pad_display("Assets", 18), format_amount(assets, currency));
    println!("  {}{}", pad_display("Liabilities", 18), format_amount(liabilities, currency));
    println_colored!(
        BOLD,
        "  {}{}",
        pad_display("Net", 18),
        format_amount(assets - liabilities, currency)
    );

    if let Some(due) = ZakatStore::load(conn).form().result {
        println!("  {}{}", pad_display("Zakat due", 18), format_amount(due, currency));
    }
    println!();

    for kind in GoalKind::all() {
        let savings = SavingsStore::load(conn, kind, config.savings.default_target(kind));
        let g = savings.goal();
        println!(
            "  {}{}  {}",
            pad_display(kind.display_name(), 18),
            progress_bar(g.progress(), 16),
            format_percent(g.progress())
        );
    }
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(conn: &Connection) -> Result<()> {
    let mut out = serde_json::Map::new();
    for key in KvRepo::keys(conn)? {
        let Some(raw) = KvRepo::get(conn, &key)? else {
            continue;
        };
        let value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));
        out.insert(key, value);
    }
    let json = serde_json::to_string_pretty(&serde_json::Value::Object(out))
        .context("Serializing export")?;
    println!("{}", json);
    Ok(())
}

// ─── Init ────────────────────────────────────────────────────────────────────

pub fn handle_init() -> Result<()> {
    let path = AppConfig::init()?;
    println_colored!(GREEN, "  ✓ Config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn ledger_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        {
            let mut ledger = LedgerStore::load(&conn, LedgerKind::Asset);
            ledger.add(LedgerItem::new(Some("Savings account"), Some(1200.0)));
            ledger.add(LedgerItem::new(Some("Loan to Ali"), Some(300.0)));
        }
        conn
    }

    fn ledger_error(conn: &Connection, action: LedgerCommands) -> AppError {
        let err = handle_ledger(conn, &AppConfig::default(), "asset", &action).unwrap_err();
        err.downcast::<AppError>().unwrap()
    }

    #[test]
    fn ledger_index_is_one_based() {
        let conn = ledger_db();
        let ledger = LedgerStore::load(&conn, LedgerKind::Asset);
        assert_eq!(ledger_index(&ledger, 1), Ok(0));
        assert_eq!(ledger_index(&ledger, 2), Ok(1));
    }

    #[test]
    fn ledger_errors_report_the_typed_position() {
        let conn = ledger_db();

        assert_eq!(
            ledger_error(&conn, LedgerCommands::Delete { index: 5 }),
            AppError::IndexOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(
            ledger_error(
                &conn,
                LedgerCommands::Edit {
                    index: 3,
                    name: "Gold".to_string(),
                    amount: None,
                }
            ),
            AppError::IndexOutOfRange { index: 3, len: 2 }
        );

        let err = ledger_error(&conn, LedgerCommands::Delete { index: 0 });
        assert_eq!(err, AppError::IndexOutOfRange { index: 0, len: 2 });
        assert_eq!(err.to_string(), "No item at position 0 (list has 2)");

        assert_eq!(LedgerStore::load(&conn, LedgerKind::Asset).items().len(), 2);
    }

    #[test]
    fn ledger_delete_by_position() {
        let conn = ledger_db();
        handle_ledger(
            &conn,
            &AppConfig::default(),
            "asset",
            &LedgerCommands::Delete { index: 2 },
        )
        .unwrap();

        let ledger = LedgerStore::load(&conn, LedgerKind::Asset);
        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].name.as_deref(), Some("Savings account"));
    }
}
