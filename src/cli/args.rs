use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "muhasaba", version, author, about = "Keep account of missed prayers and fasts, zakat and Hajj savings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Missed (qada) prayer tracker
    Prayer {
        #[command(subcommand)]
        action: TrackerCommands,
    },
    /// Missed fast tracker
    Fast {
        #[command(subcommand)]
        action: TrackerCommands,
    },
    /// Show recent tracker history
    History {
        /// Show fast history instead of prayer history
        #[arg(long)]
        fasts: bool,
        /// Number of entries (defaults to tracker.history_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Also show the Hijri date of each entry
        #[arg(long)]
        hijri: bool,
    },
    /// Assets/receivables and liabilities/payables
    Ledger {
        /// asset or liability
        kind: String,
        #[command(subcommand)]
        action: LedgerCommands,
    },
    /// Zakat calculator
    Zakat {
        #[command(subcommand)]
        action: ZakatCommands,
    },
    /// Hajj / Umrah savings
    Savings {
        /// hajj or umrah
        goal: String,
        #[command(subcommand)]
        action: SavingsCommands,
    },
    /// Overview of every tracker
    Summary,
    /// Dump all stored data as JSON to stdout
    Export,
    /// Write a default config file if none exists
    Init,
}

#[derive(Subcommand, Debug)]
pub enum TrackerCommands {
    /// Record a missed one
    Missed {
        /// Name (e.g. fajr, dhuhr / ramadan, nafl)
        name: String,
    },
    /// Record a made-up one (only while some are owed)
    Done {
        name: String,
    },
    /// Reset a counter to zero
    Clear {
        name: String,
    },
    /// Show all counters
    List,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommands {
    /// Add a line
    Add {
        name: String,
        amount: Option<f64>,
    },
    /// Replace the line at a position (1-based, as shown by `list`)
    Edit {
        index: usize,
        name: String,
        amount: Option<f64>,
    },
    /// Delete the line at a position (1-based)
    Delete {
        index: usize,
    },
    /// List all lines with the total
    List,
}

#[derive(Subcommand, Debug)]
pub enum ZakatCommands {
    /// Set one input: cash, gold, silver or business
    Set {
        field: String,
        value: f64,
    },
    /// Blank one input
    Unset {
        field: String,
    },
    /// Calculate zakat due on the current inputs
    Calc,
    /// Show inputs and the last result
    Show,
    /// Clear all inputs and the result
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SavingsCommands {
    /// Add to the saved amount
    Add {
        amount: f64,
    },
    /// Change the target amount
    Target {
        amount: f64,
    },
    /// Reset the saved amount to zero
    Clear,
    /// Add a note
    Note {
        text: String,
    },
    /// Remove all notes
    ClearNotes,
    /// Show progress and notes
    Show,
}
