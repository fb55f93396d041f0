pub mod ledger;
pub mod savings;
pub mod tracker;
pub mod zakat;

pub use ledger::LedgerStore;
pub use savings::SavingsStore;
pub use tracker::{TrackerStore, DEFAULT_HISTORY_LIMIT};
pub use zakat::ZakatStore;
