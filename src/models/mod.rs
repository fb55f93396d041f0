pub mod category;
pub mod counter;
pub mod ledger;
pub mod persisted;
pub mod savings;
pub mod zakat;

pub use category::TrackerCategory;
pub use counter::{Counter, EventKind, HistoryEntry};
pub use ledger::{LedgerItem, LedgerKind};
pub use savings::{GoalKind, SavingsGoal};
pub use zakat::{ZakatField, ZakatForm};
