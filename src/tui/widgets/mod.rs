pub mod counters;
pub mod header;
pub mod history;
pub mod overview;
pub mod statusbar;
