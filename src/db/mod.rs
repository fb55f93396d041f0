pub mod migrations;
pub mod repository;

#[cfg(test)]
pub mod memory;

pub use repository::{KvRepo, KvStore, MetaRepo};
