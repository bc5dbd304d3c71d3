//! Catalog and circulation engine for a small lending library.
//!
//! This crate keeps a book catalog ordered by identifier, a bounded queue of
//! borrow requests, a bounded stack of returns awaiting processing, per-user
//! borrowing histories, and a ledger of titles currently on loan. The
//! [`CirculationEngine`] owns all of them and enforces the rules that span
//! more than one: a title is issued only while cataloged, and a return is
//! finalized only against an outstanding issue.

pub mod book;
pub mod borrow_queue;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod observers;
pub mod report;
pub mod return_stack;
pub mod shell;

pub use book::{BookRecord, normalize_title};
pub use borrow_queue::{BorrowConduit, BorrowRequest};
pub use catalog::Catalog;
pub use config::EngineConfig;
pub use engine::{CirculationEngine, EngineSnapshot, Loan};
pub use error::{CirculationError, ConfigError, Conduit};
pub use events::{CirculationEvent, JournalEntry, Operation};
pub use history::UserHistoryStore;
pub use ledger::CirculationLedger;
pub use observers::{CirculationLogger, CirculationObserver};
pub use return_stack::ReturnConduit;
pub use shell::Shell;
