//! Durable persistence boundary for expense records.
//!
//! Defines the [`ExpenseStore`] contract consumed by the conversation and
//! query engines, plus the shipped SQLite implementation.

pub mod db;
pub mod migrations;
pub mod repository;
pub mod store;

pub use db::Database;
pub use repository::SqliteExpenseStore;
pub use store::ExpenseStore;
