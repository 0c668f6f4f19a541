//! SQLite-backed implementation of the expense store.
//!
//! Operates on the [`Database`] wrapper using raw SQL. The window sum is
//! computed in SQL so the NULL-for-no-rows behavior of `SUM` maps directly
//! onto the contract's `Option<f64>`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use kakeibo_core::error::KakeiboError;
use kakeibo_core::types::{Expense, UserId};

use crate::db::Database;
use crate::store::ExpenseStore;

/// Expense store backed by the embedded SQLite database.
#[derive(Debug)]
pub struct SqliteExpenseStore {
    db: Arc<Database>,
}

impl SqliteExpenseStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Count all records for an owner.
    pub fn count_by_owner(&self, owner: UserId) -> Result<u64, KakeiboError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM expenses WHERE owner = ?1",
                    rusqlite::params![owner.0],
                    |row| row.get(0),
                )
                .map_err(|e| KakeiboError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }

    /// Find a record by ID.
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, KakeiboError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, owner, amount, category, occurred_at
                     FROM expenses WHERE id = ?1",
                )
                .map_err(|e| KakeiboError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id.to_string()], |row| {
                    Ok(row_to_expense(row))
                })
                .optional()
                .map_err(|e| KakeiboError::Storage(e.to_string()))?;

            match result {
                Some(expense) => Ok(Some(expense?)),
                None => Ok(None),
            }
        })
    }
}

#[async_trait]
impl ExpenseStore for SqliteExpenseStore {
    async fn insert(&self, expense: &Expense) -> Result<(), KakeiboError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO expenses (id, owner, amount, category, occurred_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    expense.id.to_string(),
                    expense.owner.0,
                    expense.amount,
                    expense.category,
                    expense.occurred_at.timestamp(),
                ],
            )
            .map_err(|e| KakeiboError::Storage(format!("Failed to insert expense: {}", e)))?;
            Ok(())
        })
    }

    async fn sum_by_owner_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<f64>, KakeiboError> {
        self.db.with_conn(|conn| {
            let total: Option<f64> = match since {
                Some(since) => conn
                    .query_row(
                        "SELECT SUM(amount) FROM expenses
                         WHERE owner = ?1 AND occurred_at >= ?2",
                        rusqlite::params![owner.0, since.timestamp()],
                        |row| row.get(0),
                    )
                    .map_err(|e| KakeiboError::Storage(e.to_string()))?,
                None => conn
                    .query_row(
                        "SELECT SUM(amount) FROM expenses WHERE owner = ?1",
                        rusqlite::params![owner.0],
                        |row| row.get(0),
                    )
                    .map_err(|e| KakeiboError::Storage(e.to_string()))?,
            };
            Ok(total)
        })
    }
}

fn row_to_expense(row: &rusqlite::Row<'_>) -> Result<Expense, KakeiboError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| KakeiboError::Storage(e.to_string()))?;
    let owner: i64 = row
        .get(1)
        .map_err(|e| KakeiboError::Storage(e.to_string()))?;
    let amount: f64 = row
        .get(2)
        .map_err(|e| KakeiboError::Storage(e.to_string()))?;
    let category: String = row
        .get(3)
        .map_err(|e| KakeiboError::Storage(e.to_string()))?;
    let occurred_at: i64 = row
        .get(4)
        .map_err(|e| KakeiboError::Storage(e.to_string()))?;

    Ok(Expense {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| KakeiboError::Storage(format!("Invalid UUID: {}", e)))?,
        owner: UserId(owner),
        amount,
        category,
        occurred_at: Utc
            .timestamp_opt(occurred_at, 0)
            .single()
            .unwrap_or_default(),
    })
}

/// Extension trait for rusqlite to support optional query results.
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
