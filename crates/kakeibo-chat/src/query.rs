//! Period-filtered total queries (query engine).

use std::sync::Arc;

use chrono::Utc;

use kakeibo_core::types::{Period, UserId};
use kakeibo_store::ExpenseStore;

use crate::error::ChatError;
use crate::reply::Reply;
use crate::wizard::format_amount;

/// Computes a user's aggregate spend over a trailing window.
///
/// Pure read over the store; holds no state of its own.
pub struct QueryEngine {
    store: Arc<dyn ExpenseStore>,
    currency: String,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn ExpenseStore>, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
        }
    }

    /// Total the user's expenses over the period named by `token`.
    ///
    /// Unrecognized or absent tokens fall back to all time. The window's
    /// lower bound is inclusive and the upper bound is now.
    pub async fn summarize(&self, user: UserId, token: Option<&str>) -> Result<Reply, ChatError> {
        let period = Period::parse(token);
        let since = period.since(Utc::now());
        let total = self.store.sum_by_owner_since(user, since).await?;

        Ok(match total {
            Some(total) => Reply::text(format!(
                "You spent {} {} over {}.",
                format_amount(total),
                self.currency,
                period.label()
            )),
            None => Reply::text(format!(
                "No expenses recorded for {}.",
                period.label()
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use kakeibo_core::types::Expense;
    use kakeibo_store::{Database, SqliteExpenseStore};
    use uuid::Uuid;

    fn make_engine() -> (QueryEngine, Arc<SqliteExpenseStore>) {
        let store = Arc::new(SqliteExpenseStore::new(Arc::new(
            Database::in_memory().unwrap(),
        )));
        let engine = QueryEngine::new(Arc::clone(&store) as Arc<dyn ExpenseStore>, "jpy");
        (engine, store)
    }

    fn expense_at(owner: i64, amount: f64, occurred_at: DateTime<Utc>) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            owner: UserId(owner),
            amount,
            category: "Other".to_string(),
            occurred_at,
        }
    }

    #[tokio::test]
    async fn test_summarize_all_time_without_token() {
        let (engine, store) = make_engine();
        let now = Utc::now();
        store.insert(&expense_at(1, 100.0, now)).await.unwrap();
        store
            .insert(&expense_at(1, 50.0, now - Duration::days(400)))
            .await
            .unwrap();

        let reply = engine.summarize(UserId(1), None).await.unwrap();
        assert!(reply.text.contains("150"));
        assert!(reply.text.contains("jpy"));
        assert!(reply.text.contains("all time"));
    }

    #[tokio::test]
    async fn test_summarize_ignores_other_owners() {
        let (engine, store) = make_engine();
        let now = Utc::now();
        store.insert(&expense_at(1, 100.0, now)).await.unwrap();
        store.insert(&expense_at(2, 999.0, now)).await.unwrap();

        let reply = engine.summarize(UserId(1), None).await.unwrap();
        assert!(reply.text.contains("100"));
        assert!(!reply.text.contains("999"));
    }

    #[tokio::test]
    async fn test_summarize_day_excludes_older_records() {
        let (engine, store) = make_engine();
        let now = Utc::now();
        store
            .insert(&expense_at(1, 100.0, now - Duration::hours(2)))
            .await
            .unwrap();
        store
            .insert(&expense_at(1, 500.0, now - Duration::days(2)))
            .await
            .unwrap();

        let reply = engine.summarize(UserId(1), Some("day")).await.unwrap();
        assert!(reply.text.contains("100"));
        assert!(reply.text.contains("the last day"));
    }

    #[tokio::test]
    async fn test_summarize_week_and_month_windows() {
        let (engine, store) = make_engine();
        let now = Utc::now();
        store
            .insert(&expense_at(1, 10.0, now - Duration::days(3)))
            .await
            .unwrap();
        store
            .insert(&expense_at(1, 20.0, now - Duration::days(20)))
            .await
            .unwrap();
        store
            .insert(&expense_at(1, 40.0, now - Duration::days(90)))
            .await
            .unwrap();

        let week = engine.summarize(UserId(1), Some("week")).await.unwrap();
        assert!(week.text.contains("10"));
        assert!(week.text.contains("the last week"));

        let month = engine.summarize(UserId(1), Some("month")).await.unwrap();
        assert!(month.text.contains("30"));
        assert!(month.text.contains("the last month"));
    }

    #[tokio::test]
    async fn test_summarize_no_records_in_period() {
        let (engine, store) = make_engine();
        store
            .insert(&expense_at(1, 100.0, Utc::now() - Duration::days(30)))
            .await
            .unwrap();

        let reply = engine.summarize(UserId(1), Some("day")).await.unwrap();
        assert!(reply.text.contains("No expenses"));
        assert!(reply.text.contains("the last day"));
    }

    #[tokio::test]
    async fn test_summarize_no_records_at_all() {
        let (engine, _) = make_engine();
        let reply = engine.summarize(UserId(1), None).await.unwrap();
        assert!(reply.text.contains("No expenses"));
    }

    #[tokio::test]
    async fn test_summarize_unknown_token_falls_back_to_all_time() {
        let (engine, store) = make_engine();
        store
            .insert(&expense_at(1, 100.0, Utc::now() - Duration::days(400)))
            .await
            .unwrap();

        let reply = engine.summarize(UserId(1), Some("year")).await.unwrap();
        assert!(reply.text.contains("100"));
        assert!(reply.text.contains("all time"));
    }
}
