//! The expense store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use kakeibo_core::error::Result;
use kakeibo_core::types::{Expense, UserId};

/// Durable mapping from expense records to storage.
///
/// Implementations must make a successful [`insert`](Self::insert)
/// immediately visible to a subsequent
/// [`sum_by_owner_since`](Self::sum_by_owner_since) from any caller, and
/// concurrent inserts from different owners must never interfere with each
/// other's sums. Operations may suspend on I/O; callers hold no session
/// state across the await.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persist a committed expense record.
    async fn insert(&self, expense: &Expense) -> Result<()>;

    /// Sum the amounts of `owner`'s expenses with `occurred_at >= since`.
    ///
    /// `since = None` means no lower bound (all time); the lower bound is
    /// inclusive. Returns `None` when no records match.
    async fn sum_by_owner_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<f64>>;
}
