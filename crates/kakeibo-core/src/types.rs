use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KakeiboError, Result};

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque chat-user identifier.
///
/// Numeric because every chat transport the bot has been pointed at hands
/// out integer user ids; the core never interprets the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A single committed spending event.
///
/// Created only when a wizard run is confirmed; never mutated or deleted
/// afterwards. `occurred_at` is stamped at commit time, not at wizard start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique record id.
    pub id: Uuid,
    /// The user who recorded the expense.
    pub owner: UserId,
    /// Amount spent. Always finite and strictly positive.
    pub amount: f64,
    /// Category label. Free text, non-empty.
    pub category: String,
    /// When the expense was committed.
    pub occurred_at: DateTime<Utc>,
}

impl Expense {
    /// Build a validated expense stamped with the current time.
    ///
    /// Rejects non-finite or non-positive amounts and blank categories.
    pub fn new(owner: UserId, amount: f64, category: impl Into<String>) -> Result<Self> {
        let category = category.into();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(KakeiboError::Validation(format!(
                "amount must be a finite positive number, got {amount}"
            )));
        }
        if category.trim().is_empty() {
            return Err(KakeiboError::Validation(
                "category must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            amount,
            category,
            occurred_at: Utc::now(),
        })
    }
}

// =============================================================================
// Period
// =============================================================================

/// Trailing time window applied to aggregate queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// No lower bound.
    #[default]
    AllTime,
    /// The trailing 24 hours.
    LastDay,
    /// The trailing 7 days.
    LastWeek,
    /// The trailing calendar month.
    LastMonth,
}

impl Period {
    /// Map an optional free-text token to a period.
    ///
    /// Unrecognized or absent tokens fall back to [`Period::AllTime`].
    pub fn parse(token: Option<&str>) -> Self {
        match token.map(|t| t.trim().to_lowercase()).as_deref() {
            Some("day") => Period::LastDay,
            Some("week") => Period::LastWeek,
            Some("month") => Period::LastMonth,
            _ => Period::AllTime,
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    ///
    /// `None` means unbounded (all time). The month window is a calendar
    /// month, falling back to 30 days at unrepresentable edges.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::AllTime => None,
            Period::LastDay => Some(now - Duration::days(1)),
            Period::LastWeek => Some(now - Duration::weeks(1)),
            Period::LastMonth => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30)),
            ),
        }
    }

    /// Human-readable window label for replies.
    pub fn label(&self) -> &'static str {
        match self {
            Period::AllTime => "all time",
            Period::LastDay => "the last day",
            Period::LastWeek => "the last week",
            Period::LastMonth => "the last month",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Expense validation ----

    #[test]
    fn test_expense_new_valid() {
        let e = Expense::new(UserId(7), 1500.0, "Groceries").unwrap();
        assert_eq!(e.owner, UserId(7));
        assert_eq!(e.amount, 1500.0);
        assert_eq!(e.category, "Groceries");
        assert_ne!(e.id, Uuid::nil());
    }

    #[test]
    fn test_expense_new_rejects_zero_amount() {
        assert!(Expense::new(UserId(1), 0.0, "Cafe").is_err());
    }

    #[test]
    fn test_expense_new_rejects_negative_amount() {
        assert!(Expense::new(UserId(1), -5.0, "Cafe").is_err());
    }

    #[test]
    fn test_expense_new_rejects_nan_and_infinity() {
        assert!(Expense::new(UserId(1), f64::NAN, "Cafe").is_err());
        assert!(Expense::new(UserId(1), f64::INFINITY, "Cafe").is_err());
    }

    #[test]
    fn test_expense_new_rejects_blank_category() {
        assert!(Expense::new(UserId(1), 10.0, "").is_err());
        assert!(Expense::new(UserId(1), 10.0, "   ").is_err());
    }

    #[test]
    fn test_expense_occurred_at_is_recent() {
        let before = Utc::now();
        let e = Expense::new(UserId(1), 10.0, "Cafe").unwrap();
        let after = Utc::now();
        assert!(e.occurred_at >= before && e.occurred_at <= after);
    }

    #[test]
    fn test_expense_serde_round_trip() {
        let e = Expense::new(UserId(42), 99.5, "Hobby").unwrap();
        let json = serde_json::to_string(&e).unwrap();
        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }

    // ---- Period parsing ----

    #[test]
    fn test_period_parse_known_tokens() {
        assert_eq!(Period::parse(Some("day")), Period::LastDay);
        assert_eq!(Period::parse(Some("week")), Period::LastWeek);
        assert_eq!(Period::parse(Some("month")), Period::LastMonth);
    }

    #[test]
    fn test_period_parse_is_case_insensitive_and_trims() {
        assert_eq!(Period::parse(Some("DAY")), Period::LastDay);
        assert_eq!(Period::parse(Some("  Week ")), Period::LastWeek);
    }

    #[test]
    fn test_period_parse_unknown_falls_back_to_all_time() {
        assert_eq!(Period::parse(Some("year")), Period::AllTime);
        assert_eq!(Period::parse(Some("")), Period::AllTime);
        assert_eq!(Period::parse(None), Period::AllTime);
    }

    // ---- Period windows ----

    #[test]
    fn test_period_since_all_time_is_unbounded() {
        assert!(Period::AllTime.since(Utc::now()).is_none());
    }

    #[test]
    fn test_period_since_day_and_week() {
        let now = Utc::now();
        assert_eq!(Period::LastDay.since(now), Some(now - Duration::days(1)));
        assert_eq!(Period::LastWeek.since(now), Some(now - Duration::weeks(1)));
    }

    #[test]
    fn test_period_since_month_is_calendar_month() {
        let now = "2025-03-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let since = Period::LastMonth.since(now).unwrap();
        assert_eq!(since, "2025-02-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_period_since_month_clamps_short_months() {
        // Mar 31 minus one month clamps to Feb 28.
        let now = "2025-03-31T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let since = Period::LastMonth.since(now).unwrap();
        assert_eq!(since, "2025-02-28T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(Period::AllTime.label(), "all time");
        assert_eq!(Period::LastDay.label(), "the last day");
        assert_eq!(Period::LastWeek.label(), "the last week");
        assert_eq!(Period::LastMonth.label(), "the last month");
    }

    // ---- UserId ----

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId(123456).to_string(), "123456");
    }
}
