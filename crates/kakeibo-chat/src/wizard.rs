//! The expense entry wizard (conversation engine).
//!
//! Runs one three-step wizard per user: amount, category, confirmation.
//! Steps are a tagged enum plus a pure transition function over
//! `(session, input)`; the engine applies the resulting outcome to the
//! session map and, on confirmation, to the expense store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use kakeibo_core::config::ChatConfig;
use kakeibo_core::types::{Expense, UserId};
use kakeibo_store::ExpenseStore;

use crate::error::ChatError;
use crate::reply::Reply;
use crate::session::{SessionMap, WizardSession, WizardStep};

/// Token that commits the pending expense, compared case-insensitively.
pub const AFFIRMATIVE: &str = "yes";

const PROMPT_AMOUNT: &str = "Please enter the amount:";
const PROMPT_AMOUNT_INVALID: &str = "Please enter a valid amount.";
const PROMPT_CATEGORY: &str = "Choose a category:";
const REPLY_SAVED: &str = "Expense saved!";
const REPLY_SAVE_FAILED: &str = "Something went wrong while saving your expense.";
const REPLY_CANCELLED: &str = "Expense entry cancelled.";

/// Parse a user-entered decimal amount.
///
/// Accepts `,` as the decimal separator. Returns `None` for anything that
/// is not a finite, strictly positive number.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => None,
    }
}

/// Result of feeding one message into the wizard state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// Validation failed: re-prompt and leave the session untouched.
    Stay(Reply),
    /// Advance to the updated session and send the reply.
    Next(WizardSession, Reply),
    /// Confirmation received: commit the collected expense. Terminal.
    Commit { amount: f64, category: String },
    /// Confirmation declined. Terminal.
    Cancel,
}

/// Pure transition function of the wizard state machine.
///
/// Never touches the session map or the store; the engine interprets the
/// outcome. Terminal outcomes (`Commit`, `Cancel`) are only reachable from
/// the confirmation step.
pub fn transition(
    session: &WizardSession,
    input: &str,
    categories: &[String],
    currency: &str,
) -> StepOutcome {
    match session.step {
        WizardStep::AwaitingAmount => match parse_amount(input) {
            None => StepOutcome::Stay(Reply::text(PROMPT_AMOUNT_INVALID)),
            Some(amount) => {
                let mut next = session.clone();
                next.step = WizardStep::AwaitingCategory;
                next.amount = Some(amount);
                next.last_message_at = Utc::now();
                StepOutcome::Next(
                    next,
                    Reply::with_options(PROMPT_CATEGORY, categories.to_vec()),
                )
            }
        },
        WizardStep::AwaitingCategory => {
            // Free text is accepted verbatim; the suggested list is advisory.
            let mut next = session.clone();
            next.step = WizardStep::AwaitingConfirmation;
            next.category = Some(input.to_string());
            next.last_message_at = Utc::now();
            let amount = next.amount.unwrap_or(0.0);
            StepOutcome::Next(
                next,
                Reply::text(format!(
                    "Add an expense of {} {} in category \"{}\"? ({}/no)",
                    format_amount(amount),
                    currency,
                    input,
                    AFFIRMATIVE
                )),
            )
        }
        WizardStep::AwaitingConfirmation => {
            if !input.trim().eq_ignore_ascii_case(AFFIRMATIVE) {
                return StepOutcome::Cancel;
            }
            match (session.amount, session.category.clone()) {
                (Some(amount), Some(category)) => StepOutcome::Commit { amount, category },
                // Unreachable through the public API: both fields are set
                // before the confirmation step is entered.
                _ => {
                    warn!("confirmation step reached with incomplete session");
                    StepOutcome::Cancel
                }
            }
        }
    }
}

/// Format an amount without trailing zeros for whole numbers.
pub(crate) fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount:.2}")
    }
}

/// Drives one wizard instance per user, committing to the store on
/// explicit confirmation.
pub struct WizardEngine {
    sessions: Arc<SessionMap>,
    store: Arc<dyn ExpenseStore>,
    categories: Vec<String>,
    currency: String,
}

impl WizardEngine {
    /// Create an engine over an injected session map and store.
    pub fn new(
        sessions: Arc<SessionMap>,
        store: Arc<dyn ExpenseStore>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            sessions,
            store,
            categories: config.categories.clone(),
            currency: config.currency.clone(),
        }
    }

    /// Start (or restart) the wizard for a user.
    ///
    /// Re-entrant: an in-progress wizard is reset to the first step. Has no
    /// effect on the store.
    pub fn start(&self, user: UserId) -> Reply {
        self.sessions.insert(user, WizardSession::new());
        Reply::text(PROMPT_AMOUNT)
    }

    /// Feed one message into the user's active wizard.
    ///
    /// Returns [`ChatError::NoActiveSession`] if the dispatcher routed a
    /// message here without a live session.
    pub async fn advance(&self, user: UserId, text: &str) -> Result<Reply, ChatError> {
        let session = self
            .sessions
            .get_active(user)
            .ok_or(ChatError::NoActiveSession(user))?;
        self.advance_with(user, session, text).await
    }

    /// Feed one message into an already-resolved session.
    ///
    /// The session passed in is taken as live: expiry is decided by the
    /// caller's map lookup, so one lookup covers both routing and
    /// advancement and the session cannot expire between the two.
    pub async fn advance_with(
        &self,
        user: UserId,
        session: WizardSession,
        text: &str,
    ) -> Result<Reply, ChatError> {
        match transition(&session, text, &self.categories, &self.currency) {
            StepOutcome::Stay(reply) => Ok(reply),
            StepOutcome::Next(next, reply) => {
                self.sessions.insert(user, next);
                Ok(reply)
            }
            StepOutcome::Commit { amount, category } => {
                let committed = self.commit(user, amount, &category).await;
                // Terminal either way; the session is destroyed only after
                // the store call has resolved.
                self.sessions.remove(user);
                Ok(match committed {
                    Ok(()) => Reply::text(REPLY_SAVED),
                    Err(e) => {
                        error!(user = %user, error = %e, "failed to save expense");
                        Reply::text(REPLY_SAVE_FAILED)
                    }
                })
            }
            StepOutcome::Cancel => {
                self.sessions.remove(user);
                Ok(Reply::text(REPLY_CANCELLED))
            }
        }
    }

    async fn commit(&self, user: UserId, amount: f64, category: &str) -> Result<(), ChatError> {
        let expense = Expense::new(user, amount, category)?;
        self.store.insert(&expense).await?;
        info!(
            user = %user,
            amount = expense.amount,
            category = %expense.category,
            "expense committed"
        );
        Ok(())
    }
}
