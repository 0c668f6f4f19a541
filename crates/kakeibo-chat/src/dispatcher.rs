//! Message routing between the wizard and the query engine.
//!
//! One dispatcher per process; the transport collaborator is expected to
//! deliver each user's messages one at a time (no two `handle_message`
//! calls for the same user interleave).

use std::sync::Arc;

use kakeibo_core::config::ChatConfig;
use kakeibo_core::types::UserId;
use kakeibo_store::ExpenseStore;

use crate::commands::Command;
use crate::error::ChatError;
use crate::query::QueryEngine;
use crate::reply::Reply;
use crate::session::SessionMap;
use crate::wizard::WizardEngine;

const GREETING: &str =
    "Hello! I'm your expense diary. Use /add to record an expense and /stats to see totals.";

/// Routes each inbound message to the wizard or the query engine.
pub struct Dispatcher {
    sessions: Arc<SessionMap>,
    wizard: WizardEngine,
    query: QueryEngine,
    max_message_length: usize,
}

impl Dispatcher {
    /// Build a dispatcher (and its engines) over the given store.
    pub fn new(store: Arc<dyn ExpenseStore>, config: &ChatConfig) -> Self {
        let sessions = Arc::new(SessionMap::new(config.session_timeout_minutes));
        let wizard = WizardEngine::new(Arc::clone(&sessions), Arc::clone(&store), config);
        let query = QueryEngine::new(store, config.currency.clone());
        Self {
            sessions,
            wizard,
            query,
            max_message_length: config.max_message_length,
        }
    }

    /// Handle one inbound message for a user and produce the reply.
    ///
    /// While a wizard session is active, any plain text is wizard input;
    /// the add command is the one exception and always (re)starts the
    /// wizard, keeping `start` re-entrant.
    pub async fn handle_message(&self, user: UserId, text: &str) -> Result<Reply, ChatError> {
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        // The limit is in characters, not bytes.
        if text.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let command = Command::parse(text);

        if command == Command::Add {
            return Ok(self.wizard.start(user));
        }
        // One lookup decides both routing and advancement, so a session
        // cannot expire between the two and leak NoActiveSession upward.
        if let Some(session) = self.sessions.get_active(user) {
            return self.wizard.advance_with(user, session, text).await;
        }

        Ok(match command {
            Command::Start => Reply::text(GREETING),
            Command::Help => Reply::text(Command::help_text()),
            Command::Stats { period } => {
                return self.query.summarize(user, period.as_deref()).await;
            }
            Command::Unknown(cmd) => Reply::text(format!(
                "Unknown command /{}. Send /help for the command list.",
                cmd
            )),
            Command::Text(_) => Reply::text(
                "Send /add to record an expense, or /help for the command list.",
            ),
            // Handled above.
            Command::Add => unreachable!("add is handled before session routing"),
        })
    }

    /// Whether the user currently has a live wizard session.
    pub fn has_active_session(&self, user: UserId) -> bool {
        self.sessions.is_active(user)
    }
}
