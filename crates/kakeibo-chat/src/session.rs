//! Per-user wizard session state.
//!
//! Sessions are transient: keyed by user id, held in memory, never
//! persisted. An idle timeout bounds how long an abandoned session
//! lingers before the next message discards it.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use kakeibo_core::types::UserId;

/// Position of a wizard run within the entry flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// Waiting for the expense amount.
    #[default]
    AwaitingAmount,
    /// Waiting for a category label.
    AwaitingCategory,
    /// Waiting for a yes/no confirmation.
    AwaitingConfirmation,
}

/// Transient state of one user's wizard run.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardSession {
    /// Current step. Advances strictly forward except the amount self-loop.
    pub step: WizardStep,
    /// Amount collected at the first step.
    pub amount: Option<f64>,
    /// Category collected at the second step.
    pub category: Option<String>,
    /// When the wizard was started.
    pub started_at: DateTime<Utc>,
    /// When the session last saw input, for idle expiry.
    pub last_message_at: DateTime<Utc>,
}

impl WizardSession {
    /// A fresh session at the first step.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            step: WizardStep::AwaitingAmount,
            amount: None,
            category: None,
            started_at: now,
            last_message_at: now,
        }
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned mapping from user to wizard session.
///
/// Injected into the conversation engine and shared with the dispatcher so
/// tests can construct isolated instances; there is no global session state.
/// The mutex is held only for point reads and writes, never across store I/O.
#[derive(Debug)]
pub struct SessionMap {
    /// Idle minutes before a session is considered abandoned. 0 disables.
    timeout_minutes: u32,
    inner: Mutex<HashMap<UserId, WizardSession>>,
}

impl SessionMap {
    /// Create an empty map with the given idle timeout.
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            timeout_minutes,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Create or overwrite the session for a user.
    pub fn insert(&self, user: UserId, session: WizardSession) {
        self.lock().insert(user, session);
    }

    /// Clone out the user's session, discarding it first if it has expired.
    pub fn get_active(&self, user: UserId) -> Option<WizardSession> {
        let mut map = self.lock();
        if let Some(session) = map.get(&user) {
            if self.is_expired(session) {
                map.remove(&user);
                return None;
            }
            return Some(session.clone());
        }
        None
    }

    /// Whether the user has a live (non-expired) session.
    pub fn is_active(&self, user: UserId) -> bool {
        self.get_active(user).is_some()
    }

    /// Remove and return the user's session, expired or not.
    pub fn remove(&self, user: UserId) -> Option<WizardSession> {
        self.lock().remove(&user)
    }

    /// Number of stored sessions, including not-yet-reaped expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, session: &WizardSession) -> bool {
        if self.timeout_minutes == 0 {
            return false;
        }
        let idle = Utc::now() - session.last_message_at;
        idle.num_seconds() > i64::from(self.timeout_minutes) * 60
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, WizardSession>> {
        // A poisoned lock only means another thread panicked mid-access;
        // the map itself stays consistent for point operations.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
