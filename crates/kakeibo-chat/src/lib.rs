//! Conversational interface for the expense diary.
//!
//! Provides the multi-step entry wizard, the period-filtered total query,
//! and the dispatcher that routes incoming messages between them.

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod query;
pub mod reply;
pub mod session;
pub mod wizard;

pub use commands::Command;
pub use dispatcher::Dispatcher;
pub use error::ChatError;
pub use query::QueryEngine;
pub use reply::Reply;
pub use session::{SessionMap, WizardSession, WizardStep};
pub use wizard::WizardEngine;
