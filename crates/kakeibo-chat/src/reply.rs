//! Outbound reply type.

use serde::Serialize;

/// A plain-text reply, optionally carrying a one-shot selection list.
///
/// The options are prompt metadata for the transport to render (e.g. as a
/// one-time keyboard); they never gate free-text input and are not kept as
/// state between messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// The reply text.
    pub text: String,
    /// One-shot selectable labels, in display order. Empty for plain replies.
    pub options: Vec<String>,
}

impl Reply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// A reply with an attached one-shot selection list.
    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}
