//! Email message model.

use serde::{Deserialize, Serialize};

/// A plain text email ready to hand to a provider.
///
/// The sender address is a provider concern and comes from its
/// configuration, not from the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Email {
    /// Recipient email address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}
