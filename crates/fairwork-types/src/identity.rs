use serde::{Deserialize, Serialize};
use std::fmt;

/// Application role of a wallet owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Posts listings and funds rewards.
    Company,
    /// Applies to listings and submits work.
    Researcher,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Company => write!(f, "COMPANY"),
            UserRole::Researcher => write!(f, "RESEARCHER"),
        }
    }
}
