//! Utterance normalization
//!
//! Every rule and slot operation works on the canonical form produced here:
//! lower-cased, with leading and trailing whitespace removed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical, immutable form of a single user utterance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedUtterance(String);

impl NormalizedUtterance {
    /// Normalize raw text. Never fails; blank input yields an empty utterance.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing intelligible is left after normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.0.contains(phrase)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUtterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUtterance {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convenience wrapper over [`NormalizedUtterance::new`]
pub fn normalize(raw: &str) -> NormalizedUtterance {
    NormalizedUtterance::new(raw)
}
