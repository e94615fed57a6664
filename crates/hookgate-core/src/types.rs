//! Common type definitions shared across Hookgate crates.

use std::fmt;
use std::str::FromStr;

use crate::error::HookgateError;

/// How to treat a form parameter name that appears more than once in a request body.
///
/// The signing scheme maps each name to a single value and does not say which
/// occurrence the sender signed, so the default refuses to guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateParamPolicy {
    /// Reject the request before verification.
    #[default]
    Reject,
    /// Keep the first occurrence.
    FirstWins,
    /// Keep the last occurrence.
    LastWins,
}

impl DuplicateParamPolicy {
    /// The configuration string for this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::FirstWins => "first",
            Self::LastWins => "last",
        }
    }
}

impl FromStr for DuplicateParamPolicy {
    type Err = HookgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "first" | "first-wins" => Ok(Self::FirstWins),
            "last" | "last-wins" => Ok(Self::LastWins),
            other => Err(HookgateError::Config(format!(
                "unknown duplicate parameter policy: {other} (expected reject, first, or last)"
            ))),
        }
    }
}

impl fmt::Display for DuplicateParamPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
