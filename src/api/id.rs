use serde::{Deserialize, Serialize};
use std::fmt;

// EXPERIMENTS

/// Server-assigned experiment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentId(String);

impl AsRef<str> for ExperimentId {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<String> for ExperimentId {
    fn from(id: String) -> Self {
        ExperimentId(id)
    }
}

impl From<&str> for ExperimentId {
    fn from(id: &str) -> Self {
        ExperimentId(id.to_owned())
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// PAGINATION

/// Continuation token of a list call. The empty token marks the first
/// request and the end of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for PageToken {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<String> for PageToken {
    fn from(token: String) -> Self {
        PageToken(token)
    }
}

impl From<&str> for PageToken {
    fn from(token: &str) -> Self {
        PageToken(token.to_owned())
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
