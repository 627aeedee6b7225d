//! Variants of priority refresh.
use crate::error::ReplayError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How [`update`](crate::ReplayMemoryBase::update) turns errors into priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityUpdate {
    /// Priority is `|error| + epsilon`.
    #[default]
    Direct,

    /// Priority is `1 / rank`, where entries are ranked by their last
    /// observed `|error|` in descending order.
    Rank,
}

impl FromStr for PriorityUpdate {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "rank" => Ok(Self::Rank),
            _ => Err(ReplayError::InvalidArgument(format!(
                "Invalid variant for priority updates: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for PriorityUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Rank => write!(f, "rank"),
        }
    }
}
