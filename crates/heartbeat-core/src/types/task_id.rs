//! Task identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Server-assigned identifier of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a raw identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().parse::<i64>().map_err(|e| InvalidInputError::TaskId {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        if id <= 0 {
            return Err(InvalidInputError::TaskId {
                value: s.to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        Ok(Self(id))
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!("42".parse::<TaskId>().unwrap(), TaskId::new(42));
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        assert!("abc".parse::<TaskId>().is_err());
        assert!("0".parse::<TaskId>().is_err());
        assert!("-3".parse::<TaskId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&TaskId::new(7)).unwrap(), "7");
    }
}
