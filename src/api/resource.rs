use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three resource families served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Club,
    Member,
    Session,
}

impl ResourceKind {
    /// Endpoint path segment.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Club => "club",
            ResourceKind::Member => "member",
            ResourceKind::Session => "session",
        }
    }

    /// Capitalized name for messages.
    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::Club => "Club",
            ResourceKind::Member => "Member",
            ResourceKind::Session => "Session",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Opaque resource identifier; clubs and sessions use strings, members integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl ResourceId {
    pub fn to_value(&self) -> Value {
        match self {
            ResourceId::Number(n) => Value::from(*n),
            ResourceId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Integer-looking input becomes `Number`, anything else `Text`.
impl FromStr for ResourceId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(ResourceId::Number)
            .unwrap_or_else(|_| ResourceId::Text(s.to_string())))
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Number(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Text(id)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}
