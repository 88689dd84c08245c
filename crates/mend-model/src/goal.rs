// goal.rs — Goal: the platform-agnostic unit of work.
//
// A Goal describes what needs to be accomplished, in free text. Callers
// (the local adapter, a future hosting-service adapter) build one from
// external input; the engine never mutates it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Goal priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}' (expected low|normal|high)")),
        }
    }
}

/// What needs to be accomplished.
///
/// Immutable once constructed — the engine takes it by reference and
/// never writes back into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Free-text description of what to accomplish.
    pub description: String,

    /// Additional context about the codebase or the request's origin.
    #[serde(default)]
    pub context: String,

    /// Priority of the goal.
    #[serde(default)]
    pub priority: Priority,

    /// Optional categorization tags. Order carries no meaning.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Goal {
    /// Create a goal with default priority and no context or tags.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: String::new(),
            priority: Priority::default(),
            tags: Vec::new(),
        }
    }

    /// Set the context and return self (builder pattern).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the priority and return self.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add a tag and return self.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
