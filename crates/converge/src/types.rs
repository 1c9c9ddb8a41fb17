//! Core types for declarative database management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State the caller wants the resource to be in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Resource should exist
    #[default]
    Present,
    /// Resource should not exist
    Absent,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!(
                "invalid state '{other}', expected 'present' or 'absent'"
            )),
        }
    }
}

/// State the resource was found in on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservedState {
    /// Resource exists
    Exists,
    /// Resource does not exist
    Absent,
}

impl ObservedState {
    pub fn from_exists(exists: bool) -> Self {
        if exists { Self::Exists } else { Self::Absent }
    }

    pub fn exists(&self) -> bool {
        matches!(self, Self::Exists)
    }

    /// Whether this observation already satisfies `desired`
    pub fn satisfies(&self, desired: DesiredState) -> bool {
        matches!(
            (self, desired),
            (Self::Exists, DesiredState::Present) | (Self::Absent, DesiredState::Absent)
        )
    }
}

/// Transition needed to reach the desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Already converged
    None,
    /// Resource must be created
    Create,
    /// Resource must be dropped
    Drop,
}

impl Action {
    /// Decide the transition for every (desired, observed) pair
    pub fn plan(desired: DesiredState, observed: ObservedState) -> Self {
        match (desired, observed) {
            (DesiredState::Present, ObservedState::Absent) => Self::Create,
            (DesiredState::Absent, ObservedState::Exists) => Self::Drop,
            (DesiredState::Present, ObservedState::Exists)
            | (DesiredState::Absent, ObservedState::Absent) => Self::None,
        }
    }

    /// Check if the action represents a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Create => "create",
            Self::Drop => "drop",
        })
    }
}

/// Result of one reconciliation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the server state differed from the desired state
    pub changed: bool,
    /// Resource name as supplied by the caller
    #[serde(rename = "db")]
    pub name: String,
    /// Transition that was (or, in a dry run, would be) performed
    pub action: Action,
    /// Whether the outcome is a prediction only
    pub dry_run: bool,
}

impl Outcome {
    pub fn new(name: impl Into<String>, action: Action, dry_run: bool) -> Self {
        Self {
            changed: action.is_change(),
            name: name.into(),
            action,
            dry_run,
        }
    }
}
