//! Soft-state lifecycle shared by every account-owned entity
//!
//! Entities are never physically removed. Their state is derived from two
//! timestamps (`archived_at`, `deleted_at`) and moved around by a small set
//! of bulk actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ProposalError;

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    Active,
    Archived,
    Deleted,
}

impl EntityState {
    /// Compute the state reached by applying `action`
    ///
    /// Returns `None` when the transition is not allowed from this state
    /// (e.g. archiving a deleted entity or restoring an active one).
    pub fn transition(self, action: BulkAction) -> Option<EntityState> {
        match (self, action) {
            (EntityState::Active, BulkAction::Archive) => Some(EntityState::Archived),
            (EntityState::Active | EntityState::Archived, BulkAction::Delete) => {
                Some(EntityState::Deleted)
            }
            (EntityState::Archived | EntityState::Deleted, BulkAction::Restore) => {
                Some(EntityState::Active)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::Active => "active",
            EntityState::Archived => "archived",
            EntityState::Deleted => "deleted",
        }
    }

    /// Parse a comma separated list such as `active,archived`
    ///
    /// Unknown entries are ignored. An empty result falls back to `[Active]`.
    pub fn parse_list(raw: Option<&str>) -> Vec<EntityState> {
        let mut states: Vec<EntityState> = raw
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        states.dedup();

        if states.is_empty() {
            vec![EntityState::Active]
        } else {
            states
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityState {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EntityState::Active),
            "archived" => Ok(EntityState::Archived),
            "deleted" => Ok(EntityState::Deleted),
            other => Err(ProposalError::BadRequest {
                message: format!("Unknown entity state: {}", other),
            }),
        }
    }
}

/// A state transition requested through the bulk pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Archive,
    Delete,
    Restore,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Archive => "archive",
            BulkAction::Delete => "delete",
            BulkAction::Restore => "restore",
        }
    }

    /// Past tense used to build notice keys (`archived_proposal`, ...)
    pub fn past_tense(&self) -> &'static str {
        match self {
            BulkAction::Archive => "archived",
            BulkAction::Delete => "deleted",
            BulkAction::Restore => "restored",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "archive" => Ok(BulkAction::Archive),
            "delete" => Ok(BulkAction::Delete),
            "restore" => Ok(BulkAction::Restore),
            other => Err(ProposalError::BadRequest {
                message: format!("Unknown bulk action: {}", other),
            }),
        }
    }
}
