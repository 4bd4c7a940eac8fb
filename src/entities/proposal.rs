//! Proposal entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::state::EntityState;
use crate::impl_entity;

/// A sales proposal built from a template and attached to a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,

    /// Account-scoped identifier used in URLs
    pub public_id: u32,

    pub account_id: Uuid,

    /// Creator, used for "my records" filtering and ownership checks
    pub user_id: Uuid,

    /// Public id of the linked quote
    pub invoice_id: Option<u32>,

    /// Public id of the template the proposal was built from
    pub proposal_template_id: Option<u32>,

    #[serde(default)]
    pub private_notes: String,

    #[serde(default)]
    pub html: String,

    #[serde(default)]
    pub css: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Proposal, "proposals", "proposal", soft_state);

impl Proposal {
    pub fn new(account_id: Uuid, user_id: Uuid, public_id: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            public_id,
            account_id,
            user_id,
            invoice_id: None,
            proposal_template_id: None,
            private_notes: String::new(),
            html: String::new(),
            css: String::new(),
            created_at: now,
            updated_at: now,
            archived_at: None,
            deleted_at: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Move the soft-state timestamps to represent `state`
    pub fn set_state(&mut self, state: EntityState) {
        let now = Utc::now();
        match state {
            EntityState::Active => {
                self.archived_at = None;
                self.deleted_at = None;
            }
            EntityState::Archived => {
                self.archived_at = Some(now);
                self.deleted_at = None;
            }
            EntityState::Deleted => {
                self.deleted_at = Some(now);
            }
        }
        self.updated_at = now;
    }
}
