//! Proposal template entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_entity;

/// Reusable proposal layout, owned by an account or global
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalTemplate {
    pub id: Uuid,
    pub public_id: u32,

    /// `None` for templates shared by every account
    pub account_id: Option<Uuid>,

    pub name: String,

    #[serde(default)]
    pub html: String,

    #[serde(default)]
    pub css: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ProposalTemplate, "proposal_templates", "proposal_template");

impl ProposalTemplate {
    pub fn new(account_id: Option<Uuid>, public_id: u32, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            public_id,
            account_id,
            name: name.to_string(),
            html: String::new(),
            css: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_global(&self) -> bool {
        self.account_id.is_none()
    }
}
