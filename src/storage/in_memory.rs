//! In-memory implementation of EntityStore for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{ProposalError, Result};
use crate::core::store::EntityStore;
use crate::entities::{Invoice, Proposal, ProposalTemplate};

#[derive(Default)]
struct Tables {
    proposals: HashMap<Uuid, Proposal>,
    invoices: HashMap<Uuid, Invoice>,
    templates: HashMap<Uuid, ProposalTemplate>,
    /// Last proposal public id handed out, per account
    proposal_counters: HashMap<Uuid, u32>,
}

/// In-memory entity store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| ProposalError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| ProposalError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn next_proposal_public_id(&self, account_id: &Uuid) -> Result<u32> {
        let mut tables = self.write()?;

        let highest = tables
            .proposals
            .values()
            .filter(|p| &p.account_id == account_id)
            .map(|p| p.public_id)
            .max()
            .unwrap_or(0);
        let counter = tables.proposal_counters.entry(*account_id).or_insert(0);
        *counter = (*counter).max(highest) + 1;

        Ok(*counter)
    }

    async fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal> {
        let mut tables = self.write()?;

        let taken = tables.proposals.values().any(|p| {
            p.account_id == proposal.account_id && p.public_id == proposal.public_id
        });
        if taken || tables.proposals.contains_key(&proposal.id) {
            return Err(ProposalError::Storage(format!(
                "proposal '{}' already exists",
                proposal.public_id
            )));
        }

        tables.proposals.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn update_proposal(&self, proposal: Proposal) -> Result<Proposal> {
        let mut tables = self.write()?;

        let existing = tables
            .proposals
            .get_mut(&proposal.id)
            .ok_or_else(|| ProposalError::not_found("proposal", proposal.public_id))?;
        *existing = proposal.clone();

        Ok(proposal)
    }

    async fn find_proposal(&self, account_id: &Uuid, public_id: u32) -> Result<Option<Proposal>> {
        let tables = self.read()?;

        Ok(tables
            .proposals
            .values()
            .find(|p| &p.account_id == account_id && p.public_id == public_id)
            .cloned())
    }

    async fn list_proposals(&self, account_id: &Uuid) -> Result<Vec<Proposal>> {
        let tables = self.read()?;

        let mut proposals: Vec<Proposal> = tables
            .proposals
            .values()
            .filter(|p| &p.account_id == account_id)
            .cloned()
            .collect();
        proposals.sort_by_key(|p| p.public_id);

        Ok(proposals)
    }

    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        let mut tables = self.write()?;
        tables.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn find_invoice(&self, account_id: &Uuid, public_id: u32) -> Result<Option<Invoice>> {
        let tables = self.read()?;

        Ok(tables
            .invoices
            .values()
            .find(|i| &i.account_id == account_id && i.public_id == public_id)
            .cloned())
    }

    async fn list_invoices(&self, account_id: &Uuid) -> Result<Vec<Invoice>> {
        let tables = self.read()?;

        let mut invoices: Vec<Invoice> = tables
            .invoices
            .values()
            .filter(|i| &i.account_id == account_id)
            .cloned()
            .collect();
        invoices.sort_by_key(|i| i.public_id);

        Ok(invoices)
    }

    async fn insert_template(&self, template: ProposalTemplate) -> Result<ProposalTemplate> {
        let mut tables = self.write()?;
        tables.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn find_template(
        &self,
        account_id: &Uuid,
        public_id: u32,
    ) -> Result<Option<ProposalTemplate>> {
        let tables = self.read()?;

        let candidates = tables
            .templates
            .values()
            .filter(|t| t.public_id == public_id && t.is_visible_to(account_id));

        // An account's own template shadows a global one with the same id
        Ok(candidates
            .max_by_key(|t| t.account_id.is_some())
            .cloned())
    }

    async fn list_templates(&self, account_id: &Uuid) -> Result<Vec<ProposalTemplate>> {
        let tables = self.read()?;

        Ok(tables
            .templates
            .values()
            .filter(|t| t.is_visible_to(account_id))
            .cloned()
            .collect())
    }
}
