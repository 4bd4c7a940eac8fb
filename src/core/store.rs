//! Storage trait for account-scoped entities
//!
//! Every read takes the requesting account and must only return records
//! owned by that account (or global records, for templates). The framework
//! is agnostic to the underlying storage mechanism.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::entities::{Invoice, Proposal, ProposalTemplate};

#[async_trait]
pub trait EntityStore: Send + Sync {
    // === Proposals ===

    /// Reserve the next public id for a proposal in `account_id`
    async fn next_proposal_public_id(&self, account_id: &Uuid) -> Result<u32>;

    async fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal>;

    /// Replace an existing proposal (matched on `id`)
    async fn update_proposal(&self, proposal: Proposal) -> Result<Proposal>;

    /// Find a proposal by public id, whatever its lifecycle state
    async fn find_proposal(&self, account_id: &Uuid, public_id: u32) -> Result<Option<Proposal>>;

    /// Every proposal of the account, ordered by public id
    async fn list_proposals(&self, account_id: &Uuid) -> Result<Vec<Proposal>>;

    // === Invoices ===

    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice>;

    async fn find_invoice(&self, account_id: &Uuid, public_id: u32) -> Result<Option<Invoice>>;

    async fn list_invoices(&self, account_id: &Uuid) -> Result<Vec<Invoice>>;

    // === Templates ===

    async fn insert_template(&self, template: ProposalTemplate) -> Result<ProposalTemplate>;

    /// Find a template owned by the account, else a global one
    async fn find_template(
        &self,
        account_id: &Uuid,
        public_id: u32,
    ) -> Result<Option<ProposalTemplate>>;

    /// Templates owned by the account plus global templates
    async fn list_templates(&self, account_id: &Uuid) -> Result<Vec<ProposalTemplate>>;
}
