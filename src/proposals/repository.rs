//! Proposal queries and persistence

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::RequestContext;
use crate::core::entity::Entity;
use crate::core::error::{ProposalError, Result};
use crate::core::state::{BulkAction, EntityState};
use crate::core::store::EntityStore;
use crate::entities::{Invoice, Proposal, ProposalTemplate};
use crate::proposals::payload::{IdField, ProposalPayload};

/// A proposal joined with the names shown in the list view
#[derive(Debug, Clone)]
pub struct ProposalRow {
    pub proposal: Proposal,
    pub quote_number: Option<String>,
    pub client_name: Option<String>,
    pub template_name: Option<String>,
}

impl ProposalRow {
    fn matches(&self, needle: &str) -> bool {
        [
            self.quote_number.as_deref(),
            self.client_name.as_deref(),
            self.template_name.as_deref(),
            Some(self.proposal.private_notes.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Result of a listing query
#[derive(Debug, Clone)]
pub struct ProposalListing {
    /// Rows visible to the requester before the search term is applied
    pub total: usize,
    pub rows: Vec<ProposalRow>,
}

#[derive(Clone)]
pub struct ProposalRepository {
    store: Arc<dyn EntityStore>,
}

impl ProposalRepository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    /// List the account's proposals for the datatable
    ///
    /// `filter_id` restricts to proposals created by that user. `states`
    /// selects lifecycle states; search is a case-insensitive substring
    /// match over quote number, client, template and private notes.
    pub async fn find(
        &self,
        account_id: &Uuid,
        search: Option<&str>,
        filter_id: Option<Uuid>,
        states: &[EntityState],
    ) -> Result<ProposalListing> {
        let invoices: HashMap<u32, Invoice> = self
            .store
            .list_invoices(account_id)
            .await?
            .into_iter()
            .map(|i| (i.public_id, i))
            .collect();
        let templates: HashMap<u32, ProposalTemplate> = self
            .templates(account_id)
            .await?
            .into_iter()
            .map(|t| (t.public_id, t))
            .collect();

        let rows: Vec<ProposalRow> = self
            .store
            .list_proposals(account_id)
            .await?
            .into_iter()
            .filter(|p| filter_id.is_none_or(|user| p.user_id == user))
            .filter(|p| states.contains(&p.state()))
            .map(|proposal| {
                let invoice = proposal.invoice_id.and_then(|id| invoices.get(&id));
                let template = proposal
                    .proposal_template_id
                    .and_then(|id| templates.get(&id));
                ProposalRow {
                    quote_number: invoice.map(|i| i.invoice_number.clone()),
                    client_name: invoice.map(|i| i.client.display_name()),
                    template_name: template.map(|t| t.name.clone()),
                    proposal,
                }
            })
            .collect();

        let total = rows.len();
        let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let needle = term.to_lowercase();
                rows.into_iter().filter(|row| row.matches(&needle)).collect()
            }
            None => rows,
        };

        Ok(ProposalListing { total, rows })
    }

    /// Quotes that can still receive a proposal, ordered by public id
    ///
    /// `include` forces one invoice into the list even when it no longer
    /// qualifies (the quote a proposal is already attached to).
    pub async fn unapproved_quotes(
        &self,
        account_id: &Uuid,
        include: Option<u32>,
    ) -> Result<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .store
            .list_invoices(account_id)
            .await?
            .into_iter()
            .filter(|i| i.is_visible_to(account_id) && i.matches_unapproved_quotes(include))
            .collect();
        invoices.sort_by_key(|i| i.public_id);
        Ok(invoices)
    }

    /// Templates owned by the account or global, ordered by name
    pub async fn templates(&self, account_id: &Uuid) -> Result<Vec<ProposalTemplate>> {
        let mut templates: Vec<ProposalTemplate> = self
            .store
            .list_templates(account_id)
            .await?
            .into_iter()
            .filter(|t| t.is_visible_to(account_id))
            .collect();
        templates.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.public_id.cmp(&b.public_id))
        });
        Ok(templates)
    }

    /// Create (when `existing` is `None`) or update a proposal
    pub async fn save(
        &self,
        context: &RequestContext,
        payload: &ProposalPayload,
        existing: Option<Proposal>,
    ) -> Result<Proposal> {
        let account_id = &context.account_id;
        let is_new = existing.is_none();

        let mut proposal = match existing {
            Some(proposal) => proposal,
            None => {
                let public_id = self.store.next_proposal_public_id(account_id).await?;
                Proposal::new(*account_id, context.user_id, public_id)
            }
        };

        if let Some(notes) = &payload.private_notes {
            proposal.private_notes = notes.clone();
        }
        if let Some(html) = &payload.html {
            proposal.html = html.clone();
        }
        if let Some(css) = &payload.css {
            proposal.css = css.clone();
        }

        match payload.invoice_id {
            IdField::Absent => {}
            IdField::Clear => proposal.invoice_id = None,
            IdField::Set(public_id) => {
                self.store
                    .find_invoice(account_id, public_id)
                    .await?
                    .ok_or_else(|| {
                        ProposalError::field("invoice_id", "The selected invoice id is invalid.")
                    })?;
                proposal.invoice_id = Some(public_id);
            }
        }

        match payload.proposal_template_id {
            IdField::Absent => {}
            IdField::Clear => proposal.proposal_template_id = None,
            IdField::Set(public_id) => {
                self.store
                    .find_template(account_id, public_id)
                    .await?
                    .ok_or_else(|| {
                        ProposalError::field(
                            "proposal_template_id",
                            "The selected proposal template id is invalid.",
                        )
                    })?;
                proposal.proposal_template_id = Some(public_id);
            }
        }

        proposal.touch();

        if is_new {
            self.store.insert_proposal(proposal).await
        } else {
            self.store.update_proposal(proposal).await
        }
    }

    /// Apply a lifecycle transition and persist it
    pub async fn apply_action(&self, mut proposal: Proposal, action: BulkAction) -> Result<Proposal> {
        let current = proposal.state();
        let next = current
            .transition(action)
            .ok_or_else(|| ProposalError::InvalidTransition {
                entity_type: Proposal::resource_name_singular().to_string(),
                public_id: proposal.public_id,
                action: action.to_string(),
                state: current.to_string(),
            })?;

        proposal.set_state(next);
        self.store.update_proposal(proposal).await
    }
}
