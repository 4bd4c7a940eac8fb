//! Business operations on proposals
//!
//! The service is the only place that applies lifecycle transitions. The
//! HTTP layer forwards requests and reports the outcome.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::auth::RequestContext;
use crate::core::error::{ProposalError, Result};
use crate::core::i18n::Translator;
use crate::core::query::{TableQuery, TableResult};
use crate::core::state::BulkAction;
use crate::core::store::EntityStore;
use crate::entities::Proposal;
use crate::proposals::datatable::ProposalDatatable;
use crate::proposals::payload::ProposalPayload;
use crate::proposals::repository::ProposalRepository;

#[derive(Clone)]
pub struct ProposalService {
    repo: ProposalRepository,
    translator: Arc<Translator>,
}

impl ProposalService {
    pub fn new(store: Arc<dyn EntityStore>, translator: Arc<Translator>) -> Self {
        Self {
            repo: ProposalRepository::new(store),
            translator,
        }
    }

    pub fn repository(&self) -> &ProposalRepository {
        &self.repo
    }

    /// Rows for the proposal list, scoped to the requester
    pub async fn fetch_table_data(
        &self,
        context: &RequestContext,
        query: &TableQuery,
    ) -> Result<TableResult> {
        let listing = self
            .repo
            .find(
                &context.account_id,
                query.search.as_deref(),
                context.filter_id(),
                &query.states,
            )
            .await?;

        Ok(ProposalDatatable::build(listing, query, &self.translator))
    }

    /// Persist a raw payload; `existing` is `None` for a creation
    pub async fn save(
        &self,
        context: &RequestContext,
        payload: &Map<String, Value>,
        existing: Option<Proposal>,
    ) -> Result<Proposal> {
        let payload = ProposalPayload::from_map(payload)?;
        let is_new = existing.is_none();
        if is_new {
            payload.validate_for_create()?;
        } else {
            payload.validate_for_update()?;
        }

        let proposal = self.repo.save(context, &payload, existing).await?;

        tracing::info!(
            account_id = %context.account_id,
            public_id = proposal.public_id,
            created = is_new,
            "proposal saved"
        );
        Ok(proposal)
    }

    /// Apply `action` to every listed proposal the requester may edit
    ///
    /// Unknown ids, foreign proposals and transitions that are not allowed
    /// from the current state are skipped. Returns the number of proposals
    /// actually changed.
    pub async fn bulk(
        &self,
        context: &RequestContext,
        ids: &[u32],
        action: BulkAction,
    ) -> Result<usize> {
        let mut count = 0;

        for &public_id in ids {
            let Some(proposal) = self
                .repo
                .store()
                .find_proposal(&context.account_id, public_id)
                .await?
            else {
                tracing::debug!(public_id, "bulk target not found");
                continue;
            };

            if !context.can_edit(&proposal.user_id) {
                tracing::debug!(public_id, "bulk target not editable by requester");
                continue;
            }

            match self.repo.apply_action(proposal, action).await {
                Ok(_) => count += 1,
                Err(ProposalError::InvalidTransition { state, .. }) => {
                    tracing::debug!(public_id, %state, %action, "transition skipped");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            account_id = %context.account_id,
            %action,
            requested = ids.len(),
            count,
            "bulk action applied"
        );
        Ok(count)
    }
}
