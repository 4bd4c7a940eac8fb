//! View models for the proposal pages
//!
//! These are plain serializable structs; rendering them is the job of
//! [`Views`](crate::server::views::Views).

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::core::auth::RequestContext;
use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::i18n::Translator;
use crate::entities::{Invoice, Proposal, ProposalTemplate};
use crate::proposals::datatable::{DatatableDescriptor, ProposalDatatable};
use crate::proposals::repository::ProposalRepository;

const LABEL_KEYS: &[&str] = &[
    "quote",
    "template",
    "private_notes",
    "select_quote",
    "select_template",
    "save",
    "archive",
    "delete",
    "restore",
];

fn labels(translator: &Translator) -> BTreeMap<&'static str, String> {
    let mut labels: BTreeMap<&'static str, String> = LABEL_KEYS
        .iter()
        .map(|key| (*key, translator.trans(key, &[])))
        .collect();
    labels.insert("new", translator.trans("new_proposal", &[]));
    labels
}

/// The list page: the rows themselves are fetched from `datatable.source_url`
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub entity_type: &'static str,
    pub datatable: DatatableDescriptor,
    pub title: String,
    pub create_url: String,
    pub labels: BTreeMap<&'static str, String>,
}

impl ListView {
    pub fn build(translator: &Translator) -> Self {
        Self {
            entity_type: Proposal::resource_name_singular(),
            datatable: ProposalDatatable::descriptor(translator),
            title: translator.trans("proposals", &[]),
            create_url: format!("/{}/create", Proposal::resource_name()),
            labels: labels(translator),
        }
    }
}

/// Shared create/edit form
#[derive(Debug, Clone, Serialize)]
pub struct ProposalFormView {
    pub account_id: Uuid,
    pub proposal: Option<Proposal>,
    pub method: &'static str,
    pub url: String,
    pub title: String,
    /// Selectable quotes, with client details
    pub invoices: Vec<Invoice>,
    pub templates: Vec<ProposalTemplate>,
    pub invoice_public_id: Option<u32>,
    pub template_public_id: Option<u32>,
    pub labels: BTreeMap<&'static str, String>,
}

impl ProposalFormView {
    /// Blank form, optionally preselecting a quote and a template
    pub async fn create(
        repo: &ProposalRepository,
        translator: &Translator,
        context: &RequestContext,
        invoice_public_id: Option<u32>,
        template_public_id: Option<u32>,
    ) -> Result<Self> {
        let account_id = context.account_id;

        Ok(Self {
            account_id,
            proposal: None,
            method: "POST",
            url: format!("/{}", Proposal::resource_name()),
            title: translator.trans("new_proposal", &[]),
            invoices: repo.unapproved_quotes(&account_id, None).await?,
            templates: repo.templates(&account_id).await?,
            invoice_public_id,
            template_public_id,
            labels: labels(translator),
        })
    }

    /// Form for an existing proposal
    ///
    /// The quote currently linked is always offered, even once approved.
    pub async fn edit(
        repo: &ProposalRepository,
        translator: &Translator,
        context: &RequestContext,
        proposal: Proposal,
    ) -> Result<Self> {
        let account_id = context.account_id;
        let invoices = repo
            .unapproved_quotes(&account_id, proposal.invoice_id)
            .await?;
        let templates = repo.templates(&account_id).await?;

        let invoice_public_id = proposal
            .invoice_id
            .filter(|id| invoices.iter().any(|i| i.public_id == *id));
        let template_public_id = proposal
            .proposal_template_id
            .filter(|id| templates.iter().any(|t| t.public_id == *id));

        Ok(Self {
            account_id,
            method: "PUT",
            url: proposal.route(),
            title: translator.trans("edit_proposal", &[]),
            invoices,
            templates,
            invoice_public_id,
            template_public_id,
            labels: labels(translator),
            proposal: Some(proposal),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_view() {
        let view = ListView::build(&Translator::english());
        assert_eq!(view.entity_type, "proposal");
        assert_eq!(view.title, "Proposals");
        assert_eq!(view.create_url, "/proposals/create");
        assert_eq!(view.datatable.source_url, "/proposals/datatable");
        assert_eq!(view.labels["new"], "New Proposal");
    }
}
