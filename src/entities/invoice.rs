//! Invoice entity (read-only here; quotes are the ones proposals attach to)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_entity;

/// Invoice workflow status, ordered by progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Viewed,
    Approved,
    Partial,
    Paid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    pub country: Option<String>,
}

impl Client {
    /// Client name, or the primary contact's name when unnamed
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        self.contacts
            .first()
            .map(Contact::full_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub public_id: u32,
    pub account_id: Uuid,
    pub invoice_number: String,
    pub is_quote: bool,
    pub status: InvoiceStatus,

    /// Set once the quote has been converted into an invoice
    pub quote_invoice_id: Option<u32>,

    pub client: Client,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Invoice, "invoices", "invoice", soft_state);

impl Invoice {
    pub fn quote(account_id: Uuid, public_id: u32, invoice_number: &str, client: Client) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            public_id,
            account_id,
            invoice_number: invoice_number.to_string(),
            is_quote: true,
            status: InvoiceStatus::Draft,
            quote_invoice_id: None,
            client,
            created_at: now,
            updated_at: now,
            archived_at: None,
            deleted_at: None,
        }
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// A live quote that has been neither approved nor converted
    pub fn is_unapproved_quote(&self) -> bool {
        self.is_quote
            && self.deleted_at.is_none()
            && self.status < InvoiceStatus::Approved
            && self.quote_invoice_id.is_none()
    }

    /// Unapproved-quote filter, optionally forcing one live invoice in
    pub fn matches_unapproved_quotes(&self, include: Option<u32>) -> bool {
        let included = include == Some(self.public_id) && self.deleted_at.is_none();
        included || self.is_unapproved_quote()
    }
}
