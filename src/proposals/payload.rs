//! Typed view of a raw proposal payload
//!
//! Forms post everything as strings, so ids arrive as `"12"`, `""` or are
//! missing altogether. The three cases mean different things on update:
//! set the link, clear it, or leave it alone.

use serde_json::{Map, Value};
use validator::Validate;

use crate::core::error::{ProposalError, Result};

/// A foreign key field as submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdField {
    /// Key not submitted: keep the current value
    #[default]
    Absent,
    /// Submitted empty, null or zero: remove the link
    Clear,
    /// Submitted public id
    Set(u32),
}

impl IdField {
    fn parse(map: &Map<String, Value>, key: &str) -> Result<Self> {
        let invalid = || ProposalError::field(key, format!("The {} must be a valid id.", key));

        match map.get(key) {
            None => Ok(IdField::Absent),
            Some(Value::Null) => Ok(IdField::Clear),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(0) => Ok(IdField::Clear),
                Some(id) => u32::try_from(id).map(IdField::Set).map_err(|_| invalid()),
                None => Err(invalid()),
            },
            Some(Value::String(s)) => match s.trim() {
                "" | "0" => Ok(IdField::Clear),
                raw => raw.parse().map(IdField::Set).map_err(|_| invalid()),
            },
            Some(_) => Err(invalid()),
        }
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            IdField::Set(id) => Some(*id),
            _ => None,
        }
    }
}

/// Fillable proposal fields
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProposalPayload {
    pub invoice_id: IdField,

    pub proposal_template_id: IdField,

    #[validate(length(max = 65535, message = "The private notes may not be greater than 65535 characters."))]
    pub private_notes: Option<String>,

    #[validate(length(max = 4194304, message = "The html may not be greater than 4MB."))]
    pub html: Option<String>,

    #[validate(length(max = 1048576, message = "The css may not be greater than 1MB."))]
    pub css: Option<String>,
}

impl ProposalPayload {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            invoice_id: IdField::parse(map, "invoice_id")?,
            proposal_template_id: IdField::parse(map, "proposal_template_id")?,
            private_notes: text(map, "private_notes"),
            html: text(map, "html"),
            css: text(map, "css"),
        })
    }

    /// Rules for a new proposal: the quote is mandatory
    pub fn validate_for_create(&self) -> Result<()> {
        self.validate()?;
        if self.invoice_id.value().is_none() {
            return Err(ProposalError::field(
                "invoice_id",
                "The invoice id field is required.",
            ));
        }
        Ok(())
    }

    pub fn validate_for_update(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        other => Some(other.to_string()),
    }
}
