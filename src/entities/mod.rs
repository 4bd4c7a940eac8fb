//! Entity definitions

pub mod invoice;
pub mod macros;
pub mod proposal;
pub mod template;

pub use invoice::{Client, Contact, Invoice, InvoiceStatus};
pub use proposal::Proposal;
pub use template::ProposalTemplate;
