//! Core building blocks shared by the proposal module

pub mod auth;
pub mod entity;
pub mod error;
pub mod flash;
pub mod i18n;
pub mod input;
pub mod query;
pub mod state;
pub mod store;

pub use auth::{Permission, RequestContext};
pub use entity::Entity;
pub use error::{ProposalError, Result};
pub use flash::{FlashCookie, Notice, Redirect};
pub use i18n::Translator;
pub use input::RequestInput;
pub use query::{TableQuery, TableResult};
pub use state::{BulkAction, EntityState};
pub use store::EntityStore;
