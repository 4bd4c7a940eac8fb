//! # Proposal Desk
//!
//! Proposal management for an invoicing application: list, create, edit
//! and bulk archive/delete/restore of proposals built on top of quotes.
//!
//! ## Features
//!
//! - **Account scoped**: every query runs inside the requester's account
//! - **Explicit lifecycle**: `active`, `archived` and `deleted` with validated transitions
//! - **Server-rendered pages**: tera templates with one-shot flash notices
//! - **Datatable endpoint**: search, sort and paging for the list view
//! - **Pluggable storage**: anything implementing [`EntityStore`](core::store::EntityStore)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use proposals::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod proposals;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Permission, RequestContext},
        entity::Entity,
        error::{ProposalError, Result},
        flash::{FlashCookie, Notice, Redirect},
        i18n::Translator,
        state::{BulkAction, EntityState},
        store::EntityStore,
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Entities ===
    pub use crate::entities::{Client, Contact, Invoice, InvoiceStatus, Proposal, ProposalTemplate};

    // === Proposals ===
    pub use crate::proposals::{AppState, ProposalRepository, ProposalService};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
