//! The proposal controller and its collaborators
//!
//! - [`repository`]: account-scoped queries and persistence
//! - [`service`]: save and lifecycle transitions
//! - [`datatable`]: list columns and row rendering
//! - [`requests`]: authorization and validation of incoming requests
//! - [`handlers`]: the HTTP actions

pub mod datatable;
pub mod handlers;
pub mod payload;
pub mod repository;
pub mod requests;
pub mod service;
pub mod views;

pub use handlers::AppState;
pub use repository::ProposalRepository;
pub use service::ProposalService;
