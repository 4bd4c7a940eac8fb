//! HTTP server assembly
//!
//! [`ServerBuilder`] wires the store, translations and templates into the
//! proposal routes and adds a health check.

pub mod builder;
pub mod router;
pub mod views;

pub use builder::ServerBuilder;
pub use views::Views;
