//! Entity traits defining the core abstraction for account-owned records

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::state::EntityState;

/// Base trait for all entities in the system.
///
/// Every entity has:
/// - id: internal unique identifier
/// - public_id: account-scoped identifier used in URLs and forms
/// - account_id: the tenant owning the record
/// - created_at / updated_at timestamps
/// - archived_at / deleted_at soft-state timestamps
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "proposals")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "proposal")
    fn resource_name_singular() -> &'static str;

    // === Core Entity Fields ===

    fn id(&self) -> Uuid;

    fn public_id(&self) -> u32;

    /// Owning account, `None` for global records
    fn account_id(&self) -> Option<Uuid>;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    fn archived_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    // === Utility Methods ===

    /// Current lifecycle state, deleted taking precedence over archived
    fn state(&self) -> EntityState {
        if self.deleted_at().is_some() {
            EntityState::Deleted
        } else if self.archived_at().is_some() {
            EntityState::Archived
        } else {
            EntityState::Active
        }
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Whether a request scoped to `account_id` may see this record
    fn is_visible_to(&self, account_id: &Uuid) -> bool {
        self.account_id().is_none_or(|owner| &owner == account_id)
    }

    /// Canonical URL of the record (e.g. `/proposals/7`)
    fn route(&self) -> String {
        format!("/{}/{}", Self::resource_name(), self.public_id())
    }
}
