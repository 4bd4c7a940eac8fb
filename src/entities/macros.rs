//! Macros for reducing boilerplate when defining entities
//!
//! Entities share the same field names (`id`, `public_id`, `account_id`,
//! `created_at`, `updated_at` and optionally `archived_at` / `deleted_at`),
//! so the [`Entity`](crate::core::entity::Entity) implementation is
//! generated.

/// Implement [`Entity`](crate::core::entity::Entity) for a struct
///
/// `account_id` may be either `Uuid` or `Option<Uuid>` (global records).
/// Add `soft_state` when the struct carries `archived_at` and `deleted_at`.
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(Proposal, "proposals", "proposal", soft_state);
/// impl_entity!(ProposalTemplate, "proposal_templates", "proposal_template");
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $plural:literal, $singular:literal) => {
        $crate::impl_entity!(@impl $type, $plural, $singular, {});
    };

    ($type:ident, $plural:literal, $singular:literal, soft_state) => {
        $crate::impl_entity!(@impl $type, $plural, $singular, {
            fn archived_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.archived_at
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }
        });
    };

    (@impl $type:ident, $plural:literal, $singular:literal, { $($extra:tt)* }) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn public_id(&self) -> u32 {
                self.public_id
            }

            fn account_id(&self) -> Option<::uuid::Uuid> {
                Option::<::uuid::Uuid>::from(self.account_id)
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            $($extra)*
        }
    };
}
