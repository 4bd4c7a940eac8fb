//! Request-scoped authentication context
//!
//! Session handling lives in front of this service. The upstream gateway
//! forwards the authenticated user as headers, which are turned into a
//! [`RequestContext`] passed explicitly into every operation.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::error::ProposalError;

pub const ACCOUNT_HEADER: &str = "x-account-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ADMIN_HEADER: &str = "x-user-admin";
pub const PERMISSIONS_HEADER: &str = "x-user-permissions";

/// Account-wide permission granted to a non-admin user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateAll,
    ViewAll,
    EditAll,
}

impl FromStr for Permission {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "create_all" => Ok(Permission::CreateAll),
            "view_all" => Ok(Permission::ViewAll),
            "edit_all" => Ok(Permission::EditAll),
            other => Err(ProposalError::BadRequest {
                message: format!("Unknown permission: {}", other),
            }),
        }
    }
}

/// Authenticated user and tenant for one request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub permissions: HashSet<Permission>,
}

impl RequestContext {
    pub fn new(account_id: Uuid, user_id: Uuid) -> Self {
        Self {
            account_id,
            user_id,
            is_admin: false,
            permissions: HashSet::new(),
        }
    }

    pub fn admin(account_id: Uuid, user_id: Uuid) -> Self {
        Self {
            is_admin: true,
            ..Self::new(account_id, user_id)
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Admins implicitly hold every permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_admin || self.permissions.contains(&permission)
    }

    /// Owner filter for listings: `None` when the user may view all records
    pub fn filter_id(&self) -> Option<Uuid> {
        if self.has_permission(Permission::ViewAll) {
            None
        } else {
            Some(self.user_id)
        }
    }

    pub fn can_create(&self) -> bool {
        self.has_permission(Permission::CreateAll)
    }

    pub fn can_view(&self, owner_id: &Uuid) -> bool {
        self.has_permission(Permission::ViewAll) || &self.user_id == owner_id
    }

    pub fn can_edit(&self, owner_id: &Uuid) -> bool {
        self.has_permission(Permission::EditAll) || &self.user_id == owner_id
    }

    /// Build the context from forwarded identity headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ProposalError> {
        let account_id = uuid_header(headers, ACCOUNT_HEADER)?;
        let user_id = uuid_header(headers, USER_HEADER)?;

        let is_admin = headers
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| matches!(v.trim(), "1" | "true"));

        let permissions = headers
            .get(PERMISSIONS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .map(Permission::from_str)
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self {
            account_id,
            user_id,
            is_admin,
            permissions,
        })
    }
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Uuid, ProposalError> {
    let raw = headers
        .get(name)
        .ok_or_else(|| ProposalError::Unauthorized {
            message: format!("Missing {} header", name),
        })?
        .to_str()
        .map_err(|_| ProposalError::Unauthorized {
            message: format!("Invalid {} header", name),
        })?;

    Uuid::parse_str(raw.trim()).map_err(|_| ProposalError::Unauthorized {
        message: format!("Invalid {} header", name),
    })
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ProposalError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<RequestContext>() {
            return Ok(context.clone());
        }
        let context = RequestContext::from_headers(&parts.headers)?;
        parts.extensions.insert(context.clone());
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(account: Uuid, user: Uuid) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCOUNT_HEADER,
            HeaderValue::from_str(&account.to_string()).unwrap(),
        );
        headers.insert(USER_HEADER, HeaderValue::from_str(&user.to_string()).unwrap());
        headers
    }

    #[test]
    fn test_filter_id_depends_on_view_all() {
        let user = Uuid::new_v4();
        let context = RequestContext::new(Uuid::new_v4(), user);
        assert_eq!(context.filter_id(), Some(user));

        let context = context.with_permission(Permission::ViewAll);
        assert_eq!(context.filter_id(), None);
    }

    #[test]
    fn test_admin_has_every_permission() {
        let context = RequestContext::admin(Uuid::new_v4(), Uuid::new_v4());
        assert!(context.can_create());
        assert!(context.can_edit(&Uuid::new_v4()));
        assert_eq!(context.filter_id(), None);
    }

    #[test]
    fn test_owner_can_edit_without_permission() {
        let user = Uuid::new_v4();
        let context = RequestContext::new(Uuid::new_v4(), user);
        assert!(context.can_edit(&user));
        assert!(!context.can_edit(&Uuid::new_v4()));
    }

    #[test]
    fn test_from_headers() {
        let account = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut map = headers(account, user);
        map.insert(
            PERMISSIONS_HEADER,
            HeaderValue::from_static("create_all, edit_all"),
        );

        let context = RequestContext::from_headers(&map).unwrap();
        assert_eq!(context.account_id, account);
        assert_eq!(context.user_id, user);
        assert!(!context.is_admin);
        assert!(context.has_permission(Permission::CreateAll));
        assert!(context.has_permission(Permission::EditAll));
        assert!(!context.has_permission(Permission::ViewAll));
    }

    #[test]
    fn test_missing_account_is_unauthorized() {
        let mut map = HeaderMap::new();
        map.insert(
            USER_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        let err = RequestContext::from_headers(&map).unwrap_err();
        assert!(matches!(err, ProposalError::Unauthorized { .. }));
    }

    #[test]
    fn test_unknown_permission_is_rejected() {
        let mut map = headers(Uuid::new_v4(), Uuid::new_v4());
        map.insert(PERMISSIONS_HEADER, HeaderValue::from_static("root"));
        assert!(RequestContext::from_headers(&map).is_err());
    }
}
