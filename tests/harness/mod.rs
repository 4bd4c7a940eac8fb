//! Shared fixtures for the HTTP integration tests
//!
//! Every test gets a fresh in-memory store seeded with two accounts:
//!
//! ```text
//! account        invoices                              templates
//! ─────────────  ────────────────────────────────────  ─────────────────────
//! main           1 Q-0001 Acme (draft)                 2 "Alpha Own"
//!                2 Q-0002 Globex (sent)
//!                3 Q-0003 Initech (approved)
//! other          1 X-0001 Foreign Ltd (draft)          3 "Beta Foreign"
//! (global)                                             1 "Zeta Global"
//! ```

#![allow(dead_code)]

use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestResponse, TestServer};
use proposals::core::auth::{ACCOUNT_HEADER, ADMIN_HEADER, PERMISSIONS_HEADER, USER_HEADER};
use proposals::prelude::*;
use serde_json::json;

/// Identity forwarded by the gateway
#[derive(Debug, Clone)]
pub struct TestUser {
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub admin: bool,
    pub permissions: &'static str,
}

impl TestUser {
    pub fn sign(&self, request: TestRequest) -> TestRequest {
        let mut request = request
            .add_header(header(ACCOUNT_HEADER), value(&self.account_id.to_string()))
            .add_header(header(USER_HEADER), value(&self.user_id.to_string()));
        if self.admin {
            request = request.add_header(header(ADMIN_HEADER), value("1"));
        }
        if !self.permissions.is_empty() {
            request = request.add_header(header(PERMISSIONS_HEADER), value(self.permissions));
        }
        request
    }

    /// Another user of the same account
    pub fn colleague(&self, permissions: &'static str) -> TestUser {
        TestUser {
            account_id: self.account_id,
            user_id: Uuid::new_v4(),
            admin: false,
            permissions,
        }
    }
}

pub struct Harness {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub admin: TestUser,
    pub outsider: TestUser,
}

impl Harness {
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let account = Uuid::new_v4();
        let other_account = Uuid::new_v4();

        let quotes = [
            (1, "Q-0001", "Acme", InvoiceStatus::Draft),
            (2, "Q-0002", "Globex", InvoiceStatus::Sent),
            (3, "Q-0003", "Initech", InvoiceStatus::Approved),
        ];
        for (public_id, number, client, status) in quotes {
            store
                .insert_invoice(Invoice::quote(account, public_id, number, client_named(client)).with_status(status))
                .await
                .unwrap();
        }
        store
            .insert_invoice(Invoice::quote(other_account, 1, "X-0001", client_named("Foreign Ltd")))
            .await
            .unwrap();

        store
            .insert_template(ProposalTemplate::new(None, 1, "Zeta Global"))
            .await
            .unwrap();
        store
            .insert_template(ProposalTemplate::new(Some(account), 2, "Alpha Own"))
            .await
            .unwrap();
        store
            .insert_template(ProposalTemplate::new(Some(other_account), 3, "Beta Foreign"))
            .await
            .unwrap();

        let router = ServerBuilder::new()
            .with_store(store.clone())
            .build()
            .unwrap();

        Self {
            server: TestServer::new(router),
            store,
            admin: TestUser {
                account_id: account,
                user_id: Uuid::new_v4(),
                admin: true,
                permissions: "",
            },
            outsider: TestUser {
                account_id: other_account,
                user_id: Uuid::new_v4(),
                admin: true,
                permissions: "",
            },
        }
    }

    pub fn get(&self, user: &TestUser, path: &str) -> TestRequest {
        user.sign(self.server.get(path))
    }

    pub fn post(&self, user: &TestUser, path: &str) -> TestRequest {
        user.sign(self.server.post(path))
    }

    pub fn put(&self, user: &TestUser, path: &str) -> TestRequest {
        user.sign(self.server.put(path))
    }

    /// Create a proposal through the API and return its public id
    pub async fn create_proposal(&self, user: &TestUser, invoice_id: u32) -> u32 {
        let response = self
            .post(user, "/proposals")
            .json(&json!({ "invoice_id": invoice_id }))
            .await;
        assert_eq!(response.status_code(), 303, "{}", response.text());
        location(&response)
            .trim_start_matches("/proposals/")
            .parse()
            .unwrap()
    }

    pub async fn find(&self, user: &TestUser, public_id: u32) -> Proposal {
        self.store
            .find_proposal(&user.account_id, public_id)
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn client_named(name: &str) -> Client {
    Client {
        name: name.to_string(),
        contacts: vec![],
        country: None,
    }
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Value of the `flash_message` cookie set by the response, if any
pub fn flash(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "flash_message")
        .map(|(_, value)| value.to_string())
}

pub fn with_flash(request: TestRequest, notice: &str) -> TestRequest {
    request.add_header(COOKIE, value(&format!("flash_message={}", notice)))
}

fn header(name: &'static str) -> HeaderName {
    HeaderName::from_static(name)
}

fn value(raw: &str) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap()
}
