//! HTTP-level tests for the proposal pages, forms and datatable

mod harness;

use axum::http::StatusCode;
use harness::{Harness, flash, location, with_flash};
use proposals::prelude::*;
use serde_json::{Value, json};

// ==============================================================
// Health & authentication
// ==============================================================

#[tokio::test]
async fn test_health() {
    let h = Harness::new().await;

    let response = h.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let h = Harness::new().await;

    let response = h.server.get("/proposals").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    let response = h.server.get("/proposals/datatable").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ==============================================================
// List
// ==============================================================

#[tokio::test]
async fn test_list_page() {
    let h = Harness::new().await;

    let response = h.get(&h.admin, "/proposals").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("<title>Proposals</title>"));
    assert!(html.contains("data-source=\"/proposals/datatable\""));
    assert!(html.contains("data-entity-type=\"proposal\""));
    assert!(html.contains("href=\"/proposals/create\""));
    assert!(flash(&response).is_none());
}

#[tokio::test]
async fn test_list_page_consumes_flash() {
    let h = Harness::new().await;

    let response = with_flash(h.get(&h.admin, "/proposals"), "archived_proposals:2").await;
    response.assert_status_ok();

    assert!(response.text().contains("Successfully archived 2 proposals"));
    // cookie expired once shown
    assert_eq!(flash(&response).as_deref(), Some(""));
    let set_cookie = response.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(set_cookie.contains("Max-Age=0"));
}

// ==============================================================
// Datatable
// ==============================================================

#[tokio::test]
async fn test_datatable_lists_account_proposals() {
    let h = Harness::new().await;
    h.create_proposal(&h.admin, 1).await;
    h.create_proposal(&h.admin, 2).await;

    let response = h
        .get(&h.admin, "/proposals/datatable?sEcho=7&iSortCol_0=1&sSortDir_0=asc")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["sEcho"], 7);
    assert_eq!(body["iTotalRecords"], 2);
    assert_eq!(body["iTotalDisplayRecords"], 2);

    let rows = body["aaData"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "<a href=\"/proposals/1/edit\">Q-0001</a>");
    assert_eq!(rows[0][2], "Acme");
    assert_eq!(rows[1][2], "Globex");
    assert_eq!(rows[0][6], "Active");
}

#[tokio::test]
async fn test_datatable_search_and_paging() {
    let h = Harness::new().await;
    for invoice in [1, 2, 2] {
        h.create_proposal(&h.admin, invoice).await;
    }

    let body: Value = h
        .get(&h.admin, "/proposals/datatable?sSearch=globex")
        .await
        .json();
    assert_eq!(body["iTotalRecords"], 3);
    assert_eq!(body["iTotalDisplayRecords"], 2);

    let body: Value = h
        .get(&h.admin, "/proposals/datatable?iDisplayStart=2&iDisplayLength=2")
        .await
        .json();
    assert_eq!(body["iTotalDisplayRecords"], 3);
    assert_eq!(body["aaData"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_datatable_with_id_segment() {
    let h = Harness::new().await;
    h.create_proposal(&h.admin, 1).await;

    let response = h.get(&h.admin, "/proposals/42/datatable").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["iTotalRecords"], 1);
}

#[tokio::test]
async fn test_datatable_is_scoped_to_user_without_view_all() {
    let h = Harness::new().await;
    let author = h.admin.colleague("create_all");
    let reader = h.admin.colleague("");
    let manager = h.admin.colleague("view_all");

    h.create_proposal(&author, 1).await;

    let body: Value = h.get(&author, "/proposals/datatable").await.json();
    assert_eq!(body["iTotalRecords"], 1);

    let body: Value = h.get(&reader, "/proposals/datatable").await.json();
    assert_eq!(body["iTotalRecords"], 0);

    let body: Value = h.get(&manager, "/proposals/datatable").await.json();
    assert_eq!(body["iTotalRecords"], 1);
}

// ==============================================================
// Create form
// ==============================================================

#[tokio::test]
async fn test_create_form_lists_unapproved_quotes_and_templates() {
    let h = Harness::new().await;

    let response = h.get(&h.admin, "/proposals/create").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("<title>New Proposal</title>"));
    assert!(html.contains("action=\"/proposals\""));
    assert!(html.contains("Q-0001 - Acme"));
    assert!(html.contains("Q-0002 - Globex"));
    assert!(!html.contains("Q-0003"), "approved quote must not be offered");
    assert!(!html.contains("X-0001"), "foreign quote must not be offered");

    // own and global templates, by name; other accounts' never
    let alpha = html.find("Alpha Own").unwrap();
    let zeta = html.find("Zeta Global").unwrap();
    assert!(alpha < zeta);
    assert!(!html.contains("Beta Foreign"));
}

#[tokio::test]
async fn test_create_form_preselects_hints() {
    let h = Harness::new().await;

    let html = h
        .get(&h.admin, "/proposals/create?invoice_id=2&proposal_template_id=1")
        .await
        .text();

    assert!(html.contains("<option value=\"2\" selected>"));
    assert!(html.contains("<option value=\"1\" selected>Zeta Global</option>"));
    assert!(!html.contains("<option value=\"1\" selected>Q-0001"));
}

#[tokio::test]
async fn test_create_form_requires_create_permission() {
    let h = Harness::new().await;

    let response = h.get(&h.admin.colleague(""), "/proposals/create").await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = h.get(&h.admin.colleague("create_all"), "/proposals/create").await;
    response.assert_status_ok();
}

// ==============================================================
// Create
// ==============================================================

#[tokio::test]
async fn test_create_redirects_with_notice() {
    let h = Harness::new().await;

    let response = h
        .post(&h.admin, "/proposals")
        .json(&json!({
            "invoice_id": 2,
            "proposal_template_id": 1,
            "private_notes": "call back on monday"
        }))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/proposals/1");
    assert_eq!(flash(&response).as_deref(), Some("created_proposal"));

    let proposal = h.find(&h.admin, 1).await;
    assert_eq!(proposal.invoice_id, Some(2));
    assert_eq!(proposal.proposal_template_id, Some(1));
    assert_eq!(proposal.private_notes, "call back on monday");
    assert_eq!(proposal.user_id, h.admin.user_id);
}

#[tokio::test]
async fn test_create_with_repeated_field_uses_last_value() {
    let h = Harness::new().await;

    let response = h
        .post(&h.admin, "/proposals")
        .form(&[("invoice_id", "1"), ("invoice_id", "2")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(h.find(&h.admin, 1).await.invoice_id, Some(2));
}

#[tokio::test]
async fn test_create_from_form_post() {
    let h = Harness::new().await;

    let response = h
        .post(&h.admin, "/proposals")
        .form(&[("invoice_id", "1"), ("proposal_template_id", ""), ("private_notes", "a & b")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let proposal = h.find(&h.admin, 1).await;
    assert_eq!(proposal.proposal_template_id, None);
    assert_eq!(proposal.private_notes, "a & b");
}

#[tokio::test]
async fn test_create_requires_invoice() {
    let h = Harness::new().await;

    let response = h
        .post(&h.admin, "/proposals")
        .json(&json!({ "private_notes": "no quote" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["fields"]["invoice_id"].is_array());
    assert!(flash(&response).is_none());
}

#[tokio::test]
async fn test_create_rejects_foreign_invoice() {
    let h = Harness::new().await;

    // invoice 2 only exists in the main account
    let response = h
        .post(&h.outsider, "/proposals")
        .json(&json!({ "invoice_id": 2 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // foreign template
    let response = h
        .post(&h.admin, "/proposals")
        .json(&json!({ "invoice_id": 1, "proposal_template_id": 3 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_requires_create_permission() {
    let h = Harness::new().await;

    let response = h
        .post(&h.admin.colleague(""), "/proposals")
        .json(&json!({ "invoice_id": 1 }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

// ==============================================================
// Show & edit
// ==============================================================

#[tokio::test]
async fn test_show_redirects_to_edit_and_reflashes() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h.get(&h.admin, &format!("/proposals/{}", id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/proposals/{}/edit", id));
    assert!(flash(&response).is_none());

    let response = with_flash(
        h.get(&h.admin, &format!("/proposals/{}", id)),
        "created_proposal",
    )
    .await;
    assert_eq!(location(&response), format!("/proposals/{}/edit", id));
    assert_eq!(flash(&response).as_deref(), Some("created_proposal"));
}

#[tokio::test]
async fn test_edit_form() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 2).await;

    let response = with_flash(
        h.get(&h.admin, &format!("/proposals/{}/edit", id)),
        "created_proposal",
    )
    .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("<title>Edit Proposal</title>"));
    assert!(html.contains("Successfully created proposal"));
    assert!(html.contains(&format!("action=\"/proposals/{}\"", id)));
    assert!(html.contains("name=\"_method\" value=\"PUT\""));
    assert!(html.contains(&format!("name=\"public_id\" value=\"{}\"", id)));
    assert!(html.contains("<option value=\"2\" selected>Q-0002 - Globex"));
    assert_eq!(flash(&response).as_deref(), Some(""));
}

#[tokio::test]
async fn test_edit_form_keeps_linked_approved_quote() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 3).await;

    let html = h
        .get(&h.admin, &format!("/proposals/{}/edit", id))
        .await
        .text();
    assert!(html.contains("<option value=\"3\" selected>Q-0003 - Initech"));
    assert!(html.contains("Q-0001 - Acme"));

    // still hidden from the create form
    let html = h.get(&h.admin, "/proposals/create").await.text();
    assert!(!html.contains("Q-0003"));
}

#[tokio::test]
async fn test_edit_unknown_or_foreign_proposal_is_not_found() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    h.get(&h.admin, "/proposals/99/edit")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    h.get(&h.outsider, &format!("/proposals/{}/edit", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_redirects_without_lookup() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h.get(&h.admin, "/proposals/99").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/proposals/99/edit");

    // the edit form is where the account and permissions are checked
    let response = h.get(&h.outsider, &format!("/proposals/{}", id)).await;
    assert_eq!(location(&response), format!("/proposals/{}/edit", id));
    h.get(&h.outsider, &location(&response))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_requires_view_permission() {
    let h = Harness::new().await;
    let author = h.admin.colleague("create_all");
    let id = h.create_proposal(&author, 1).await;
    let path = format!("/proposals/{}/edit", id);

    h.get(&author, &path).await.assert_status_ok();
    h.get(&h.admin.colleague(""), &path)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    h.get(&h.admin.colleague("view_all"), &path)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let h = Harness::new().await;

    h.get(&h.admin, "/proposals/abc/edit")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ==============================================================
// Update
// ==============================================================

#[tokio::test]
async fn test_update_redirects_with_notice() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h
        .put(&h.admin, &format!("/proposals/{}", id))
        .json(&json!({ "invoice_id": 2, "private_notes": "revised" }))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/proposals/{}", id));
    assert_eq!(flash(&response).as_deref(), Some("updated_proposal"));

    let proposal = h.find(&h.admin, id).await;
    assert_eq!(proposal.invoice_id, Some(2));
    assert_eq!(proposal.private_notes, "revised");
}

#[tokio::test]
async fn test_update_via_form_post_keeps_omitted_fields() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h
        .post(&h.admin, &format!("/proposals/{}", id))
        .form(&[("_method", "PUT"), ("private_notes", "from the form")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let proposal = h.find(&h.admin, id).await;
    assert_eq!(proposal.invoice_id, Some(1));
    assert_eq!(proposal.private_notes, "from the form");
}

#[tokio::test]
async fn test_update_with_unknown_action_is_a_plain_update() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h
        .put(&h.admin, &format!("/proposals/{}", id))
        .json(&json!({ "action": "email" }))
        .await;

    assert_eq!(location(&response), format!("/proposals/{}", id));
    assert_eq!(flash(&response).as_deref(), Some("updated_proposal"));
    assert_eq!(h.find(&h.admin, id).await.state(), EntityState::Active);
}

#[tokio::test]
async fn test_update_requires_edit_permission() {
    let h = Harness::new().await;
    let author = h.admin.colleague("create_all");
    let id = h.create_proposal(&author, 1).await;
    let path = format!("/proposals/{}", id);

    h.put(&h.admin.colleague("view_all"), &path)
        .json(&json!({ "private_notes": "nope" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    h.put(&h.admin.colleague("edit_all"), &path)
        .json(&json!({ "private_notes": "fine" }))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    h.put(&h.outsider, &path)
        .json(&json!({ "private_notes": "foreign" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validates_payload() {
    let h = Harness::new().await;
    let id = h.create_proposal(&h.admin, 1).await;

    let response = h
        .put(&h.admin, &format!("/proposals/{}", id))
        .json(&json!({ "invoice_id": "not-a-number" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = h
        .put(&h.admin, &format!("/proposals/{}", id))
        .json(&json!({ "private_notes": "x".repeat(65_536) }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
