//! Route table for the proposal controller

use axum::routing::{get, post};
use axum::Router;

use crate::proposals::handlers::{
    bulk, create_form, datatable, edit_form, list, show, store, update, AppState,
};

/// Build the proposal routes
///
/// - GET  /proposals - list page
/// - POST /proposals - create
/// - GET  /proposals/create - create form
/// - GET  /proposals/datatable, /proposals/{id}/datatable - table rows as JSON
/// - POST /proposals/bulk - archive, delete or restore a selection
/// - GET  /proposals/{id} - forwards to the edit form
/// - PUT  /proposals/{id} - update (POST accepted for HTML forms)
/// - GET  /proposals/{id}/edit - edit form
pub fn build_proposal_routes(state: AppState) -> Router {
    Router::new()
        .route("/proposals", get(list).post(store))
        .route("/proposals/create", get(create_form))
        .route("/proposals/datatable", get(datatable))
        .route("/proposals/bulk", post(bulk))
        .route("/proposals/{id}", get(show).put(update).post(update))
        .route("/proposals/{id}/edit", get(edit_form))
        .route("/proposals/{id}/datatable", get(datatable))
        .with_state(state)
}
