//! HTTP handlers for the proposal pages
//!
//! Handlers stay thin: requests arrive authorized and validated through the
//! resolvers in [`requests`](super::requests), the service does the work,
//! and the outcome is either a rendered page or a [`Redirect`] carrying a
//! notice.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::config::DatatableConfig;
use crate::core::auth::RequestContext;
use crate::core::entity::Entity;
use crate::core::error::{ProposalError, Result};
use crate::core::flash::{FlashCookie, Notice, Redirect};
use crate::core::i18n::Translator;
use crate::core::input::RequestInput;
use crate::core::query::{TableQuery, TableResult};
use crate::core::state::BulkAction;
use crate::core::store::EntityStore;
use crate::proposals::requests::{CreateProposalRequest, ProposalRequest, UpdateProposalRequest};
use crate::proposals::service::ProposalService;
use crate::proposals::views::{ListView, ProposalFormView};
use crate::server::views::{Page, Views, LIST_TEMPLATE, PROPOSAL_FORM_TEMPLATE};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ProposalService,
    pub store: Arc<dyn EntityStore>,
    pub translator: Arc<Translator>,
    pub views: Arc<Views>,
    pub flash: FlashCookie,
    pub datatable: DatatableConfig,
}

impl AppState {
    fn page<T: serde::Serialize>(&self, template: &str, model: &T, headers: &HeaderMap) -> Result<Page> {
        let notice = self.flash.read(headers);
        let body = self
            .views
            .render(template, model, &self.translator, notice.as_ref())?;
        Ok(Page {
            body,
            clear_flash: notice.map(|_| self.flash.clone()),
        })
    }

    fn redirect(&self, redirect: Redirect) -> Response {
        redirect.into_flash_response(&self.flash).into_response()
    }
}

/// Flash notice reporting a bulk outcome; nothing when no proposal changed
pub fn bulk_notice(action: BulkAction, count: usize) -> Option<Notice> {
    match count {
        0 => None,
        1 => Some(Notice::with_count(
            format!("{}_proposal", action.past_tense()),
            count,
        )),
        _ => Some(Notice::with_count(
            format!("{}_proposals", action.past_tense()),
            count,
        )),
    }
}

fn list_url() -> String {
    format!("/{}", crate::entities::Proposal::resource_name())
}

/// Run `action` over the ids of `input` and build the resulting redirect
///
/// `fallback_id` applies when the input names no ids. `pending` is kept
/// when nothing changed.
async fn run_bulk(
    state: &AppState,
    context: &RequestContext,
    input: &RequestInput,
    action: BulkAction,
    fallback_id: Option<u32>,
    pending: Option<Notice>,
) -> Result<Redirect> {
    let mut ids = input.bulk_ids();
    if ids.is_empty() {
        ids.extend(fallback_id);
    }

    let count = state.service.bulk(context, &ids, action).await?;
    let notice = bulk_notice(action, count).or(pending);
    Ok(Redirect::to(list_url()).with_notice(notice))
}

/// GET /proposals
pub async fn list(
    State(state): State<AppState>,
    _context: RequestContext,
    headers: HeaderMap,
) -> Result<Page> {
    state.page(LIST_TEMPLATE, &ListView::build(&state.translator), &headers)
}

/// GET /proposals/datatable and /proposals/{id}/datatable
pub async fn datatable(
    State(state): State<AppState>,
    context: RequestContext,
    input: RequestInput,
) -> Result<Json<TableResult>> {
    let query = TableQuery::from_input(
        &input,
        state.datatable.page_size,
        state.datatable.max_page_size,
    );
    let result = state.service.fetch_table_data(&context, &query).await?;
    Ok(Json(result))
}

/// GET /proposals/create
pub async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: ProposalRequest,
) -> Result<Page> {
    let view = ProposalFormView::create(
        state.service.repository(),
        &state.translator,
        &request.context,
        request.hint("invoice_id"),
        request.hint("proposal_template_id"),
    )
    .await?;
    state.page(PROPOSAL_FORM_TEMPLATE, &view, &headers)
}

/// GET /proposals/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: ProposalRequest,
) -> Result<Page> {
    let proposal = request.entity.ok_or_else(|| ProposalError::BadRequest {
        message: "Missing proposal id".to_string(),
    })?;
    let view = ProposalFormView::edit(
        state.service.repository(),
        &state.translator,
        &request.context,
        proposal,
    )
    .await?;
    state.page(PROPOSAL_FORM_TEMPLATE, &view, &headers)
}

/// GET /proposals/{id}
///
/// There is no read-only page; forward to the edit form and keep any
/// pending notice alive for one more hop. The edit form resolves the
/// proposal, so nothing is loaded here.
pub async fn show(
    State(state): State<AppState>,
    _context: RequestContext,
    Path(public_id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    let redirect = Redirect::to(format!("{}/{}/edit", list_url(), public_id))
        .with_notice(state.flash.read(&headers));
    state.redirect(redirect)
}

/// POST /proposals
pub async fn store(
    State(state): State<AppState>,
    request: CreateProposalRequest,
) -> Result<Response> {
    let proposal = state
        .service
        .save(&request.context, request.input.as_map(), None)
        .await?;

    let redirect = Redirect::to(proposal.route())
        .with_notice(Some(Notice::new("created_proposal")));
    Ok(state.redirect(redirect))
}

/// PUT /proposals/{id}
///
/// A submission may also carry an `action`; the fields are saved first and
/// the action then runs as a bulk action over the submitted ids.
pub async fn update(
    State(state): State<AppState>,
    request: UpdateProposalRequest,
) -> Result<Response> {
    let UpdateProposalRequest {
        context,
        input,
        entity,
    } = request;

    let proposal = state
        .service
        .save(&context, input.as_map(), Some(entity))
        .await?;
    let updated = Notice::new("updated_proposal");

    let action = input
        .get_str("action")
        .and_then(|raw| raw.parse::<BulkAction>().ok());

    let redirect = match action {
        Some(action) => {
            run_bulk(
                &state,
                &context,
                &input,
                action,
                Some(proposal.public_id),
                Some(updated),
            )
            .await?
        }
        None => Redirect::to(proposal.route()).with_notice(Some(updated)),
    };
    Ok(state.redirect(redirect))
}

/// POST /proposals/bulk
pub async fn bulk(
    State(state): State<AppState>,
    context: RequestContext,
    input: RequestInput,
) -> Result<Response> {
    let action: BulkAction = input
        .get_str("action")
        .ok_or_else(|| ProposalError::field("action", "The action field is required."))?
        .parse()?;

    let redirect = run_bulk(&state, &context, &input, action, None, None).await?;
    Ok(state.redirect(redirect))
}
