//! Request resolvers for the proposal routes
//!
//! Each resolver authenticates the requester, resolves the addressed
//! proposal inside the requester's account and checks permissions before
//! the handler body runs. Handlers therefore only see authorized input.

use axum::extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request};
use axum::http::request::Parts;
use axum::RequestPartsExt;

use crate::core::auth::RequestContext;
use crate::core::error::{ProposalError, Result};
use crate::core::input::RequestInput;
use crate::entities::Proposal;
use crate::proposals::handlers::AppState;
use crate::proposals::payload::ProposalPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    View,
    Edit,
}

/// Load a proposal of the requester's account and check `access`
async fn resolve_proposal(
    state: &AppState,
    context: &RequestContext,
    public_id: u32,
    access: Access,
) -> Result<Proposal> {
    let proposal = state
        .store
        .find_proposal(&context.account_id, public_id)
        .await?
        .ok_or_else(|| ProposalError::not_found("proposal", public_id))?;

    let allowed = match access {
        Access::View => context.can_view(&proposal.user_id),
        Access::Edit => context.can_edit(&proposal.user_id),
    };
    if !allowed {
        return Err(ProposalError::Forbidden {
            message: format!("Not allowed to access proposal {}", public_id),
        });
    }
    Ok(proposal)
}

fn forbid_unless_can_create(context: &RequestContext) -> Result<()> {
    if context.can_create() {
        Ok(())
    } else {
        Err(ProposalError::Forbidden {
            message: "Not allowed to create proposals".to_string(),
        })
    }
}

fn query_input(parts: &Parts) -> Result<RequestInput> {
    let Query(pairs): Query<Vec<(String, String)>> =
        Query::try_from_uri(&parts.uri).map_err(|e| ProposalError::BadRequest {
            message: e.body_text(),
        })?;
    let mut input = RequestInput::new();
    input.extend_pairs(pairs);
    Ok(input)
}

/// The `{id}` path parameter, when the route has one
async fn path_id(parts: &mut Parts) -> Result<Option<u32>> {
    let Ok(params) = parts.extract::<RawPathParams>().await else {
        return Ok(None);
    };
    params
        .iter()
        .find(|(name, _)| *name == "id")
        .map(|(_, raw)| {
            raw.parse::<u32>()
                .map_err(|_| ProposalError::BadRequest {
                    message: format!("Invalid proposal id '{}'", raw),
                })
        })
        .transpose()
}

/// Authorized read request
///
/// Without a path id this is the create form and requires the create
/// permission. With one, the proposal must be viewable by the requester.
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    pub context: RequestContext,
    pub input: RequestInput,
    pub entity: Option<Proposal>,
}

impl ProposalRequest {
    /// Public id of a query parameter such as `invoice_id`
    pub fn hint(&self, key: &str) -> Option<u32> {
        self.input.ids(key).first().copied()
    }
}

impl FromRequestParts<AppState> for ProposalRequest {
    type Rejection = ProposalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let context = RequestContext::from_request_parts(parts, state).await?;
        let input = query_input(parts)?;

        let entity = match path_id(parts).await? {
            Some(public_id) => {
                Some(resolve_proposal(state, &context, public_id, Access::View).await?)
            }
            None => {
                forbid_unless_can_create(&context)?;
                None
            }
        };

        Ok(Self {
            context,
            input,
            entity,
        })
    }
}

/// Validated creation request
#[derive(Debug, Clone)]
pub struct CreateProposalRequest {
    pub context: RequestContext,
    pub input: RequestInput,
}

impl FromRequest<AppState> for CreateProposalRequest {
    type Rejection = ProposalError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let (mut parts, body) = req.into_parts();
        let context = RequestContext::from_request_parts(&mut parts, state).await?;
        forbid_unless_can_create(&context)?;

        let input = RequestInput::from_request(Request::from_parts(parts, body), state).await?;
        ProposalPayload::from_map(input.as_map())?.validate_for_create()?;

        Ok(Self { context, input })
    }
}

/// Validated update request for an editable proposal
#[derive(Debug, Clone)]
pub struct UpdateProposalRequest {
    pub context: RequestContext,
    pub input: RequestInput,
    pub entity: Proposal,
}

impl FromRequest<AppState> for UpdateProposalRequest {
    type Rejection = ProposalError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let (mut parts, body) = req.into_parts();
        let context = RequestContext::from_request_parts(&mut parts, state).await?;
        let public_id = path_id(&mut parts)
            .await?
            .ok_or_else(|| ProposalError::BadRequest {
                message: "Missing proposal id".to_string(),
            })?;
        let entity = resolve_proposal(state, &context, public_id, Access::Edit).await?;

        let input = RequestInput::from_request(Request::from_parts(parts, body), state).await?;
        ProposalPayload::from_map(input.as_map())?.validate_for_update()?;

        Ok(Self {
            context,
            input,
            entity,
        })
    }
}
