//! HTTP server for the token factory relay API.
//!
//! This module provides the HTTP surface of the relay: a deploy endpoint
//! that submits a token creation transaction and waits (bounded) for its
//! outcome, and a status endpoint that re-resolves a previously returned
//! transaction hash. Handlers only translate between wire formats and the
//! submitter/resolver services; no chain logic lives here.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use relay_config::ApiConfig;
use relay_delivery::{DeliveryError, SubmitterService};
use relay_resolver::ResolverService;
use relay_types::{
	ApiError, DeployTokenRequest, TokenCreationRequest, TokenStatusResponse, TransactionHash,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Builds, signs and broadcasts token creation transactions.
	pub submitter: Arc<SubmitterService>,
	/// Resolves transaction hashes into outcomes.
	pub resolver: Arc<ResolverService>,
}

/// Builds the relay router with the `/api` base path.
pub fn build_router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/tokens", post(handle_deploy))
				.route("/tokens/{tx_hash}", get(handle_status)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state)
}

/// Starts the HTTP server for the relay API.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Relay API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Serves a resolved outcome with its mapped HTTP status.
fn outcome_response(response: TokenStatusResponse) -> Response {
	let status =
		StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	(status, Json(response)).into_response()
}

/// Handles POST /api/tokens requests.
///
/// Validates the request, submits the factory call, then polls for the
/// receipt under the resolver's bounded policy. A still-unmined
/// transaction is a 202 carrying the hash; the client follows up via the
/// status endpoint.
async fn handle_deploy(
	State(state): State<AppState>,
	Json(request): Json<DeployTokenRequest>,
) -> Result<Response, ApiError> {
	let request = TokenCreationRequest::try_from(request)?;

	let tx_hash = match state.submitter.submit(&request).await {
		Ok(hash) => hash,
		Err(DeliveryError::Validation(e)) => return Err(ApiError::from(e)),
		Err(e) => {
			tracing::warn!(error = %e, "Token creation submission failed");
			return Err(ApiError::InternalServerError {
				error_type: "submission_error".to_string(),
				message: e.to_string(),
			});
		},
	};

	let outcome = state.resolver.resolve(&tx_hash).await;
	Ok(outcome_response(TokenStatusResponse::from_outcome(
		&tx_hash, outcome,
	)))
}

/// Handles GET /api/tokens/{tx_hash} requests.
///
/// Single receipt check, no polling. Resolving is side-effect free, so
/// clients may call this as often as they like.
async fn handle_status(
	Path(tx_hash): Path<String>,
	State(state): State<AppState>,
) -> Result<Response, ApiError> {
	let tx_hash = TransactionHash::from_hex(&tx_hash).map_err(ApiError::from)?;

	let outcome = state.resolver.check(&tx_hash).await;
	Ok(outcome_response(TokenStatusResponse::from_outcome(
		&tx_hash, outcome,
	)))
}
