// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use sqlx::sqlite::SqlitePool;
use usersync_common_webhook::{HmacWebhookVerifier, WebhookVerifier};
use usersync_server_config::ServerConfig;
use usersync_server_db::{UserRepository, UserStore};

use crate::{error::ServerError, routes, sync::UserSyncService};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub verifier: Arc<dyn WebhookVerifier>,
	pub sync: Arc<UserSyncService>,
}

impl AppState {
	pub fn new(
		pool: SqlitePool,
		verifier: Arc<dyn WebhookVerifier>,
		store: Arc<dyn UserStore>,
	) -> Self {
		Self {
			pool,
			verifier,
			sync: Arc::new(UserSyncService::new(store)),
		}
	}
}

/// Build the production state: SQLite-backed store and an HMAC verifier
/// keyed from configuration.
///
/// # Errors
/// Returns `ServerError::WebhookSecret` if the configured secret does not
/// decode to a usable key.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ServerError> {
	let verifier = HmacWebhookVerifier::new(config.webhook.secret.expose())?
		.with_tolerance_secs(config.webhook.tolerance_secs);
	let store = Arc::new(UserRepository::new(pool.clone()));

	tracing::debug!(
		tolerance_secs = verifier.tolerance_secs(),
		"webhook verifier configured"
	);

	Ok(AppState::new(pool, Arc::new(verifier), store))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.route(
			"/api/webhooks/clerk",
			post(routes::clerk_webhooks::handle_clerk_webhook),
		)
		.with_state(state)
}
