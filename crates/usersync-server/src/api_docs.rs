// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use utoipa::OpenApi;

use crate::routes::health::{HealthResponse, HealthStatus};

#[derive(OpenApi)]
#[openapi(
	info(
		title = "usersync",
		description = "Receives identity-provider webhooks and mirrors users into SQLite"
	),
	paths(
		crate::routes::clerk_webhooks::handle_clerk_webhook,
		crate::routes::health::health_check,
	),
	components(schemas(HealthResponse, HealthStatus)),
	tags(
		(name = "webhooks", description = "Inbound provider webhooks"),
		(name = "health", description = "Liveness")
	)
)]
pub struct ApiDoc;
