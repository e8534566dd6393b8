// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Inbound user lifecycle webhooks from the identity provider.
//!
//! Order matters: headers, then signature over the raw body, then parsing.
//! Nothing in the body is trusted until the signature checks out.

use axum::{
	body::Bytes,
	extract::State,
	http::{HeaderMap, StatusCode},
};
use usersync_common_webhook::{
	WebhookHeaders, SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER,
	WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};

use crate::{api::AppState, error::WebhookApiError, events::ClerkEvent};

fn header_value<'a>(headers: &'a HeaderMap, name: &str, fallback: &str) -> Option<&'a str> {
	headers
		.get(name)
		.or_else(|| headers.get(fallback))
		.and_then(|value| value.to_str().ok())
		.filter(|value| !value.is_empty())
}

/// Pull the three signature headers, preferring the `svix-*` names.
pub fn extract_webhook_headers(headers: &HeaderMap) -> Option<WebhookHeaders<'_>> {
	Some(WebhookHeaders {
		id: header_value(headers, SVIX_ID_HEADER, WEBHOOK_ID_HEADER)?,
		timestamp: header_value(headers, SVIX_TIMESTAMP_HEADER, WEBHOOK_TIMESTAMP_HEADER)?,
		signature: header_value(headers, SVIX_SIGNATURE_HEADER, WEBHOOK_SIGNATURE_HEADER)?,
	})
}

#[utoipa::path(
    post,
    path = "/api/webhooks/clerk",
    params(
        ("svix-id" = String, Header, description = "Unique message id"),
        ("svix-timestamp" = String, Header, description = "Send time, seconds since epoch"),
        ("svix-signature" = String, Header, description = "Space-separated v1,<base64> signatures")
    ),
    request_body(content = String, description = "Signed event envelope", content_type = "application/json"),
    responses(
        (status = 200, description = "Event processed, skipped or ignored", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing headers, bad signature, malformed payload or no primary email", body = String, content_type = "text/plain"),
        (status = 404, description = "Update for an unknown user", body = String, content_type = "text/plain"),
        (status = 500, description = "Store operation failed", body = String, content_type = "text/plain")
    ),
    tag = "webhooks"
)]
/// POST /api/webhooks/clerk - Verify and apply a user lifecycle event.
#[tracing::instrument(
	skip(state, headers, body),
	fields(
		svix_id = tracing::field::Empty,
		event_type = tracing::field::Empty,
		user_id = tracing::field::Empty
	)
)]
pub async fn handle_clerk_webhook(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookApiError> {
	let webhook_headers = extract_webhook_headers(&headers).ok_or(WebhookApiError::MissingHeaders)?;

	let span = tracing::Span::current();
	span.record("svix_id", webhook_headers.id);

	state.verifier.verify(&webhook_headers, &body)?;

	let event = ClerkEvent::parse(&body)?;
	span.record("event_type", event.event_type());
	if let Some(user_id) = event.user_id() {
		span.record("user_id", user_id);
	}

	tracing::info!(
		svix_id = %webhook_headers.id,
		event_type = %event.event_type(),
		user_id = event.user_id().unwrap_or_default(),
		"webhook received"
	);

	let outcome = state.sync.apply(event).await?;
	Ok((StatusCode::OK, outcome.message()))
}
