// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the webhook endpoint and server startup.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use usersync_common_webhook::WebhookError;
use usersync_server_config::ConfigError;
use usersync_server_db::DbError;

use crate::events::EventParseError;
use crate::sync::{StoreOperation, SyncError};

/// Failures of a single webhook delivery.
///
/// Each variant maps to a fixed status and plain-text body; internal detail
/// is logged, never returned to the sender.
#[derive(Debug, thiserror::Error)]
pub enum WebhookApiError {
	#[error("missing webhook signature headers")]
	MissingHeaders,

	#[error("signature verification failed: {0}")]
	InvalidSignature(#[from] WebhookError),

	#[error("malformed payload: {0}")]
	MalformedPayload(#[from] EventParseError),

	#[error(transparent)]
	Sync(#[from] SyncError),
}

impl WebhookApiError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			WebhookApiError::MissingHeaders
			| WebhookApiError::InvalidSignature(_)
			| WebhookApiError::MalformedPayload(_)
			| WebhookApiError::Sync(SyncError::NoPrimaryEmail { .. }) => StatusCode::BAD_REQUEST,
			WebhookApiError::Sync(SyncError::UserNotFound { .. }) => StatusCode::NOT_FOUND,
			WebhookApiError::Sync(SyncError::Store { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn body(&self) -> &'static str {
		match self {
			WebhookApiError::MissingHeaders => "Error occurred -- no svix headers",
			WebhookApiError::InvalidSignature(_) => "Error occurred -- invalid signature",
			WebhookApiError::MalformedPayload(_) => "Error occurred -- malformed payload",
			WebhookApiError::Sync(SyncError::NoPrimaryEmail { .. }) => "No primary email found",
			WebhookApiError::Sync(SyncError::UserNotFound { .. }) => "User not found, cannot update",
			WebhookApiError::Sync(SyncError::Store { operation, .. }) => match operation {
				StoreOperation::Create => "Error creating user",
				StoreOperation::Update => "Error updating user",
				StoreOperation::Delete => "Error deleting user",
			},
		}
	}
}

impl IntoResponse for WebhookApiError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		if status.is_server_error() {
			tracing::error!(error = %self, "webhook processing failed");
		} else {
			tracing::warn!(error = %self, status = status.as_u16(), "webhook rejected");
		}
		(status, self.body()).into_response()
	}
}

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("database error: {0}")]
	Db(#[from] DbError),

	#[error("invalid webhook secret: {0}")]
	WebhookSecret(#[from] WebhookError),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}
