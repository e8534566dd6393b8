// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Applies parsed webhook events to the user store.

use std::fmt;
use std::sync::Arc;

use usersync_server_db::{DbError, User, UserStore, UserUpdate};

use crate::events::{ClerkEvent, DeletedPayload, UserPayload};

/// What an event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
	Created,
	Updated,
	Deleted,
	/// `user.deleted` for an id that is not stored.
	DeleteSkipped,
	/// Event type this service does not act on.
	Ignored,
}

impl SyncOutcome {
	/// Plain-text body returned to the sender.
	pub fn message(&self) -> &'static str {
		match self {
			SyncOutcome::DeleteSkipped => "User not found, skipping delete",
			SyncOutcome::Created
			| SyncOutcome::Updated
			| SyncOutcome::Deleted
			| SyncOutcome::Ignored => "Webhook received successfully",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
	Create,
	Update,
	Delete,
}

impl fmt::Display for StoreOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StoreOperation::Create => write!(f, "create"),
			StoreOperation::Update => write!(f, "update"),
			StoreOperation::Delete => write!(f, "delete"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
	#[error("no primary email found for user {user_id}")]
	NoPrimaryEmail { user_id: String },

	#[error("user {id} not found")]
	UserNotFound { id: String },

	#[error("failed to {operation} user: {source}")]
	Store {
		operation: StoreOperation,
		#[source]
		source: DbError,
	},
}

impl SyncError {
	fn store(operation: StoreOperation) -> impl FnOnce(DbError) -> SyncError {
		move |source| SyncError::Store { operation, source }
	}
}

/// Dispatches [`ClerkEvent`]s to a [`UserStore`].
#[derive(Clone)]
pub struct UserSyncService {
	store: Arc<dyn UserStore>,
}

impl UserSyncService {
	pub fn new(store: Arc<dyn UserStore>) -> Self {
		Self { store }
	}

	pub async fn apply(&self, event: ClerkEvent) -> Result<SyncOutcome, SyncError> {
		match event {
			ClerkEvent::UserCreated(user) => self.create(user).await,
			ClerkEvent::UserUpdated(user) => self.update(user).await,
			ClerkEvent::UserDeleted(deleted) => self.delete(deleted).await,
			ClerkEvent::Unhandled { event_type } => {
				tracing::debug!(event_type = %event_type, "ignoring unhandled event type");
				Ok(SyncOutcome::Ignored)
			}
		}
	}

	async fn create(&self, payload: UserPayload) -> Result<SyncOutcome, SyncError> {
		let email = resolve_primary_email(&payload)?;
		let user = User {
			id: payload.id,
			email,
			first_name: payload.first_name,
			last_name: payload.last_name,
		};

		self
			.store
			.create_user(&user)
			.await
			.map_err(SyncError::store(StoreOperation::Create))?;

		tracing::info!(user_id = %user.id, email = %user.email, "user created");
		Ok(SyncOutcome::Created)
	}

	async fn update(&self, payload: UserPayload) -> Result<SyncOutcome, SyncError> {
		let email = resolve_primary_email(&payload)?;

		let existing = self
			.store
			.get_user(&payload.id)
			.await
			.map_err(SyncError::store(StoreOperation::Update))?;
		if existing.is_none() {
			tracing::warn!(user_id = %payload.id, "user not found, cannot update");
			return Err(SyncError::UserNotFound { id: payload.id });
		}

		let update = UserUpdate {
			email,
			first_name: payload.first_name,
			last_name: payload.last_name,
		};

		match self.store.update_user(&payload.id, &update).await {
			Ok(user) => {
				tracing::info!(user_id = %user.id, email = %user.email, "user updated");
				Ok(SyncOutcome::Updated)
			}
			// Deleted between the lookup and the write.
			Err(DbError::NotFound(_)) => {
				tracing::warn!(user_id = %payload.id, "user not found, cannot update");
				Err(SyncError::UserNotFound { id: payload.id })
			}
			Err(source) => Err(SyncError::Store {
				operation: StoreOperation::Update,
				source,
			}),
		}
	}

	async fn delete(&self, payload: DeletedPayload) -> Result<SyncOutcome, SyncError> {
		let existing = self
			.store
			.get_user(&payload.id)
			.await
			.map_err(SyncError::store(StoreOperation::Delete))?;
		if existing.is_none() {
			tracing::warn!(user_id = %payload.id, "user not found, skipping delete");
			return Ok(SyncOutcome::DeleteSkipped);
		}

		match self.store.delete_user(&payload.id).await {
			Ok(()) => {
				tracing::info!(user_id = %payload.id, "user deleted");
				Ok(SyncOutcome::Deleted)
			}
			Err(DbError::NotFound(_)) => {
				tracing::warn!(user_id = %payload.id, "user not found, skipping delete");
				Ok(SyncOutcome::DeleteSkipped)
			}
			Err(source) => Err(SyncError::Store {
				operation: StoreOperation::Delete,
				source,
			}),
		}
	}
}

fn resolve_primary_email(payload: &UserPayload) -> Result<String, SyncError> {
	match payload.primary_email() {
		Some(email) => {
			tracing::debug!(user_id = %payload.id, email = %email, "resolved primary email");
			Ok(email.to_string())
		}
		None => {
			tracing::warn!(
				user_id = %payload.id,
				primary_email_address_id = ?payload.primary_email_address_id,
				"no primary email found"
			);
			Err(SyncError::NoPrimaryEmail {
				user_id: payload.id.clone(),
			})
		}
	}
}
