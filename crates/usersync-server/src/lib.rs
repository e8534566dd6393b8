// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! usersync server.
//!
//! Receives signed user lifecycle webhooks from the identity provider and
//! mirrors the users into a SQLite `users` table.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod events;
pub mod routes;
pub mod sync;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::{ServerError, WebhookApiError};
pub use events::{ClerkEvent, DeletedPayload, EmailAddress, EventParseError, UserPayload};
pub use sync::{StoreOperation, SyncError, SyncOutcome, UserSyncService};
pub use usersync_server_config::ServerConfig;
