// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the usersync server.
//!
//! SQLite via sqlx, with schema migrations embedded from `migrations/`.

pub mod error;
pub mod pool;
pub mod types;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, ping, run_migrations};
pub use types::{User, UserUpdate};
pub use user::{UserRepository, UserStore};
