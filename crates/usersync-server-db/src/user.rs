// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Rows are keyed by the identity provider's user id. Creates are strict
//! inserts; updates and deletes report a missing row as
//! [`DbError::NotFound`].

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{User, UserUpdate};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User) -> Result<(), DbError>;
	async fn get_user(&self, id: &str) -> Result<Option<User>, DbError>;
	async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, DbError>;
	async fn delete_user(&self, id: &str) -> Result<(), DbError>;
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		self.create_user(user).await
	}

	async fn get_user(&self, id: &str) -> Result<Option<User>, DbError> {
		self.get_user(id).await
	}

	async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, DbError> {
		self.update_user(id, update).await
	}

	async fn delete_user(&self, id: &str) -> Result<(), DbError> {
		self.delete_user(id).await
	}
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new user repository with the given pool.
	///
	/// # Arguments
	/// * `pool` - SQLite connection pool
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user.
	///
	/// # Errors
	/// - `DbError::Conflict` if a user with the same id already exists
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, first_name, last_name)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(&user.id)
		.bind(&user.email)
		.bind(&user.first_name)
		.bind(&user.last_name)
		.execute(&self.pool)
		.await
		.map_err(|e| map_unique_violation(e, &user.id))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	/// Get a user by id.
	///
	/// # Returns
	/// `None` if no user exists with this id.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user(&self, id: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, first_name, last_name
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => Ok(Some(parse_user_row(&row)?)),
			None => Ok(None),
		}
	}

	/// Overwrite a user's email and names.
	///
	/// # Errors
	/// - `DbError::NotFound` if no user exists with this id
	#[tracing::instrument(skip(self, update), fields(user_id = %id))]
	pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users
			SET email = ?, first_name = ?, last_name = ?
			WHERE id = ?
			"#,
		)
		.bind(&update.email)
		.bind(&update.first_name)
		.bind(&update.last_name)
		.bind(id)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {id}")));
		}

		tracing::debug!(user_id = %id, "user updated");
		Ok(update.clone().into_user(id))
	}

	/// Delete a user by id.
	///
	/// # Errors
	/// - `DbError::NotFound` if no user exists with this id
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete_user(&self, id: &str) -> Result<(), DbError> {
		let result = sqlx::query("DELETE FROM users WHERE id = ?")
			.bind(id)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {id}")));
		}

		tracing::debug!(user_id = %id, "user deleted");
		Ok(())
	}
}

fn map_unique_violation(err: sqlx::Error, id: &str) -> DbError {
	match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
			DbError::Conflict(format!("user {id} already exists"))
		}
		_ => DbError::Sqlx(err),
	}
}

fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	Ok(User {
		id: row.try_get("id")?,
		email: row.try_get("email")?,
		first_name: row.try_get("first_name")?,
		last_name: row.try_get("last_name")?,
	})
}
