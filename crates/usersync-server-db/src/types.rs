// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// A user row. `id` is the identity provider's user id, not generated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
}

/// Replacement values for a user's mutable columns.
///
/// Every field is written; a `None` name clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
}

impl UserUpdate {
	/// Apply this update to `id`, producing the resulting row.
	pub fn into_user(self, id: impl Into<String>) -> User {
		User {
			id: id.into(),
			email: self.email,
			first_name: self.first_name,
			last_name: self.last_name,
		}
	}
}
