// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Typed model of the identity provider's webhook events.
//!
//! Parsing happens in two stages. The envelope (`type` plus raw `data`) is
//! read first, then `data` is decoded into the payload shape for that type.
//! Unknown types decode to [`ClerkEvent::Unhandled`] without touching `data`.

use serde::{de::DeserializeOwned, Deserialize};

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

#[derive(Debug, thiserror::Error)]
pub enum EventParseError {
	#[error("invalid event envelope: {0}")]
	Envelope(#[source] serde_json::Error),

	#[error("invalid data for {event_type}: {source}")]
	Data {
		event_type: String,
		#[source]
		source: serde_json::Error,
	},
}

#[derive(Debug, Deserialize)]
struct RawEvent {
	#[serde(rename = "type")]
	event_type: String,
	data: serde_json::Value,
}

/// One entry of a user's `email_addresses` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
	pub id: String,
	pub email_address: String,
}

/// User object carried by `user.created` and `user.updated`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPayload {
	pub id: String,
	#[serde(default)]
	pub email_addresses: Vec<EmailAddress>,
	pub primary_email_address_id: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
}

impl UserPayload {
	/// The address whose id matches `primary_email_address_id`, if any.
	pub fn primary_email(&self) -> Option<&str> {
		let primary_id = self.primary_email_address_id.as_deref()?;
		self
			.email_addresses
			.iter()
			.find(|email| email.id == primary_id)
			.map(|email| email.email_address.as_str())
	}
}

/// Tombstone carried by `user.deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedPayload {
	pub id: String,
	#[serde(default)]
	pub deleted: bool,
}

fn decode_data<T: DeserializeOwned>(
	event_type: &str,
	data: serde_json::Value,
) -> Result<T, EventParseError> {
	serde_json::from_value(data).map_err(|source| EventParseError::Data {
		event_type: event_type.to_string(),
		source,
	})
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClerkEvent {
	UserCreated(UserPayload),
	UserUpdated(UserPayload),
	UserDeleted(DeletedPayload),
	Unhandled { event_type: String },
}

impl ClerkEvent {
	/// Parse a verified request body.
	pub fn parse(body: &[u8]) -> Result<Self, EventParseError> {
		let raw: RawEvent = serde_json::from_slice(body).map_err(EventParseError::Envelope)?;

		let event = match raw.event_type.as_str() {
			USER_CREATED => Self::UserCreated(decode_data(&raw.event_type, raw.data)?),
			USER_UPDATED => Self::UserUpdated(decode_data(&raw.event_type, raw.data)?),
			USER_DELETED => Self::UserDeleted(decode_data(&raw.event_type, raw.data)?),
			_ => Self::Unhandled {
				event_type: raw.event_type.clone(),
			},
		};

		Ok(event)
	}

	pub fn event_type(&self) -> &str {
		match self {
			Self::UserCreated(_) => USER_CREATED,
			Self::UserUpdated(_) => USER_UPDATED,
			Self::UserDeleted(_) => USER_DELETED,
			Self::Unhandled { event_type } => event_type,
		}
	}

	/// Id of the user the event refers to, when it has one.
	pub fn user_id(&self) -> Option<&str> {
		match self {
			Self::UserCreated(user) | Self::UserUpdated(user) => Some(&user.id),
			Self::UserDeleted(deleted) => Some(&deleted.id),
			Self::Unhandled { .. } => None,
		}
	}
}
