// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Svix-style webhook signatures.
//!
//! Each delivery carries three headers: a message id, a unix timestamp in
//! seconds, and one or more `v1,<base64>` signatures. A signature is the
//! HMAC-SHA256 of `"{id}.{timestamp}.{body}"` keyed with the base64-decoded
//! signing secret (`whsec_...`). Binding the id and timestamp into the MAC
//! lets the receiver reject replays outside the tolerance window.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};
use usersync_common_secret::Secret;

type HmacSha256 = Hmac<Sha256>;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

/// Unbranded header names used by the Standard Webhooks convention.
pub const WEBHOOK_ID_HEADER: &str = "webhook-id";
pub const WEBHOOK_TIMESTAMP_HEADER: &str = "webhook-timestamp";
pub const WEBHOOK_SIGNATURE_HEADER: &str = "webhook-signature";

/// Accepted clock skew between sender and receiver, in seconds.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
	#[error("invalid webhook secret: {0}")]
	InvalidSecret(String),

	#[error("invalid webhook timestamp")]
	InvalidTimestamp,

	#[error("webhook timestamp too old")]
	TimestampTooOld,

	#[error("webhook timestamp too new")]
	TimestampTooNew,

	#[error("no matching webhook signature")]
	InvalidSignature,
}

/// The three header values that accompany a signed delivery.
#[derive(Debug, Clone, Copy)]
pub struct WebhookHeaders<'a> {
	pub id: &'a str,
	pub timestamp: &'a str,
	pub signature: &'a str,
}

/// Authenticates an inbound webhook delivery.
pub trait WebhookVerifier: Send + Sync {
	/// Verify `payload` (the raw request body) against the delivery headers.
	fn verify(&self, headers: &WebhookHeaders<'_>, payload: &[u8]) -> Result<(), WebhookError>;
}

/// HMAC-SHA256 verifier bound to one signing secret.
#[derive(Debug, Clone)]
pub struct HmacWebhookVerifier {
	key: Secret<Vec<u8>>,
	tolerance_secs: i64,
}

impl HmacWebhookVerifier {
	/// Build a verifier from a signing secret.
	///
	/// The `whsec_` prefix is optional; the remainder must be standard base64.
	pub fn new(secret: &str) -> Result<Self, WebhookError> {
		let encoded = secret.trim();
		let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);

		let key = STANDARD
			.decode(encoded)
			.map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
		if key.is_empty() {
			return Err(WebhookError::InvalidSecret(
				"secret decodes to an empty key".to_string(),
			));
		}

		Ok(Self {
			key: Secret::new(key),
			tolerance_secs: DEFAULT_TOLERANCE_SECS as i64,
		})
	}

	/// Override the accepted timestamp skew.
	pub fn with_tolerance_secs(mut self, secs: u64) -> Self {
		self.tolerance_secs = i64::try_from(secs).unwrap_or(i64::MAX);
		self
	}

	pub fn tolerance_secs(&self) -> i64 {
		self.tolerance_secs
	}

	fn mac(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
		let mut mac =
			HmacSha256::new_from_slice(self.key.expose()).expect("HMAC can take key of any size");
		mac.update(msg_id.as_bytes());
		mac.update(b".");
		mac.update(timestamp.to_string().as_bytes());
		mac.update(b".");
		mac.update(payload);
		mac
	}

	/// Produce a `v1,<base64>` signature for a delivery.
	pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
		let digest = self.mac(msg_id, timestamp, payload).finalize().into_bytes();
		format!("{SIGNATURE_VERSION},{}", STANDARD.encode(digest))
	}

	/// Verify a delivery against an explicit clock.
	pub fn verify_at(
		&self,
		headers: &WebhookHeaders<'_>,
		payload: &[u8],
		now: i64,
	) -> Result<(), WebhookError> {
		let timestamp: i64 = headers
			.timestamp
			.trim()
			.parse()
			.map_err(|_| WebhookError::InvalidTimestamp)?;

		if now.saturating_sub(timestamp) > self.tolerance_secs {
			warn!(msg_id = %headers.id, timestamp, now, "Webhook timestamp outside tolerance (too old)");
			return Err(WebhookError::TimestampTooOld);
		}
		if timestamp > now.saturating_add(self.tolerance_secs) {
			warn!(msg_id = %headers.id, timestamp, now, "Webhook timestamp outside tolerance (too new)");
			return Err(WebhookError::TimestampTooNew);
		}

		let mac = self.mac(headers.id, timestamp, payload);

		for entry in headers.signature.split_whitespace() {
			let Some((version, encoded)) = entry.split_once(',') else {
				continue;
			};
			if version != SIGNATURE_VERSION {
				continue;
			}
			let Ok(expected) = STANDARD.decode(encoded) else {
				continue;
			};
			if mac.clone().verify_slice(&expected).is_ok() {
				debug!(msg_id = %headers.id, "Webhook signature verified successfully");
				return Ok(());
			}
		}

		warn!(msg_id = %headers.id, "Webhook signature verification failed");
		Err(WebhookError::InvalidSignature)
	}
}

impl WebhookVerifier for HmacWebhookVerifier {
	fn verify(&self, headers: &WebhookHeaders<'_>, payload: &[u8]) -> Result<(), WebhookError> {
		self.verify_at(headers, payload, chrono::Utc::now().timestamp())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TEST_SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
	const TEST_MSG_ID: &str = "msg_p5jXN8AQM9LWM0D4loKWxJek";
	const TEST_TIMESTAMP: i64 = 1614265330;
	const TEST_BODY: &[u8] = br#"{"test": 2432232314}"#;

	fn verifier() -> HmacWebhookVerifier {
		HmacWebhookVerifier::new(TEST_SECRET).unwrap()
	}

	fn headers<'a>(timestamp: &'a str, signature: &'a str) -> WebhookHeaders<'a> {
		WebhookHeaders {
			id: TEST_MSG_ID,
			timestamp,
			signature,
		}
	}

	#[test]
	fn test_sign_matches_known_vector() {
		let signature = verifier().sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		assert_eq!(signature, "v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=");
	}

	#[test]
	fn test_verify_valid_signature() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		assert!(v
			.verify_at(&headers(&ts, &signature), TEST_BODY, TEST_TIMESTAMP)
			.is_ok());
	}

	#[test]
	fn test_secret_without_prefix() {
		let bare = TEST_SECRET.strip_prefix("whsec_").unwrap();
		let a = HmacWebhookVerifier::new(bare).unwrap();
		let b = verifier();
		assert_eq!(
			a.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY),
			b.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY)
		);
	}

	#[test]
	fn test_invalid_secret() {
		assert!(matches!(
			HmacWebhookVerifier::new("whsec_not base64!!"),
			Err(WebhookError::InvalidSecret(_))
		));
		assert!(matches!(
			HmacWebhookVerifier::new("whsec_"),
			Err(WebhookError::InvalidSecret(_))
		));
	}

	#[test]
	fn test_tampered_body_fails() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		let result = v.verify_at(
			&headers(&ts, &signature),
			br#"{"test": 1}"#,
			TEST_TIMESTAMP,
		);
		assert_eq!(result, Err(WebhookError::InvalidSignature));
	}

	#[test]
	fn test_wrong_msg_id_fails() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		let replayed = WebhookHeaders {
			id: "msg_other",
			timestamp: &ts,
			signature: &signature,
		};
		assert_eq!(
			v.verify_at(&replayed, TEST_BODY, TEST_TIMESTAMP),
			Err(WebhookError::InvalidSignature)
		);
	}

	#[test]
	fn test_multiple_signatures_any_match() {
		let v = verifier();
		let good = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let header = format!("v1,AAAA v2,ignored {good}");
		let ts = TEST_TIMESTAMP.to_string();
		assert!(v
			.verify_at(&headers(&ts, &header), TEST_BODY, TEST_TIMESTAMP)
			.is_ok());
	}

	#[test]
	fn test_unknown_version_rejected() {
		let v = verifier();
		let good = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let downgraded = good.replacen("v1,", "v0,", 1);
		let ts = TEST_TIMESTAMP.to_string();
		assert_eq!(
			v.verify_at(&headers(&ts, &downgraded), TEST_BODY, TEST_TIMESTAMP),
			Err(WebhookError::InvalidSignature)
		);
	}

	#[test]
	fn test_garbage_signature_header() {
		let v = verifier();
		let ts = TEST_TIMESTAMP.to_string();
		assert_eq!(
			v.verify_at(&headers(&ts, "nonsense"), TEST_BODY, TEST_TIMESTAMP),
			Err(WebhookError::InvalidSignature)
		);
	}

	#[test]
	fn test_invalid_timestamp() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		assert_eq!(
			v.verify_at(&headers("yesterday", &signature), TEST_BODY, TEST_TIMESTAMP),
			Err(WebhookError::InvalidTimestamp)
		);
	}

	#[test]
	fn test_timestamp_too_old() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		let now = TEST_TIMESTAMP + DEFAULT_TOLERANCE_SECS as i64 + 1;
		assert_eq!(
			v.verify_at(&headers(&ts, &signature), TEST_BODY, now),
			Err(WebhookError::TimestampTooOld)
		);
	}

	#[test]
	fn test_timestamp_too_new() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		let now = TEST_TIMESTAMP - DEFAULT_TOLERANCE_SECS as i64 - 1;
		assert_eq!(
			v.verify_at(&headers(&ts, &signature), TEST_BODY, now),
			Err(WebhookError::TimestampTooNew)
		);
	}

	#[test]
	fn test_timestamp_at_tolerance_edge_accepted() {
		let v = verifier();
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		let now = TEST_TIMESTAMP + DEFAULT_TOLERANCE_SECS as i64;
		assert!(v
			.verify_at(&headers(&ts, &signature), TEST_BODY, now)
			.is_ok());
	}

	#[test]
	fn test_custom_tolerance() {
		let v = verifier().with_tolerance_secs(10);
		assert_eq!(v.tolerance_secs(), 10);
		let signature = v.sign(TEST_MSG_ID, TEST_TIMESTAMP, TEST_BODY);
		let ts = TEST_TIMESTAMP.to_string();
		assert_eq!(
			v.verify_at(&headers(&ts, &signature), TEST_BODY, TEST_TIMESTAMP + 11),
			Err(WebhookError::TimestampTooOld)
		);
	}

	#[test]
	fn test_debug_redacts_key() {
		let rendered = format!("{:?}", verifier());
		assert!(rendered.contains("[REDACTED]"));
		assert!(!rendered.contains("MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw"));
	}
}
