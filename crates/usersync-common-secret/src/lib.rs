// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper that keeps sensitive values out of logs.
//!
//! [`Secret<T>`] prints [`REDACTED`] from `Debug`, `Display` and `Serialize`,
//! and zeroizes the wrapped value when dropped. Call [`Secret::expose`] at the
//! single point where the raw value is actually needed.

use std::fmt;

use zeroize::Zeroize;

/// Placeholder emitted in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be logged or serialized in plaintext.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret<T: Zeroize>(T);

/// The common case: a secret string (API keys, signing secrets, passwords).
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(value: T) -> Self {
		Self(value)
	}

	/// Borrow the underlying value.
	pub fn expose(&self) -> &T {
		&self.0
	}
}

impl<T: Zeroize> From<T> for Secret<T> {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

#[cfg(feature = "serde")]
impl<T: Zeroize> serde::Serialize for Secret<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(REDACTED)
	}
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Secret<T>
where
	T: Zeroize + serde::Deserialize<'de>,
{
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		T::deserialize(deserializer).map(Secret::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_expose_returns_value() {
		let secret = SecretString::new("hunter2".to_string());
		assert_eq!(secret.expose(), "hunter2");
	}

	#[test]
	fn test_debug_and_display_redact() {
		let secret = SecretString::new("whsec_topsecret".to_string());
		assert_eq!(format!("{secret:?}"), REDACTED);
		assert_eq!(format!("{secret}"), REDACTED);
	}

	#[test]
	fn test_redacted_inside_derived_debug() {
		#[derive(Debug)]
		#[allow(dead_code)]
		struct Holder {
			name: &'static str,
			secret: SecretString,
		}

		let holder = Holder {
			name: "webhook",
			secret: SecretString::new("whsec_topsecret".to_string()),
		};
		let rendered = format!("{holder:?}");
		assert!(rendered.contains("webhook"));
		assert!(!rendered.contains("topsecret"));
	}

	#[test]
	fn test_serialize_redacts() {
		let secret = SecretString::new("whsec_topsecret".to_string());
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));
	}

	#[test]
	fn test_deserialize_reads_plain_value() {
		let secret: SecretString = serde_json::from_str("\"whsec_abc\"").unwrap();
		assert_eq!(secret.expose(), "whsec_abc");
	}

	#[test]
	fn test_byte_secret() {
		let secret = Secret::new(vec![1u8, 2, 3]);
		assert_eq!(secret.expose(), &vec![1u8, 2, 3]);
		assert_eq!(format!("{secret:?}"), REDACTED);
	}

	proptest! {
		#[test]
		fn prop_debug_never_leaks(value in "[a-zA-Z0-9]{12,64}") {
			let secret = SecretString::new(value.clone());
			let rendered = format!("{secret:?} {secret}");
			prop_assert!(!rendered.contains(&value));
		}
	}
}
