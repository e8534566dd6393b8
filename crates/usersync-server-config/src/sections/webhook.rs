// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inbound webhook configuration.

use serde::Deserialize;
use usersync_common_config::SecretString;

use crate::error::ConfigError;

pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Webhook configuration (runtime, fully resolved).
///
/// The signing secret is mandatory: the server refuses to start without it.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
	pub secret: SecretString,
	pub tolerance_secs: u64,
}

/// Webhook configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfigLayer {
	#[serde(default)]
	pub secret: Option<SecretString>,
	#[serde(default)]
	pub tolerance_secs: Option<u64>,
}

impl WebhookConfigLayer {
	pub fn merge(&mut self, other: WebhookConfigLayer) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
		if other.tolerance_secs.is_some() {
			self.tolerance_secs = other.tolerance_secs;
		}
	}

	pub fn finalize(self) -> Result<WebhookConfig, ConfigError> {
		let secret = self
			.secret
			.filter(|s| !s.expose().trim().is_empty())
			.ok_or_else(|| {
				ConfigError::MissingRequired(
					"webhook signing secret (USERSYNC_SERVER_WEBHOOK_SECRET or \
					 USERSYNC_SERVER_WEBHOOK_SECRET_FILE)"
						.to_string(),
				)
			})?;

		let tolerance_secs = self
			.tolerance_secs
			.unwrap_or(DEFAULT_WEBHOOK_TOLERANCE_SECS);
		if tolerance_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "webhook.tolerance_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(WebhookConfig {
			secret,
			tolerance_secs,
		})
	}
}
