// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration assembled from each source before resolution.

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer, WebhookConfigLayer};

/// One source's view of the configuration. Unset sections stay `None` so a
/// higher-precedence source only overrides what it actually specifies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub webhook: Option<WebhookConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	let Some(incoming) = other else {
		return;
	};
	match target {
		Some(existing) => merge(existing, incoming),
		None => *target = Some(incoming),
	}
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.webhook, other.webhook, WebhookConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}
