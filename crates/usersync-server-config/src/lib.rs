// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the usersync server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`USERSYNC_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use usersync_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub webhook: WebhookConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`USERSYNC_SERVER_*`)
/// 2. Config file (`/etc/usersync/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(EnvSource)];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
///
/// Fails when the webhook signing secret is absent: the server must not
/// start without a way to authenticate deliveries.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let webhook = layer.webhook.unwrap_or_default().finalize()?;

	validate_config(&database)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		webhook_tolerance_secs = webhook.tolerance_secs,
		log_json = logging.json,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		webhook,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(database: &DatabaseConfig) -> Result<(), ConfigError> {
	if !database.url.starts_with("sqlite:") {
		return Err(ConfigError::Validation(format!(
			"database url must be a sqlite: URL, got '{}'",
			database.url
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use usersync_common_config::SecretString;

	fn layer_with_secret() -> ServerConfigLayer {
		ServerConfigLayer {
			webhook: Some(WebhookConfigLayer {
				secret: Some(SecretString::new("whsec_dGVzdA==".to_string())),
				tolerance_secs: None,
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_finalize_applies_defaults() {
		let config = finalize(layer_with_secret()).unwrap();
		assert_eq!(config.socket_addr(), "0.0.0.0:8080");
		assert_eq!(config.database.url, "sqlite:./usersync.db");
		assert_eq!(config.logging.level, "info");
		assert_eq!(config.webhook.tolerance_secs, DEFAULT_WEBHOOK_TOLERANCE_SECS);
	}

	#[test]
	fn test_finalize_without_secret_fails() {
		let err = finalize(ServerConfigLayer::default()).unwrap_err();
		assert!(matches!(err, ConfigError::MissingRequired(_)));
	}

	#[test]
	fn test_non_sqlite_url_rejected() {
		let mut layer = layer_with_secret();
		layer.database = Some(DatabaseConfigLayer {
			url: Some("postgres://localhost/users".to_string()),
		});
		let err = finalize(layer).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_load_with_file_reads_toml() {
		use std::io::Write;

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[webhook]\nsecret = \"whsec_ZmlsZQ==\"\ntolerance_secs = 42\n\n[http]\nport = 7000"
		)
		.unwrap();

		let config = load_config_with_file(file.path()).unwrap();
		assert_eq!(config.webhook.tolerance_secs, 42);
		assert_eq!(config.http.port, 7000);
	}
}
