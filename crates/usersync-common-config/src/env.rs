// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment helpers for loading secrets.
//!
//! A secret named `FOO` can be supplied either inline as `FOO=value` or as a
//! path in `FOO_FILE=/run/secrets/foo`. The file form is preferred for
//! container deployments because the value never appears in the process
//! environment.

use std::path::PathBuf;

use usersync_common_secret::SecretString;

/// Errors raised while resolving a secret from the environment.
#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {var} and {var}_FILE are set; use only one")]
	Ambiguous { var: String },

	#[error("{var} is not valid unicode")]
	NotUnicode { var: String },

	#[error("failed to read {var}_FILE at {path}: {source}")]
	FileRead {
		var: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Error for a secret that must be present.
#[derive(Debug, thiserror::Error)]
pub enum RequiredSecretError {
	#[error("{0} (or {0}_FILE) must be set")]
	Missing(String),

	#[error(transparent)]
	Env(#[from] SecretEnvError),
}

fn read_var(var: &str) -> Result<Option<String>, SecretEnvError> {
	match std::env::var(var) {
		Ok(value) if value.is_empty() => Ok(None),
		Ok(value) => Ok(Some(value)),
		Err(std::env::VarError::NotPresent) => Ok(None),
		Err(std::env::VarError::NotUnicode(_)) => Err(SecretEnvError::NotUnicode {
			var: var.to_string(),
		}),
	}
}

/// Load an optional secret from `var` or `{var}_FILE`.
///
/// Empty values are treated as unset. File contents have trailing newlines
/// stripped.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");
	let inline = read_var(var)?;
	let file = read_var(&file_var)?;

	match (inline, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			var: var.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					var: var.to_string(),
					path: path.clone(),
					source,
				})?;
			let trimmed = contents.trim_end_matches(['\r', '\n']);
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(trimmed.to_string())))
			}
		}
		(None, None) => Ok(None),
	}
}

/// Load a secret that must be present.
pub fn require_secret_env(var: &str) -> Result<SecretString, RequiredSecretError> {
	load_secret_env(var)?.ok_or_else(|| RequiredSecretError::Missing(var.to_string()))
}
