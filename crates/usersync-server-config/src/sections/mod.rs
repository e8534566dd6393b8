// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each section has a resolved form and a partial
//! `*Layer` form used while merging sources.

mod database;
mod http;
mod logging;
mod webhook;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use webhook::{WebhookConfig, WebhookConfigLayer, DEFAULT_WEBHOOK_TOLERANCE_SECS};
