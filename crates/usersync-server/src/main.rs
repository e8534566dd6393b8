// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! usersync server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usersync_server::{create_app_state, create_router, version};
use usersync_server_config::LoggingConfig;

/// usersync server - mirrors identity-provider users into SQLite.
#[derive(Parser, Debug)]
#[command(
	name = "usersync-server",
	about = "Identity-provider webhook user sync server",
	version
)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/usersync/server.toml)
	#[arg(long, env = "USERSYNC_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for usersync-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());

	let registry = tracing_subscriber::registry().with(filter);
	if logging.json {
		registry.with(tracing_subscriber::fmt::layer().json()).init();
	} else {
		registry.with(tracing_subscriber::fmt::layer()).init();
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => usersync_server_config::load_config_with_file(path)?,
		None => usersync_server_config::load_config()?,
	};

	init_tracing(&config.logging);

	tracing::info!(
			host = %config.http.host,
			port = config.http.port,
			database = %config.database.url,
			"starting usersync-server"
	);

	let pool = usersync_server_db::create_pool(&config.database.url).await?;
	usersync_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool.clone(), &config)?;

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	pool.close().await;
	tracing::info!("Server shutdown complete");
	Ok(())
}
