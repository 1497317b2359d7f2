// Digital Library - storage core and REST backend
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use digital_library::{api::app_router, config::Config, logging, Storage};

#[derive(Parser)]
#[command(name = "digital-library")]
#[command(about = "Digital library REST backend", long_about = None)]
struct Cli {
    /// Path to the YAML config (falls back to DIGITAL_LIBRARY_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;
    logging::init(&config.environment.env)?;

    tracing::info!(env = %config.environment.env, db = %config.storage.db, "starting");

    let storage = Storage::init(&config.storage).await?;
    tracing::info!("storage ready");

    let addr = config.http_server.listen_addr()?;
    let router = app_router(Arc::new(storage.clone()), &config.http_server);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "can't listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
