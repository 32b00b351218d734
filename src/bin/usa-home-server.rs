// ABOUTME: Server binary - loads config, runs migrations, and serves the REST API
// ABOUTME: JWT_SECRET is required; everything else has a development default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! # USA Home Server Binary
//!
//! Starts the storefront API: environment configuration, database
//! migration, and the Axum HTTP server.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use usa_home_server::{
    config::environment::ServerConfig, context::ServerResources, database::Database, logging,
    server,
};

#[derive(Parser)]
#[command(name = "usa-home-server")]
#[command(about = "USA Home - storefront REST API for devis, contacts, and catalog")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting USA Home server");
    info!("Database URL: {}", config.database.url);

    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    database.migrate().await?;
    info!("Database schema up to date");

    let resources = Arc::new(ServerResources::new(database, config));
    server::serve(resources).await
}
