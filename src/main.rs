// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mimalloc::MiMalloc;
use modules::{
    error::ForwarderResult,
    logger,
    rest::{public::status::STARTED_AT, start_http_server},
    settings::cli::SETTINGS,
};
use std::sync::LazyLock;
use tracing::{error, info};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ForwarderResult<()> {
    logger::initialize_logging();
    LazyLock::force(&STARTED_AT);
    info!("Starting graph-forwarder");
    info!("Version:  {}", forwarder_version!());
    info!("Graph:    {}", SETTINGS.forwarder_graph_base_url);
    info!(
        "Mailbox:  {}",
        SETTINGS.forwarder_graph_mailbox.as_deref().unwrap_or("me")
    );

    if let Err(e) = start_http_server().await {
        error!("Failed to start REST server: {}", e);
        return Err(e);
    }
    info!("graph-forwarder stopped");
    Ok(())
}
