//! `serve`: run the JSON API until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use super::CommandError;
use crate::api;
use crate::core_state::CoreState;

pub async fn serve(core: Arc<CoreState>, addr: SocketAddr) -> Result<(), CommandError> {
    // Load up front so a broken store fails at startup, not on first request
    let store = core.snapshot()?;
    tracing::info!(version = store.version, "Store loaded");

    let mut server = api::start_api_server(core, addr)
        .await
        .map_err(CommandError::Server)?;
    println!("Serving on http://{}/api", server.addr);

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.wait().await;
    Ok(())
}
