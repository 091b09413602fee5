//! Audit logging middleware.
//!
//! Logs every API request with the peer address, method, path and
//! response status.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiContext;
use crate::core_state::AccessSource;

/// Log API access for audit trail.
/// Accesses `ApiContext` from request extensions.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let ctx = req.extensions().get::<ApiContext>().cloned();

    // Present only when served with connect info (not under oneshot tests)
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16();
    tracing::debug!(%method, %path, status, "API request");

    if let Some(ctx) = ctx {
        ctx.core.log_access(
            AccessSource::Api { peer },
            &format!("{method} {path}"),
            &format!("status:{status}"),
        );
    }

    response
}
