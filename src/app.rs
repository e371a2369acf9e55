//! 路由组装：上传与列表接口、追踪、存储注入与 CORS。

use axum::extract::{DefaultBodyLimit, Extension, connect_info::ConnectInfo};
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info_span};

use crate::files;
use crate::http::{AllowedOrigins, build_cors_layer, reject_disallowed_origin};
use crate::storage::Storage;
use crate::upload;

/// Builds the full application router. Every route is registered here, before any listener exists.
pub fn build_router(storage: Arc<Storage>, origins: AllowedOrigins) -> Router {
    Router::new()
        .route(
            "/api/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/files", get(files::list_files))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let forwarded_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.split(',').next().unwrap_or("").trim().to_string());
                    let connect_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.to_string());
                    let client_ip = forwarded_ip
                        .or(connect_ip)
                        .unwrap_or_else(|| "unknown".to_string());

                    info_span!(
                        env!("CARGO_CRATE_NAME"),
                        client_ip,
                        method = ?request.method(),
                        path = ?request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(Extension(storage))
        .layer(build_cors_layer(&origins))
        .layer(middleware::from_fn_with_state(
            origins,
            reject_disallowed_origin,
        ))
}
