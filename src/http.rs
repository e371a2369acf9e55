//! HTTP 辅助工具：CORS 来源白名单与拒绝中间件。

use axum::body::Body as AxumBody;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CORS_ALLOWED_HEADERS;
use crate::error::ApiError;

pub const CORS_REJECTED_MESSAGE: &str = "Not allowed by CORS";

/// 允许跨域访问的来源列表。
#[derive(Clone, Debug)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    /// 解析逗号分隔的来源列表，跳过非法值。
    pub fn parse(cors_origins: &str) -> Self {
        let origins = cors_origins
            .split(',')
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "invalid cors origin");
                    None
                }
            })
            .collect::<Vec<_>>();
        Self(Arc::new(origins))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    fn values(&self) -> Vec<HeaderValue> {
        self.0.as_ref().clone()
    }
}

/// 构建 CORS Layer（处理预检请求与响应头）。
pub fn build_cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.values()))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(CORS_ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_credentials(true)
}

/// 携带 Origin 且不在白名单内的请求直接拒绝，不进入处理器。
pub async fn reject_disallowed_origin(
    State(origins): State<AllowedOrigins>,
    request: Request<AxumBody>,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN)
        && !origins.contains(origin)
    {
        warn!(
            origin = origin.to_str().unwrap_or("<non-ascii>"),
            path = request.uri().path(),
            "origin not allowed"
        );
        return ApiError::Forbidden(CORS_REJECTED_MESSAGE.into()).into_response();
    }
    next.run(request).await
}
