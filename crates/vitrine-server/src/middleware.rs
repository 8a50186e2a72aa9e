use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token settings guarding the admin surface.
#[derive(Debug, Clone)]
pub struct AdminAuthState {
    tokens: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AdminAuthState {
    /// Builds auth config from `VITRINE_ADMIN_TOKENS` (comma-separated
    /// bearer tokens).
    ///
    /// In development, empty/missing tokens disable auth for local
    /// iteration. In non-development envs, empty/missing tokens fail
    /// startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("VITRINE_ADMIN_TOKENS").unwrap_or_default();
        let tokens: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if tokens.is_empty() {
            if is_development {
                tracing::warn!(
                    "VITRINE_ADMIN_TOKENS not set; admin auth disabled in development environment"
                );
                return Ok(Self {
                    tokens: Arc::new(Vec::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "VITRINE_ADMIN_TOKENS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            tokens: Arc::new(tokens),
            enabled: true,
        })
    }

    fn allows(&self, token: &str) -> bool {
        // Constant-time comparison against every configured token; no
        // early exit on the first match.
        let mut matched = subtle::Choice::from(0);
        for candidate in self.tokens.iter() {
            matched |= candidate.as_bytes().ct_eq(token.as_bytes());
        }
        matched.into()
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for MiddlewareErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth on admin routes when enabled.
pub async fn require_admin_auth(
    State(auth): State<AdminAuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    match token {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "missing or invalid bearer token",
            },
        }
        .into_response(),
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
