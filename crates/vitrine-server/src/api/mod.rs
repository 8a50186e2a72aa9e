mod admin;
mod catalog;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use vitrine_gateway::{CatalogGateway, DimensionProber, OrientationClassifier};

use crate::middleware::{request_id, require_admin_auth, AdminAuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// Injected gateway handle; tests substitute an in-memory fake.
    pub gateway: Arc<dyn CatalogGateway>,
    /// Prober for the catalog cards' primary images.
    pub prober: Arc<DimensionProber>,
    /// Latest-keyed classifier for the gallery stage.
    pub classifier: Arc<OrientationClassifier>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    backend: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(auth: AdminAuthState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/admin/items", post(admin::create_item))
        .route("/admin/items/{id}", post(admin::update_item))
        .route("/admin/items/{id}/publish", post(admin::toggle_published))
        .route("/admin/items/{id}/delete", post(admin::delete_item))
        .route("/admin/settings", post(admin::save_settings))
        // Ten images at the 5 MB advisory limit plus form fields.
        .layer(axum::extract::DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_admin_auth,
        ))
}

pub fn build_app(state: AppState, auth: AdminAuthState) -> Router {
    let public_routes = Router::new()
        .route("/", get(catalog::catalog_page))
        .route("/items/{id}/gallery", get(catalog::gallery_fragment))
        .route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(admin_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Health probe: pings the backend through the settings read, which every
/// page depends on anyway.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.gateway.get_settings().await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    backend: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: backend unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        backend: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
