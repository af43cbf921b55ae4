use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::ForumRepository;
use crate::handlers::{admin, public};
use crate::middleware::context_middleware;
use crate::security::PermissionModelBuilder;
use crate::services::PermissionSetService;

/// Shared per-process dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ForumRepository>,
    pub builder: PermissionModelBuilder,
    pub permission_sets: PermissionSetService,
}

impl AppState {
    pub fn new(repository: Arc<dyn ForumRepository>) -> Self {
        Self {
            builder: PermissionModelBuilder::new(repository.clone()),
            permission_sets: PermissionSetService::new(repository.clone()),
            repository,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(forum_routes())
        .merge(admin_routes())
        .route_layer(from_fn_with_state(state.clone(), context_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api)
        .with_state(state);

    let settings = config::config();
    if settings.security.enable_cors {
        router = router.layer(cors_layer(&settings.security.cors_origins));
    }
    if settings.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn forum_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/api/public/forums/readable", get(public::forums_readable))
        .route(
            "/api/public/forums/:forum_id/permissions",
            get(public::forum_permissions),
        )
        .route(
            "/api/public/forums/:forum_id/authorize",
            post(public::forum_authorize),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/permission-sets",
            get(admin::permission_set_list).post(admin::permission_set_create),
        )
        .route(
            "/api/admin/permission-sets/:id",
            get(admin::permission_set_show)
                .put(admin::permission_set_update)
                .delete(admin::permission_set_delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Atlas Forum API",
            "version": version,
            "description": "Forum permission resolution and authorization gate",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "forums": "/api/public/forums/readable, /api/public/forums/:forum_id/{permissions,authorize}",
                "admin": "/api/admin/permission-sets[/:id] (requires Admin role)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
