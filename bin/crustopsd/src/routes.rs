//! Route registration — collects module routes + system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete router with all routes.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new().route("/version", get(version));

    // Mount each module's routes under /{module_name}. Module routes
    // are already Router<()>; state was applied internally.
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "crustopsd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
