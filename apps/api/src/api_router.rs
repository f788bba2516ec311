use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use recshare_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let sharing_routes = Router::new()
        .route(
            "/api/sharing/grants",
            get(handlers::sharing::list_grants_handler)
                .post(handlers::sharing::create_grant_handler),
        )
        .route(
            "/api/sharing/grants/{grant_id}",
            get(handlers::sharing::get_grant_handler),
        )
        .route(
            "/api/sharing/grants/{grant_id}/revoke",
            post(handlers::sharing::revoke_grant_handler),
        )
        .route(
            "/api/sharing/resources/{resource_id}/grantees/{grantee_id}/access",
            get(handlers::sharing::effective_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_gateway_identity,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(sharing_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
