use std::sync::Arc;

use recshare_application::{AuthorizationService, SharingService};
use recshare_infrastructure::{
    PostgresAuthorizationRepository, PostgresGrantRepository, PostgresShareAuditRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let authorization_repository = Arc::new(PostgresAuthorizationRepository::new(pool.clone()));
    let grant_repository = Arc::new(PostgresGrantRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresShareAuditRepository::new(pool.clone()));

    let authorization_service = AuthorizationService::new(authorization_repository);
    let sharing_service =
        SharingService::new(authorization_service, grant_repository, audit_repository);

    AppState {
        sharing_service,
        postgres_pool: pool,
        gateway_shared_secret: Arc::from(config.gateway_shared_secret.as_str()),
    }
}
