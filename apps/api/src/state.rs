use std::sync::Arc;

use recshare_application::SharingService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sharing_service: SharingService,
    pub postgres_pool: PgPool,
    pub gateway_shared_secret: Arc<str>,
}
