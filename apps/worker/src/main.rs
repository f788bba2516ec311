//! Record sharing background worker.
//!
//! Periodically materializes expiry for grants whose expiry has passed so
//! stored status stays in step with what reads already report.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use recshare_application::{AuthorizationService, SharingService};
use recshare_core::{AppError, AppResult};
use recshare_infrastructure::{
    PostgresAuthorizationRepository, PostgresGrantRepository, PostgresShareAuditRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
struct WorkerConfig {
    database_url: String,
    database_max_connections: u32,
    worker_id: String,
    sweep_interval_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(
        config.database_url.as_str(),
        config.database_max_connections,
    )
    .await?;
    let sharing_service = build_sharing_service(pool);

    info!(
        worker_id = %config.worker_id,
        sweep_interval_seconds = config.sweep_interval_seconds,
        "recshare-worker started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.sweep_interval_seconds));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match sharing_service.expire_grants(Utc::now()).await {
            Ok(0) => debug!(worker_id = %config.worker_id, "no grants to expire"),
            Ok(expired_count) => info!(
                worker_id = %config.worker_id,
                expired_count,
                "expired lapsed sharing grants"
            ),
            Err(error) => warn!(
                worker_id = %config.worker_id,
                error = %error,
                "failed to expire sharing grants"
            ),
        }
    }
}

async fn connect_pool(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_sharing_service(pool: PgPool) -> SharingService {
    let authorization_service = AuthorizationService::new(Arc::new(
        PostgresAuthorizationRepository::new(pool.clone()),
    ));

    SharingService::new(
        authorization_service,
        Arc::new(PostgresGrantRepository::new(pool.clone())),
        Arc::new(PostgresShareAuditRepository::new(pool)),
    )
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let database_max_connections =
            parse_value(&lookup, "DATABASE_MAX_CONNECTIONS", 5_u32)?;
        let worker_id = lookup("WORKER_ID")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("worker-{}", std::process::id()));
        let sweep_interval_seconds = parse_value(&lookup, "SWEEP_INTERVAL_SECONDS", 60_u64)?;

        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        if sweep_interval_seconds == 0 {
            return Err(AppError::Validation(
                "SWEEP_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            worker_id,
            sweep_interval_seconds,
        })
    }
}

fn parse_value<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
