use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use recshare_application::{GrantQuery, GrantRepository};
use recshare_core::{AppError, AppResult, TenantId};
use recshare_domain::{AccessLevel, Grant, GrantId, GrantRevocation};

mod read;
mod write;


/// PostgreSQL-backed repository for record sharing grants.
///
/// Uniqueness of the active grant per resource and grantee is enforced by a
/// partial unique index, so concurrent inserts cannot both commit.
#[derive(Clone)]
pub struct PostgresGrantRepository {
    pool: PgPool,
}

impl PostgresGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    grant_id: Uuid,
    resource_id: String,
    grantee_id: String,
    access_level: String,
    created_by: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked_by: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    revoke_reason: Option<String>,
}

fn grant_from_row(row: GrantRow) -> AppResult<Grant> {
    let grant_id = GrantId::from_uuid(row.grant_id);
    let access_level = AccessLevel::from_str(row.access_level.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "failed to decode access level for grant '{grant_id}': {error}"
        ))
    })?;

    let revocation = match (row.revoked_by, row.revoked_at) {
        (Some(revoked_by), Some(revoked_at)) => Some(GrantRevocation {
            revoked_by,
            revoked_at,
            reason: row.revoke_reason,
        }),
        _ => None,
    };

    Grant::restore(
        grant_id,
        row.resource_id,
        row.grantee_id,
        access_level,
        row.created_by,
        row.created_at,
        row.expires_at,
    )
    .map(|grant| grant.with_revocation(revocation))
    .map_err(|error| AppError::Internal(format!("failed to decode grant '{grant_id}': {error}")))
}

fn map_grant_conflict(error: sqlx::Error, grant: &Grant) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "resource '{}' already has an active grant for '{}'",
            grant.resource_id(),
            grant.grantee_id()
        ));
    }

    AppError::Internal(format!("failed to insert sharing grant: {error}"))
}

fn page_bound(value: usize, label: &str) -> AppResult<i64> {
    i64::try_from(value)
        .map_err(|_| AppError::Validation(format!("grant list {label} exceeds supported range")))
}

#[async_trait]
impl GrantRepository for PostgresGrantRepository {
    async fn insert_grant(&self, tenant_id: TenantId, grant: &Grant) -> AppResult<()> {
        self.insert_grant_impl(tenant_id, grant).await
    }

    async fn find_grant(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
    ) -> AppResult<Option<Grant>> {
        self.find_grant_impl(tenant_id, grant_id).await
    }

    async fn find_active_grant(
        &self,
        tenant_id: TenantId,
        resource_id: &str,
        grantee_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Grant>> {
        self.find_active_grant_impl(tenant_id, resource_id, grantee_id, now)
            .await
    }

    async fn list_grants(
        &self,
        tenant_id: TenantId,
        query: GrantQuery,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Grant>> {
        self.list_grants_impl(tenant_id, query, now).await
    }

    async fn revoke_grant(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
        revocation: GrantRevocation,
    ) -> AppResult<()> {
        self.revoke_grant_impl(tenant_id, grant_id, revocation).await
    }

    async fn expire_grants(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.expire_grants_impl(now).await
    }
}
