use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use recshare_application::{AuditEvent, AuditRepository};
use recshare_core::{AppError, AppResult};
use recshare_domain::GrantId;

#[cfg(test)]
mod tests;

/// Resource type carried by every sharing audit event.
const GRANT_RESOURCE_TYPE: &str = "record_share_grant";

/// PostgreSQL audit trail of sharing grant administration.
///
/// Events are keyed by the grant they concern, so the trail of a grant can be
/// read back alongside the grant row.
#[derive(Clone)]
pub struct PostgresShareAuditRepository {
    pool: PgPool,
}

impl PostgresShareAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn audited_grant_id(event: &AuditEvent) -> AppResult<GrantId> {
    if event.resource_type != GRANT_RESOURCE_TYPE {
        return Err(AppError::Validation(format!(
            "sharing audit trail only records '{GRANT_RESOURCE_TYPE}' events, got '{}'",
            event.resource_type
        )));
    }

    GrantId::from_str(event.resource_id.as_str())
}

#[async_trait]
impl AuditRepository for PostgresShareAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let grant_id = audited_grant_id(&event)?;

        sqlx::query(
            r#"
            INSERT INTO record_share_audit_events (tenant_id, grant_id, actor, action, detail)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.tenant_id.as_uuid())
        .bind(grant_id.as_uuid())
        .bind(event.subject.as_str())
        .bind(event.action.as_str())
        .bind(event.detail.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to record '{}' for grant '{grant_id}': {error}",
                event.action.as_str()
            ))
        })?;

        Ok(())
    }
}
