use tracing::debug;

use super::*;

impl PostgresGrantRepository {
    pub(super) async fn insert_grant_impl(
        &self,
        tenant_id: TenantId,
        grant: &Grant,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // A lapsed grant still marked active would trip the unique index.
        let lapsed = sqlx::query(
            r#"
            UPDATE record_share_grants
            SET status = 'expired'
            WHERE tenant_id = $1
                AND resource_id = $2
                AND grantee_id = $3
                AND status = 'active'
                AND expires_at <= $4
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(grant.resource_id().as_str())
        .bind(grant.grantee_id().as_str())
        .bind(grant.created_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to expire lapsed sharing grant: {error}"))
        })?;

        if lapsed.rows_affected() > 0 {
            debug!(
                tenant_id = %tenant_id,
                resource_id = %grant.resource_id(),
                grantee_id = %grant.grantee_id(),
                "expired lapsed sharing grant before insert"
            );
        }

        sqlx::query(
            r#"
            INSERT INTO record_share_grants (
                id,
                tenant_id,
                resource_id,
                grantee_id,
                access_level,
                status,
                created_by,
                created_at,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8)
            "#,
        )
        .bind(grant.grant_id().as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(grant.resource_id().as_str())
        .bind(grant.grantee_id().as_str())
        .bind(grant.access_level().as_str())
        .bind(grant.created_by().as_str())
        .bind(grant.created_at())
        .bind(grant.expires_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_grant_conflict(error, grant))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn revoke_grant_impl(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
        revocation: GrantRevocation,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE record_share_grants
            SET
                status = 'revoked',
                revoked_by = $3,
                revoked_at = $4,
                revoke_reason = $5
            WHERE tenant_id = $1
                AND id = $2
                AND status = 'active'
                AND expires_at > $4
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(grant_id.as_uuid())
        .bind(revocation.revoked_by.as_str())
        .bind(revocation.revoked_at)
        .bind(revocation.reason.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke sharing grant: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "grant '{grant_id}' was not found or is no longer active"
            )));
        }

        Ok(())
    }

    pub(super) async fn expire_grants_impl(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE record_share_grants
            SET status = 'expired'
            WHERE status = 'active'
                AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to expire sharing grants: {error}")))?;

        Ok(result.rows_affected())
    }
}
