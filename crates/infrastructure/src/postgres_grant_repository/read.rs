use super::*;

impl PostgresGrantRepository {
    pub(super) async fn find_grant_impl(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
    ) -> AppResult<Option<Grant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                id AS grant_id,
                resource_id,
                grantee_id,
                access_level,
                created_by,
                created_at,
                expires_at,
                revoked_by,
                revoked_at,
                revoke_reason
            FROM record_share_grants
            WHERE tenant_id = $1
                AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(grant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find sharing grant: {error}")))?;

        row.map(grant_from_row).transpose()
    }

    pub(super) async fn find_active_grant_impl(
        &self,
        tenant_id: TenantId,
        resource_id: &str,
        grantee_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Grant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                id AS grant_id,
                resource_id,
                grantee_id,
                access_level,
                created_by,
                created_at,
                expires_at,
                revoked_by,
                revoked_at,
                revoke_reason
            FROM record_share_grants
            WHERE tenant_id = $1
                AND resource_id = $2
                AND grantee_id = $3
                AND status = 'active'
                AND expires_at > $4
            LIMIT 1
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(resource_id)
        .bind(grantee_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find active sharing grant: {error}"))
        })?;

        row.map(grant_from_row).transpose()
    }

    pub(super) async fn list_grants_impl(
        &self,
        tenant_id: TenantId,
        query: GrantQuery,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Grant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                id AS grant_id,
                resource_id,
                grantee_id,
                access_level,
                created_by,
                created_at,
                expires_at,
                revoked_by,
                revoked_at,
                revoke_reason
            FROM record_share_grants
            WHERE tenant_id = $1
                AND ($2::TEXT IS NULL OR resource_id = $2)
                AND ($3::TEXT IS NULL OR grantee_id = $3)
                AND (NOT $4 OR (status = 'active' AND expires_at > $5))
            ORDER BY created_at DESC, id DESC
            LIMIT $6
            OFFSET $7
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(query.resource_id.as_deref())
        .bind(query.grantee_id.as_deref())
        .bind(query.active_only)
        .bind(now)
        .bind(page_bound(query.limit, "limit")?)
        .bind(page_bound(query.offset, "offset")?)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list sharing grants: {error}")))?;

        rows.into_iter().map(grant_from_row).collect()
    }
}
