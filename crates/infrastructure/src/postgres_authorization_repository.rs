use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use recshare_application::AuthorizationRepository;
use recshare_core::{AppError, AppResult, TenantId};
use recshare_domain::Permission;

/// PostgreSQL lookup of the sharing permissions a subject holds through its
/// roles.
///
/// Role grants are shared with other services, so only values naming a
/// sharing permission are read; anything else is ignored.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sharing_permission_values() -> Vec<String> {
    Permission::all()
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_permissions_for_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<Permission>> {
        let values = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT role_grants.permission
            FROM rbac_subject_roles AS subject_roles
            INNER JOIN rbac_roles AS roles
                ON roles.id = subject_roles.role_id
                AND roles.tenant_id = subject_roles.tenant_id
            INNER JOIN rbac_role_grants AS role_grants
                ON role_grants.role_id = roles.id
            WHERE subject_roles.tenant_id = $1
                AND subject_roles.subject = $2
                AND role_grants.permission = ANY($3)
            ORDER BY role_grants.permission
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(subject)
        .bind(sharing_permission_values())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve sharing permissions for '{subject}': {error}"
            ))
        })?;

        values
            .iter()
            .map(|value| Permission::from_str(value.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests;
