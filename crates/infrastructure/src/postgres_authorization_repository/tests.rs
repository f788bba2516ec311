use recshare_application::AuthorizationRepository;
use recshare_core::TenantId;
use recshare_domain::Permission;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresAuthorizationRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres authorization tests: {error}");
    }

    Some(pool)
}

async fn assign_role(pool: &PgPool, tenant_id: TenantId, subject: &str, permissions: &[&str]) {
    let role_id = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"
        INSERT INTO rbac_roles (tenant_id, name, is_system)
        VALUES ($1, 'sharing_admin', false)
        RETURNING id
        "#,
    )
    .bind(tenant_id.as_uuid())
    .fetch_one(pool)
    .await;
    assert!(role_id.is_ok());
    let role_id = role_id.unwrap_or_else(|_| unreachable!());

    for permission in permissions {
        let grant = sqlx::query(
            r#"
            INSERT INTO rbac_role_grants (role_id, permission)
            VALUES ($1, $2)
            "#,
        )
        .bind(role_id)
        .bind(*permission)
        .execute(pool)
        .await;
        assert!(grant.is_ok());
    }

    let assignment = sqlx::query(
        r#"
        INSERT INTO rbac_subject_roles (tenant_id, subject, role_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(tenant_id.as_uuid())
    .bind(subject)
    .bind(role_id)
    .execute(pool)
    .await;
    assert!(assignment.is_ok());
}

#[tokio::test]
async fn permissions_resolve_through_subject_roles() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let tenant_id = TenantId::new();
    assign_role(
        &pool,
        tenant_id,
        "alice",
        &["record.share", "record.share.read"],
    )
    .await;
    let repository = PostgresAuthorizationRepository::new(pool);

    let mut permissions = repository
        .list_permissions_for_subject(tenant_id, "alice")
        .await
        .unwrap_or_default();
    permissions.sort_by_key(|permission| permission.as_str());
    assert_eq!(
        permissions,
        vec![Permission::RecordShare, Permission::RecordShareRead]
    );

    let other_tenant = repository
        .list_permissions_for_subject(TenantId::new(), "alice")
        .await
        .unwrap_or_default();
    assert!(other_tenant.is_empty());
}

#[tokio::test]
async fn unrelated_permissions_do_not_hide_sharing_permissions() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let tenant_id = TenantId::new();
    assign_role(
        &pool,
        tenant_id,
        "bob",
        &["record.delete", "record.share", "workflow.run"],
    )
    .await;
    let other_tenant_id = TenantId::new();
    assign_role(&pool, other_tenant_id, "carol", &["record.delete"]).await;
    let repository = PostgresAuthorizationRepository::new(pool);

    let permissions = repository
        .list_permissions_for_subject(tenant_id, "bob")
        .await;
    assert!(matches!(permissions.as_deref(), Ok([Permission::RecordShare])));

    let only_unrelated = repository
        .list_permissions_for_subject(other_tenant_id, "carol")
        .await;
    assert!(matches!(only_unrelated.as_deref(), Ok([])));
}
