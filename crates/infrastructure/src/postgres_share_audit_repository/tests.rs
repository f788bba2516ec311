use chrono::{Duration, Utc};
use recshare_application::{AuditEvent, AuditRepository, GrantRepository};
use recshare_core::{AppError, NonEmptyString, TenantId};
use recshare_domain::{AccessLevel, AuditAction, Grant};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresShareAuditRepository, audited_grant_id};
use crate::PostgresGrantRepository;

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
        panic!("failed to run migrations for sharing audit tests: {error}");
    }

    Some(pool)
}

fn text(value: &str) -> NonEmptyString {
    NonEmptyString::new(value).unwrap_or_else(|_| unreachable!())
}

fn revoked_event(tenant_id: TenantId, resource_type: &str, resource_id: &str) -> AuditEvent {
    AuditEvent {
        tenant_id,
        subject: "admin".to_owned(),
        action: AuditAction::SharingGrantRevoked,
        resource_type: resource_type.to_owned(),
        resource_id: resource_id.to_owned(),
        detail: Some("revoked sharing grant: access review".to_owned()),
    }
}

#[test]
fn only_grant_events_with_grant_ids_are_accepted() {
    let tenant_id = TenantId::new();

    let other_type = audited_grant_id(&revoked_event(
        tenant_id,
        "user",
        "3f0b1c4e-2a49-4a8e-9b57-0d6f5a1c2e11",
    ));
    assert!(matches!(other_type, Err(AppError::Validation(_))));

    let malformed = audited_grant_id(&revoked_event(tenant_id, "record_share_grant", "res-42"));
    assert!(matches!(malformed, Err(AppError::Validation(_))));

    let valid = audited_grant_id(&revoked_event(
        tenant_id,
        "record_share_grant",
        "3f0b1c4e-2a49-4a8e-9b57-0d6f5a1c2e11",
    ));
    assert!(valid.is_ok());
}

#[tokio::test]
async fn revocation_event_is_recorded_against_its_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let tenant_id = TenantId::new();
    let now = Utc::now();
    let grant = Grant::issue(
        text("res-42"),
        text("u2"),
        AccessLevel::Read,
        text("u1"),
        now,
        now + Duration::days(1),
    )
    .unwrap_or_else(|_| unreachable!());
    let grants = PostgresGrantRepository::new(pool.clone());
    assert!(grants.insert_grant(tenant_id, &grant).await.is_ok());

    let repository = PostgresShareAuditRepository::new(pool.clone());
    let appended = repository
        .append_event(revoked_event(
            tenant_id,
            "record_share_grant",
            grant.grant_id().to_string().as_str(),
        ))
        .await;
    assert!(appended.is_ok());

    let recorded = sqlx::query_as::<_, (String, String, Option<String>)>(
        r#"
        SELECT actor, action, detail
        FROM record_share_audit_events
        WHERE tenant_id = $1 AND grant_id = $2
        "#,
    )
    .bind(tenant_id.as_uuid())
    .bind(grant.grant_id().as_uuid())
    .fetch_all(&pool)
    .await
    .unwrap_or_default();

    assert_eq!(
        recorded,
        vec![(
            "admin".to_owned(),
            "sharing.grant.revoked".to_owned(),
            Some("revoked sharing grant: access review".to_owned()),
        )]
    );
}
