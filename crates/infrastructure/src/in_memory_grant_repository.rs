use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recshare_application::{GrantQuery, GrantRepository};
use recshare_core::{AppError, AppResult, TenantId};
use recshare_domain::{Grant, GrantId, GrantRevocation};
use tokio::sync::RwLock;

/// Stored grant plus whether the sweep has already recorded its expiry.
#[derive(Debug, Clone)]
struct StoredGrant {
    grant: Grant,
    expiry_recorded: bool,
}

/// In-memory grant repository implementation.
///
/// The duplicate check and the insert share one write guard, so concurrent
/// inserts for the same pair serialize.
#[derive(Debug, Default)]
pub struct InMemoryGrantRepository {
    grants: RwLock<HashMap<(TenantId, GrantId), StoredGrant>>,
}

impl InMemoryGrantRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GrantRepository for InMemoryGrantRepository {
    async fn insert_grant(&self, tenant_id: TenantId, grant: &Grant) -> AppResult<()> {
        let mut grants = self.grants.write().await;

        let duplicate = grants.iter().any(|((stored_tenant_id, _), stored)| {
            stored_tenant_id == &tenant_id
                && stored
                    .grant
                    .covers(grant.resource_id().as_str(), grant.grantee_id().as_str())
                && stored.grant.is_active_at(grant.created_at())
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "resource '{}' already has an active grant for '{}' in tenant '{}'",
                grant.resource_id(),
                grant.grantee_id(),
                tenant_id
            )));
        }

        let key = (tenant_id, grant.grant_id());
        if grants.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "grant '{}' already exists for tenant '{}'",
                key.1, key.0
            )));
        }

        grants.insert(
            key,
            StoredGrant {
                grant: grant.clone(),
                expiry_recorded: false,
            },
        );
        Ok(())
    }

    async fn find_grant(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
    ) -> AppResult<Option<Grant>> {
        Ok(self
            .grants
            .read()
            .await
            .get(&(tenant_id, grant_id))
            .map(|stored| stored.grant.clone()))
    }

    async fn find_active_grant(
        &self,
        tenant_id: TenantId,
        resource_id: &str,
        grantee_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Grant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), stored)| {
                stored_tenant_id == &tenant_id
                    && stored.grant.covers(resource_id, grantee_id)
                    && stored.grant.is_active_at(now)
            })
            .map(|(_, stored)| stored.grant.clone()))
    }

    async fn list_grants(
        &self,
        tenant_id: TenantId,
        query: GrantQuery,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Grant>> {
        let grants = self.grants.read().await;

        let mut values: Vec<Grant> = grants
            .iter()
            .filter_map(|((stored_tenant_id, _), stored)| {
                let grant = &stored.grant;
                let matches = stored_tenant_id == &tenant_id
                    && query
                        .resource_id
                        .as_deref()
                        .is_none_or(|value| grant.resource_id().as_str() == value)
                    && query
                        .grantee_id
                        .as_deref()
                        .is_none_or(|value| grant.grantee_id().as_str() == value)
                    && (!query.active_only || grant.is_active_at(now));

                matches.then_some(grant.clone())
            })
            .collect();
        values.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.grant_id().as_uuid().cmp(&left.grant_id().as_uuid()))
        });

        Ok(values
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn revoke_grant(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
        revocation: GrantRevocation,
    ) -> AppResult<()> {
        let mut grants = self.grants.write().await;
        let stored = grants.get_mut(&(tenant_id, grant_id)).ok_or_else(|| {
            AppError::NotFound(format!(
                "grant '{grant_id}' was not found or is no longer active"
            ))
        })?;

        stored.grant.revoke(
            revocation.revoked_by.as_str(),
            revocation.revoked_at,
            revocation.reason.as_deref(),
        )
    }

    async fn expire_grants(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut grants = self.grants.write().await;

        let mut transitioned: u64 = 0;
        for stored in grants.values_mut() {
            if !stored.expiry_recorded
                && stored.grant.revocation().is_none()
                && stored.grant.expires_at() <= now
            {
                stored.expiry_recorded = true;
                transitioned += 1;
            }
        }

        Ok(transitioned)
    }
}
