use std::str::FromStr;

use chrono::Utc;
use recshare_core::AppError;
use recshare_domain::{AccessLevel, GrantId};

use crate::{GrantQuery, GrantView};

use super::*;

impl SharingService {
    /// Returns one grant with its status evaluated now.
    pub async fn get_grant(&self, actor: &UserIdentity, grant_id: &str) -> AppResult<GrantView> {
        self.require_permission(actor, Permission::RecordShareRead)
            .await?;

        let parsed_grant_id = GrantId::from_str(grant_id)?;
        let grant = self
            .repository
            .find_grant(actor.tenant_id(), parsed_grant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' was not found")))?;

        Ok(GrantView::at(grant, Utc::now()))
    }

    /// Lists grants in the actor's tenant.
    pub async fn list_grants(
        &self,
        actor: &UserIdentity,
        query: GrantQuery,
    ) -> AppResult<Vec<GrantView>> {
        self.require_permission(actor, Permission::RecordShareRead)
            .await?;

        let now = Utc::now();
        let grants = self
            .repository
            .list_grants(actor.tenant_id(), query.normalized(), now)
            .await?;

        Ok(grants
            .into_iter()
            .map(|grant| GrantView::at(grant, now))
            .collect())
    }

    /// Returns the access level a grantee currently holds on a resource.
    ///
    /// This is the lookup an enforcement layer consults; `None` means no
    /// active grant exists.
    pub async fn effective_access(
        &self,
        actor: &UserIdentity,
        resource_id: &str,
        grantee_id: &str,
    ) -> AppResult<Option<AccessLevel>> {
        self.require_permission(actor, Permission::RecordShareRead)
            .await?;

        let grant = self
            .repository
            .find_active_grant(
                actor.tenant_id(),
                resource_id.trim(),
                grantee_id.trim(),
                Utc::now(),
            )
            .await?;

        Ok(grant.map(|grant| grant.access_level()))
    }

    /// Returns whether a grantee may perform an operation needing `required`.
    pub async fn has_access(
        &self,
        actor: &UserIdentity,
        resource_id: &str,
        grantee_id: &str,
        required: AccessLevel,
    ) -> AppResult<bool> {
        Ok(self
            .effective_access(actor, resource_id, grantee_id)
            .await?
            .is_some_and(|level| level.allows(required)))
    }
}
