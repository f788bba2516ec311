use std::sync::Arc;

use recshare_core::{AppResult, UserIdentity};
use recshare_domain::Permission;

use crate::{AuditRepository, AuthorizationService, GrantRepository};

mod access;
mod create;
mod expiry;
mod revoke;


/// Application service for record sharing grants.
#[derive(Clone)]
pub struct SharingService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn GrantRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SharingService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn GrantRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor.tenant_id(), actor.subject(), permission)
            .await
    }
}
