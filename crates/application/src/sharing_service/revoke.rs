use std::str::FromStr;

use chrono::Utc;
use recshare_domain::{AuditAction, GrantId, GrantRevocation};
use tracing::info;

use crate::AuditEvent;

use super::*;

impl SharingService {
    /// Revokes an active grant and emits an audit event.
    pub async fn revoke_grant(
        &self,
        actor: &UserIdentity,
        grant_id: &str,
        revoke_reason: Option<&str>,
    ) -> AppResult<()> {
        self.require_permission(actor, Permission::RecordShareRevoke)
            .await?;

        let parsed_grant_id = GrantId::from_str(grant_id)?;
        let revoke_reason = revoke_reason
            .map(str::trim)
            .filter(|reason| !reason.is_empty());

        self.repository
            .revoke_grant(
                actor.tenant_id(),
                parsed_grant_id,
                GrantRevocation {
                    revoked_by: actor.subject().to_owned(),
                    revoked_at: Utc::now(),
                    reason: revoke_reason.map(str::to_owned),
                },
            )
            .await?;

        info!(
            tenant_id = %actor.tenant_id(),
            grant_id = %parsed_grant_id,
            revoked_by = %actor.subject(),
            "sharing grant revoked"
        );

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::SharingGrantRevoked,
                resource_type: "record_share_grant".to_owned(),
                resource_id: parsed_grant_id.to_string(),
                detail: revoke_reason
                    .map(|reason| format!("revoked sharing grant: {reason}"))
                    .or(Some("revoked sharing grant".to_owned())),
            })
            .await
    }
}
