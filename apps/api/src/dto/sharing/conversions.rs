use recshare_application::{
    DisplayMode, GrantCreated, GrantView, Navigation, Notification, NotificationSeverity,
    ShareOutcome,
};
use recshare_domain::AccessLevel;

use super::types::{
    CreateShareGrantResponse, EffectiveAccessResponse, ShareGrantResponse,
    ShareNavigationResponse, ShareNotificationResponse,
};

impl From<GrantView> for ShareGrantResponse {
    fn from(value: GrantView) -> Self {
        let grant = value.grant;
        let revocation = grant.revocation().cloned();

        Self {
            grant_id: grant.grant_id().to_string(),
            resource_id: grant.resource_id().as_str().to_owned(),
            grantee_id: grant.grantee_id().as_str().to_owned(),
            access_level: grant.access_level().label().to_owned(),
            status: value.status.as_str().to_owned(),
            created_by: grant.created_by().as_str().to_owned(),
            created_at: grant.created_at().to_rfc3339(),
            expires_at: grant.expires_at().to_rfc3339(),
            revoked_by: revocation.as_ref().map(|value| value.revoked_by.clone()),
            revoked_at: revocation.as_ref().map(|value| value.revoked_at.to_rfc3339()),
            revoke_reason: revocation.and_then(|value| value.reason),
        }
    }
}

impl From<Notification> for ShareNotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            title: value.title,
            message: value.message,
            severity: match value.severity {
                NotificationSeverity::Success => "success",
                NotificationSeverity::Error => "error",
            }
            .to_owned(),
        }
    }
}

impl From<Navigation> for ShareNavigationResponse {
    fn from(value: Navigation) -> Self {
        Self {
            record_id: value.record_id,
            mode: match value.mode {
                DisplayMode::View => "view",
            }
            .to_owned(),
        }
    }
}

impl CreateShareGrantResponse {
    /// Combines a created grant with the presentation for the caller.
    pub fn new(created: GrantCreated, outcome: ShareOutcome) -> Self {
        let created_at = created.grant.created_at();

        Self {
            grant_id: created.grant_id.to_string(),
            status: created.status.as_str().to_owned(),
            grant: ShareGrantResponse::from(GrantView::at(created.grant, created_at)),
            notification: outcome.notification.into(),
            navigation: outcome.navigation.map(ShareNavigationResponse::from),
        }
    }
}

impl EffectiveAccessResponse {
    /// Describes the access level held for a pair, if any.
    pub fn new(resource_id: String, grantee_id: String, level: Option<AccessLevel>) -> Self {
        Self {
            resource_id,
            grantee_id,
            access_level: level.map(|level| level.label().to_owned()),
            can_read: level.is_some_and(|level| level.allows(AccessLevel::Read)),
            can_edit: level.is_some_and(|level| level.allows(AccessLevel::Edit)),
        }
    }
}
