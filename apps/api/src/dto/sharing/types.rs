use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for grant creation.
///
/// Every field is optional so missing input is reported by the service with
/// its specific error code instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-share-grant-request.ts"
)]
pub struct CreateShareGrantRequest {
    pub resource_id: Option<String>,
    pub grantee_id: Option<String>,
    pub access_level: Option<String>,
    pub expires_at: Option<String>,
}

/// Incoming payload for grant revocation.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/revoke-share-grant-request.ts"
)]
pub struct RevokeShareGrantRequest {
    pub revoke_reason: Option<String>,
}

/// API representation of a sharing grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-grant-response.ts"
)]
pub struct ShareGrantResponse {
    pub grant_id: String,
    pub resource_id: String,
    pub grantee_id: String,
    pub access_level: String,
    pub status: String,
    pub created_by: String,
    pub created_at: String,
    pub expires_at: String,
    pub revoked_by: Option<String>,
    pub revoked_at: Option<String>,
    pub revoke_reason: Option<String>,
}

/// Notification a thin client renders after a share attempt.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-notification-response.ts"
)]
pub struct ShareNotificationResponse {
    pub title: String,
    pub message: String,
    pub severity: String,
}

/// Navigation a thin client performs after a successful share.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-navigation-response.ts"
)]
pub struct ShareNavigationResponse {
    pub record_id: String,
    pub mode: String,
}

/// Response for a created grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-share-grant-response.ts"
)]
pub struct CreateShareGrantResponse {
    pub grant_id: String,
    pub status: String,
    pub grant: ShareGrantResponse,
    pub notification: ShareNotificationResponse,
    pub navigation: Option<ShareNavigationResponse>,
}

/// Access a grantee currently holds on a resource.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-access-response.ts"
)]
pub struct EffectiveAccessResponse {
    pub resource_id: String,
    pub grantee_id: String,
    pub access_level: Option<String>,
    pub can_read: bool,
    pub can_edit: bool,
}
