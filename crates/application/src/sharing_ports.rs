use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recshare_core::{AppResult, TenantId};
use recshare_domain::{Grant, GrantId, GrantRevocation, GrantStatus};

/// Caller request for one grant, staged right before the service call.
///
/// Values are raw caller input; the service owns validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGrantRequest {
    /// Shared resource identifier.
    pub resource_id: Option<String>,
    /// Principal receiving access.
    pub grantee_id: Option<String>,
    /// Access level label; `None` selects `Read`.
    pub access_level: Option<String>,
    /// Expiry as RFC 3339 timestamp or `YYYY-MM-DD` date.
    pub expires_at: Option<String>,
}

/// Creation marker returned for a new grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantCreationStatus {
    /// The grant was persisted.
    Created,
}

impl GrantCreationStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
        }
    }
}

/// Result of a successful grant creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantCreated {
    /// Identifier of the new grant.
    pub grant_id: GrantId,
    /// Creation marker.
    pub status: GrantCreationStatus,
    /// Persisted grant.
    pub grant: Grant,
}

/// Grant projection with status evaluated at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantView {
    /// Stored grant.
    pub grant: Grant,
    /// Lifecycle state when read.
    pub status: GrantStatus,
}

impl GrantView {
    /// Projects a grant at `now`.
    #[must_use]
    pub fn at(grant: Grant, now: DateTime<Utc>) -> Self {
        let status = grant.status_at(now);
        Self { grant, status }
    }
}

/// Query parameters for grant listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantQuery {
    /// Optional resource filter.
    pub resource_id: Option<String>,
    /// Optional grantee filter.
    pub grantee_id: Option<String>,
    /// Whether to return only active (non-revoked, non-expired) grants.
    pub active_only: bool,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for pagination.
    pub offset: usize,
}

impl GrantQuery {
    /// Upper bound for one page.
    pub const MAX_LIMIT: usize = 200;
    /// Upper bound for the pagination offset.
    pub const MAX_OFFSET: usize = 5_000;

    /// Returns the query with blank filters dropped and paging clamped.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            resource_id: non_blank(self.resource_id),
            grantee_id: non_blank(self.grantee_id),
            active_only: self.active_only,
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            offset: self.offset.min(Self::MAX_OFFSET),
        }
    }
}

impl Default for GrantQuery {
    fn default() -> Self {
        Self {
            resource_id: None,
            grantee_id: None,
            active_only: false,
            limit: 50,
            offset: 0,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Repository port for durable grant storage.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Persists a new grant.
    ///
    /// Returns `AppError::Conflict` when a grant for the same resource and
    /// grantee is active at the new grant's creation time. The check and the
    /// write are atomic with respect to concurrent inserts.
    async fn insert_grant(&self, tenant_id: TenantId, grant: &Grant) -> AppResult<()>;

    /// Finds one grant by identifier.
    async fn find_grant(&self, tenant_id: TenantId, grant_id: GrantId)
    -> AppResult<Option<Grant>>;

    /// Finds the grant active at `now` for a resource and grantee.
    async fn find_active_grant(
        &self,
        tenant_id: TenantId,
        resource_id: &str,
        grantee_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Grant>>;

    /// Lists grants newest first.
    async fn list_grants(
        &self,
        tenant_id: TenantId,
        query: GrantQuery,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Grant>>;

    /// Revokes a grant that is active at `revocation.revoked_at`.
    ///
    /// Returns `AppError::NotFound` when no such active grant exists.
    async fn revoke_grant(
        &self,
        tenant_id: TenantId,
        grant_id: GrantId,
        revocation: GrantRevocation,
    ) -> AppResult<()>;

    /// Marks every grant whose expiry is at or before `now` as expired.
    ///
    /// Returns the number of grants transitioned.
    async fn expire_grants(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::GrantQuery;

    #[test]
    fn normalized_query_clamps_paging_and_drops_blank_filters() {
        let query = GrantQuery {
            resource_id: Some("  ".to_owned()),
            grantee_id: Some(" u2 ".to_owned()),
            active_only: true,
            limit: 0,
            offset: 1_000_000,
        }
        .normalized();

        assert_eq!(query.resource_id, None);
        assert_eq!(query.grantee_id.as_deref(), Some("u2"));
        assert_eq!(query.limit, 1);
        assert_eq!(query.offset, GrantQuery::MAX_OFFSET);

        let capped = GrantQuery {
            limit: 10_000,
            ..GrantQuery::default()
        }
        .normalized();
        assert_eq!(capped.limit, GrantQuery::MAX_LIMIT);
    }
}
