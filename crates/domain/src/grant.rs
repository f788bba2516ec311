use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use recshare_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccessLevel, GrantError, GrantStatus};

/// Unique identifier for a grant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId(Uuid);

impl GrantId {
    /// Creates a new random grant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a grant identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GrantId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for GrantId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid grant_id '{value}'")))
    }
}

/// Administrative revocation details of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRevocation {
    /// Subject that revoked the grant.
    pub revoked_by: String,
    /// Revocation timestamp.
    pub revoked_at: DateTime<Utc>,
    /// Optional justification.
    pub reason: Option<String>,
}

/// Durable authorization for a grantee to access a resource until expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    grant_id: GrantId,
    resource_id: NonEmptyString,
    grantee_id: NonEmptyString,
    access_level: AccessLevel,
    created_by: NonEmptyString,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revocation: Option<GrantRevocation>,
}

impl Grant {
    /// Issues a new grant created at `created_at`.
    ///
    /// Fails with [`GrantError::InvalidExpiry`] unless `expires_at` is
    /// strictly after `created_at`.
    pub fn issue(
        resource_id: NonEmptyString,
        grantee_id: NonEmptyString,
        access_level: AccessLevel,
        created_by: NonEmptyString,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, GrantError> {
        if expires_at <= created_at {
            return Err(GrantError::InvalidExpiry(format!(
                "expiry '{}' must be after creation time '{}'",
                expires_at.to_rfc3339(),
                created_at.to_rfc3339()
            )));
        }

        Ok(Self {
            grant_id: GrantId::new(),
            resource_id,
            grantee_id,
            access_level,
            created_by,
            created_at,
            expires_at,
            revocation: None,
        })
    }

    /// Rebuilds a grant from persisted values.
    pub fn restore(
        grant_id: GrantId,
        resource_id: impl Into<String>,
        grantee_id: impl Into<String>,
        access_level: AccessLevel,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if expires_at <= created_at {
            return Err(AppError::Validation(format!(
                "stored grant '{grant_id}' expires before it was created"
            )));
        }

        Ok(Self {
            grant_id,
            resource_id: NonEmptyString::new(resource_id)?,
            grantee_id: NonEmptyString::new(grantee_id)?,
            access_level,
            created_by: NonEmptyString::new(created_by)?,
            created_at,
            expires_at,
            revocation: None,
        })
    }

    /// Attaches persisted revocation details.
    #[must_use]
    pub fn with_revocation(mut self, revocation: Option<GrantRevocation>) -> Self {
        self.revocation = revocation;
        self
    }

    /// Returns the grant identifier.
    #[must_use]
    pub fn grant_id(&self) -> GrantId {
        self.grant_id
    }

    /// Returns the shared resource identifier.
    #[must_use]
    pub fn resource_id(&self) -> &NonEmptyString {
        &self.resource_id
    }

    /// Returns the grantee identifier.
    #[must_use]
    pub fn grantee_id(&self) -> &NonEmptyString {
        &self.grantee_id
    }

    /// Returns the granted access level.
    #[must_use]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Returns the subject that created the grant.
    #[must_use]
    pub fn created_by(&self) -> &NonEmptyString {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns revocation details, when revoked.
    #[must_use]
    pub fn revocation(&self) -> Option<&GrantRevocation> {
        self.revocation.as_ref()
    }

    /// Evaluates the lifecycle state at `now`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> GrantStatus {
        if self.revocation.is_some() {
            return GrantStatus::Revoked;
        }

        if now >= self.expires_at {
            return GrantStatus::Expired;
        }

        GrantStatus::Active
    }

    /// Returns whether the grant is in force at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == GrantStatus::Active
    }

    /// Returns whether the grant targets the given resource and grantee.
    #[must_use]
    pub fn covers(&self, resource_id: &str, grantee_id: &str) -> bool {
        self.resource_id.as_str() == resource_id && self.grantee_id.as_str() == grantee_id
    }

    /// Transitions an active grant to revoked.
    pub fn revoke(
        &mut self,
        revoked_by: &str,
        revoked_at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> AppResult<()> {
        if !self.is_active_at(revoked_at) {
            return Err(AppError::NotFound(format!(
                "grant '{}' was not found or is no longer active",
                self.grant_id
            )));
        }

        self.revocation = Some(GrantRevocation {
            revoked_by: revoked_by.to_owned(),
            revoked_at,
            reason: reason.map(str::to_owned),
        });

        Ok(())
    }
}

/// Parses a caller-supplied expiry and requires it to be after `now`.
///
/// Accepts an RFC 3339 timestamp or a `YYYY-MM-DD` calendar date. A calendar
/// date covers that whole day: the grant expires at midnight UTC that ends it.
pub fn parse_expiry(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, GrantError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GrantError::MissingExpiry);
    }

    let expires_at = parse_timestamp(trimmed).ok_or_else(|| {
        GrantError::InvalidExpiry(format!(
            "'{trimmed}' is not an RFC 3339 timestamp or YYYY-MM-DD date"
        ))
    })?;

    if expires_at <= now {
        return Err(GrantError::InvalidExpiry(format!(
            "expiry '{trimmed}' must be in the future"
        )));
    }

    Ok(expires_at)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.succ_opt())
        .and_then(|next_day| next_day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use recshare_core::NonEmptyString;

    use super::{Grant, parse_expiry};
    use crate::{AccessLevel, GrantErrorKind, GrantStatus};

    fn text(value: &str) -> NonEmptyString {
        NonEmptyString::new(value).unwrap_or_else(|_| unreachable!())
    }

    fn issue_grant(expires_in: Duration) -> Grant {
        let created_at = Utc::now();
        Grant::issue(
            text("res-42"),
            text("u2"),
            AccessLevel::Read,
            text("u1"),
            created_at,
            created_at + expires_in,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn issue_requires_expiry_after_creation() {
        let created_at = Utc::now();
        let result = Grant::issue(
            text("res-42"),
            text("u2"),
            AccessLevel::Edit,
            text("u1"),
            created_at,
            created_at,
        );
        assert!(matches!(result, Err(error) if error.kind() == GrantErrorKind::InvalidExpiry));
    }

    #[test]
    fn status_moves_to_expired_once_expiry_passes() {
        let grant = issue_grant(Duration::hours(1));
        let created_at = grant.created_at();

        assert_eq!(grant.status_at(created_at), GrantStatus::Active);
        assert_eq!(
            grant.status_at(created_at + Duration::minutes(59)),
            GrantStatus::Active
        );
        assert_eq!(
            grant.status_at(grant.expires_at()),
            GrantStatus::Expired
        );
    }

    #[test]
    fn revoke_sets_revoked_status_and_rejects_second_revoke() {
        let mut grant = issue_grant(Duration::days(1));
        let now = grant.created_at() + Duration::minutes(5);

        assert!(grant.revoke("admin", now, Some("left project")).is_ok());
        assert_eq!(grant.status_at(now), GrantStatus::Revoked);
        assert_eq!(
            grant.revocation().and_then(|value| value.reason.clone()),
            Some("left project".to_owned())
        );
        assert!(grant.revoke("admin", now, None).is_err());
    }

    #[test]
    fn expired_grant_cannot_be_revoked() {
        let mut grant = issue_grant(Duration::minutes(1));
        let later = grant.expires_at() + Duration::seconds(1);
        assert!(grant.revoke("admin", later, None).is_err());
    }

    #[test]
    fn calendar_date_expires_at_end_of_day() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).single();
        let now = now.unwrap_or_else(|| unreachable!());

        let expires_at = parse_expiry("2026-10-19", now);
        assert_eq!(
            expires_at.ok(),
            Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).single()
        );

        let same_day = parse_expiry("2026-10-18", now);
        assert!(same_day.is_ok());
    }

    #[test]
    fn yesterday_is_an_invalid_expiry() {
        let now = Utc::now();
        let yesterday = (now - Duration::days(1)).format("%Y-%m-%d").to_string();

        let result = parse_expiry(yesterday.as_str(), now);
        assert!(matches!(result, Err(error) if error.kind() == GrantErrorKind::InvalidExpiry));
    }

    #[test]
    fn rfc3339_with_offset_is_normalized_to_utc() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single();
        let now = now.unwrap_or_else(|| unreachable!());

        let parsed = parse_expiry("2026-01-02T02:00:00+02:00", now);
        assert_eq!(
            parsed.ok(),
            Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).single()
        );
    }

    #[test]
    fn blank_expiry_is_missing() {
        let result = parse_expiry("   ", Utc::now());
        assert!(matches!(result, Err(error) if error.kind() == GrantErrorKind::MissingExpiry));
    }

    #[test]
    fn garbage_expiry_is_invalid() {
        let result = parse_expiry("next tuesday", Utc::now());
        assert!(matches!(result, Err(error) if error.kind() == GrantErrorKind::InvalidExpiry));
    }

    proptest! {
        #[test]
        fn past_timestamps_are_always_rejected(seconds_ago in 0_i64..10_000_000) {
            let now = Utc::now();
            let value = (now - Duration::seconds(seconds_ago)).to_rfc3339();
            let result = parse_expiry(value.as_str(), now);
            prop_assert!(matches!(result, Err(error) if error.kind() == GrantErrorKind::InvalidExpiry));
        }

        #[test]
        fn future_timestamps_are_accepted(seconds_ahead in 1_i64..10_000_000) {
            let now = Utc::now();
            let expected = now + Duration::seconds(seconds_ahead);
            let result = parse_expiry(expected.to_rfc3339().as_str(), now);
            prop_assert_eq!(result.ok(), Some(expected));
        }
    }
}
