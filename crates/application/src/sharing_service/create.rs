use chrono::{DateTime, Utc};
use recshare_core::{AppError, NonEmptyString};
use recshare_domain::{AccessLevel, Grant, GrantError, GrantResult, parse_expiry};
use tracing::{info, warn};

use crate::{CreateGrantRequest, GrantCreated, GrantCreationStatus};

use super::*;

/// Request that passed input validation.
#[derive(Debug)]
struct ValidatedGrantRequest {
    resource_id: NonEmptyString,
    grantee_id: NonEmptyString,
    access_level: AccessLevel,
    expires_at: DateTime<Utc>,
}

impl SharingService {
    /// Creates a grant for `request` on behalf of `actor`.
    ///
    /// Input is validated before the capability check, and nothing is
    /// persisted unless both pass.
    pub async fn create_grant(
        &self,
        actor: &UserIdentity,
        request: CreateGrantRequest,
    ) -> GrantResult<GrantCreated> {
        let now = Utc::now();
        let validated = validate_request(request, now)?;

        let requester = NonEmptyString::new(actor.subject())
            .map_err(|_| GrantError::Unauthorized("requester is required".to_owned()))?;
        self.require_permission(actor, Permission::RecordShare)
            .await
            .map_err(GrantError::from)?;

        let grant = Grant::issue(
            validated.resource_id,
            validated.grantee_id,
            validated.access_level,
            requester,
            now,
            validated.expires_at,
        )?;

        match self.repository.insert_grant(actor.tenant_id(), &grant).await {
            Ok(()) => {}
            Err(AppError::Conflict(_)) => {
                info!(
                    tenant_id = %actor.tenant_id(),
                    resource_id = %grant.resource_id(),
                    grantee_id = %grant.grantee_id(),
                    "rejected duplicate sharing grant"
                );
                return Err(GrantError::DuplicateGrant {
                    resource_id: grant.resource_id().as_str().to_owned(),
                    grantee_id: grant.grantee_id().as_str().to_owned(),
                });
            }
            Err(error) => {
                warn!(
                    tenant_id = %actor.tenant_id(),
                    resource_id = %grant.resource_id(),
                    error = %error,
                    "failed to persist sharing grant"
                );
                return Err(GrantError::PersistenceFailure(error.to_string()));
            }
        }

        info!(
            tenant_id = %actor.tenant_id(),
            grant_id = %grant.grant_id(),
            resource_id = %grant.resource_id(),
            grantee_id = %grant.grantee_id(),
            access_level = %grant.access_level(),
            expires_at = %grant.expires_at().to_rfc3339(),
            "sharing grant created"
        );

        Ok(GrantCreated {
            grant_id: grant.grant_id(),
            status: GrantCreationStatus::Created,
            grant,
        })
    }
}

/// Validates caller input, reporting the first violation.
fn validate_request(
    request: CreateGrantRequest,
    now: DateTime<Utc>,
) -> GrantResult<ValidatedGrantRequest> {
    let grantee_id = required(request.grantee_id, GrantError::MissingGrantee)?;
    let raw_expiry = required(request.expires_at, GrantError::MissingExpiry)?;
    let resource_id = required(request.resource_id, GrantError::MissingResource)?;

    let access_level = match request.access_level {
        Some(value) => AccessLevel::from_transport(value.as_str())?,
        None => AccessLevel::Read,
    };
    let expires_at = parse_expiry(raw_expiry.as_str(), now)?;

    Ok(ValidatedGrantRequest {
        resource_id,
        grantee_id,
        access_level,
        expires_at,
    })
}

fn required(value: Option<String>, missing: GrantError) -> GrantResult<NonEmptyString> {
    value
        .and_then(|value| NonEmptyString::new(value).ok())
        .ok_or(missing)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use recshare_domain::{AccessLevel, GrantErrorKind};

    use super::validate_request;
    use crate::CreateGrantRequest;

    fn complete_request() -> CreateGrantRequest {
        CreateGrantRequest {
            resource_id: Some("res-42".to_owned()),
            grantee_id: Some("u2".to_owned()),
            access_level: Some("Edit".to_owned()),
            expires_at: Some((Utc::now() + Duration::days(1)).to_rfc3339()),
        }
    }

    fn kind_of(request: CreateGrantRequest) -> Option<GrantErrorKind> {
        validate_request(request, Utc::now())
            .err()
            .map(|error| error.kind())
    }

    #[test]
    fn empty_request_reports_missing_grantee_first() {
        assert_eq!(
            kind_of(CreateGrantRequest::default()),
            Some(GrantErrorKind::MissingGrantee)
        );
    }

    #[test]
    fn missing_expiry_is_reported_before_missing_resource() {
        let request = CreateGrantRequest {
            resource_id: None,
            expires_at: None,
            ..complete_request()
        };
        assert_eq!(kind_of(request), Some(GrantErrorKind::MissingExpiry));
    }

    #[test]
    fn missing_resource_is_reported_before_invalid_access_level() {
        let request = CreateGrantRequest {
            resource_id: Some("   ".to_owned()),
            access_level: Some("Write".to_owned()),
            ..complete_request()
        };
        assert_eq!(kind_of(request), Some(GrantErrorKind::MissingResource));
    }

    #[test]
    fn invalid_access_level_is_reported_before_invalid_expiry() {
        let request = CreateGrantRequest {
            access_level: Some("Owner".to_owned()),
            expires_at: Some("yesterday".to_owned()),
            ..complete_request()
        };
        assert_eq!(kind_of(request), Some(GrantErrorKind::InvalidAccessLevel));
    }

    #[test]
    fn blank_access_level_is_invalid() {
        let request = CreateGrantRequest {
            access_level: Some(String::new()),
            ..complete_request()
        };
        assert_eq!(kind_of(request), Some(GrantErrorKind::InvalidAccessLevel));
    }

    #[test]
    fn absent_access_level_defaults_to_read() {
        let request = CreateGrantRequest {
            access_level: None,
            ..complete_request()
        };
        let validated = validate_request(request, Utc::now());
        assert!(matches!(validated, Ok(value) if value.access_level == AccessLevel::Read));
    }
}
