use recshare_core::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type returned by grant use-cases.
pub type GrantResult<T> = Result<T, GrantError>;

/// Failure reported by grant creation and administration.
///
/// Every variant renders a non-empty, human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantError {
    /// No grantee was supplied.
    #[error("grantee is required")]
    MissingGrantee,

    /// No expiry was supplied.
    #[error("expiry date is required")]
    MissingExpiry,

    /// No resource was supplied.
    #[error("resource is required")]
    MissingResource,

    /// The access level is not one of the enumerated values.
    #[error("access level '{0}' is not one of Read, Edit")]
    InvalidAccessLevel(String),

    /// The expiry is unparseable or not in the future.
    #[error("invalid expiry: {0}")]
    InvalidExpiry(String),

    /// An active grant already exists for the resource and grantee.
    #[error("resource '{resource_id}' is already shared with '{grantee_id}'")]
    DuplicateGrant {
        /// Shared resource identifier.
        resource_id: String,
        /// Grantee identifier.
        grantee_id: String,
    },

    /// The requester may not share the resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storage-layer fault.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl GrantError {
    /// Returns the stable kind of this failure.
    #[must_use]
    pub fn kind(&self) -> GrantErrorKind {
        match self {
            Self::MissingGrantee => GrantErrorKind::MissingGrantee,
            Self::MissingExpiry => GrantErrorKind::MissingExpiry,
            Self::MissingResource => GrantErrorKind::MissingResource,
            Self::InvalidAccessLevel(_) => GrantErrorKind::InvalidAccessLevel,
            Self::InvalidExpiry(_) => GrantErrorKind::InvalidExpiry,
            Self::DuplicateGrant { .. } => GrantErrorKind::DuplicateGrant,
            Self::Unauthorized(_) => GrantErrorKind::Unauthorized,
            Self::PersistenceFailure(_) => GrantErrorKind::PersistenceFailure,
        }
    }
}

impl From<AppError> for GrantError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized(message) | AppError::Forbidden(message) => {
                Self::Unauthorized(message)
            }
            AppError::Conflict(message) => Self::PersistenceFailure(message),
            other => Self::PersistenceFailure(other.to_string()),
        }
    }
}

/// Discriminant of [`GrantError`] used by callers to branch on outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantErrorKind {
    /// No grantee was supplied.
    MissingGrantee,
    /// No expiry was supplied.
    MissingExpiry,
    /// No resource was supplied.
    MissingResource,
    /// Access level outside the enumerated set.
    InvalidAccessLevel,
    /// Expiry unparseable or not in the future.
    InvalidExpiry,
    /// Active grant already exists for the pair.
    DuplicateGrant,
    /// Capability check failed.
    Unauthorized,
    /// Storage-layer fault.
    PersistenceFailure,
}

impl GrantErrorKind {
    /// Returns a stable transport code for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingGrantee => "missing_grantee",
            Self::MissingExpiry => "missing_expiry",
            Self::MissingResource => "missing_resource",
            Self::InvalidAccessLevel => "invalid_access_level",
            Self::InvalidExpiry => "invalid_expiry",
            Self::DuplicateGrant => "duplicate_grant",
            Self::Unauthorized => "unauthorized",
            Self::PersistenceFailure => "persistence_failure",
        }
    }

    /// Returns whether the kind is an input validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingGrantee
                | Self::MissingExpiry
                | Self::MissingResource
                | Self::InvalidAccessLevel
                | Self::InvalidExpiry
        )
    }
}
