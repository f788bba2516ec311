use std::fmt::{Display, Formatter};
use std::str::FromStr;

use recshare_core::AppError;
use serde::{Deserialize, Serialize};

use crate::GrantError;

/// Permission tier carried by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Grantee may read the resource.
    Read,
    /// Grantee may read and edit the resource.
    Edit,
}

impl AccessLevel {
    /// Returns a stable storage value for this access level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Edit => "edit",
        }
    }

    /// Returns the display label shown to callers.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Edit => "Edit",
        }
    }

    /// Returns all known access levels.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessLevel] = &[AccessLevel::Read, AccessLevel::Edit];

        ALL
    }

    /// Returns whether this level covers an operation needing `required`.
    ///
    /// `Edit` implies `Read`.
    #[must_use]
    pub fn allows(&self, required: AccessLevel) -> bool {
        *self >= required
    }

    /// Parses a transport value, matching labels case-insensitively.
    pub fn from_transport(value: &str) -> Result<Self, GrantError> {
        let trimmed = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|level| trimmed.eq_ignore_ascii_case(level.as_str()))
            .ok_or_else(|| GrantError::InvalidAccessLevel(value.to_owned()))
    }
}

impl Display for AccessLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

impl FromStr for AccessLevel {
    type Err = GrantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_transport(value)
    }
}

/// Lifecycle state of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    /// Grant is in force.
    Active,
    /// Expiry has passed.
    Expired,
    /// Grant was revoked by an administrator.
    Revoked,
}

impl GrantStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl FromStr for GrantStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "revoked" => Ok(Self::Revoked),
            _ => Err(AppError::Validation(format!(
                "unknown grant status '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{AccessLevel, GrantStatus};
    use crate::GrantErrorKind;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(AccessLevel::from_transport("Read").ok(), Some(AccessLevel::Read));
        assert_eq!(AccessLevel::from_transport("EDIT").ok(), Some(AccessLevel::Edit));
        assert_eq!(AccessLevel::from_transport(" edit ").ok(), Some(AccessLevel::Edit));
    }

    #[test]
    fn write_is_not_an_access_level() {
        let parsed = AccessLevel::from_transport("Write");
        assert!(
            matches!(parsed, Err(error) if error.kind() == GrantErrorKind::InvalidAccessLevel)
        );
    }

    #[test]
    fn edit_implies_read() {
        assert!(AccessLevel::Edit.allows(AccessLevel::Read));
        assert!(AccessLevel::Edit.allows(AccessLevel::Edit));
        assert!(AccessLevel::Read.allows(AccessLevel::Read));
        assert!(!AccessLevel::Read.allows(AccessLevel::Edit));
    }

    #[test]
    fn status_storage_value_roundtrip() {
        for status in [GrantStatus::Active, GrantStatus::Expired, GrantStatus::Revoked] {
            assert_eq!(GrantStatus::from_str(status.as_str()).ok(), Some(status));
        }
        assert!(GrantStatus::from_str("pending").is_err());
    }

    proptest! {
        #[test]
        fn only_read_and_edit_parse(value in "\\PC{0,12}") {
            let parsed = AccessLevel::from_transport(value.as_str());
            let trimmed = value.trim();
            let expected_valid = trimmed.eq_ignore_ascii_case("read")
                || trimmed.eq_ignore_ascii_case("edit");
            prop_assert_eq!(parsed.is_ok(), expected_valid);
        }

        #[test]
        fn invalid_levels_keep_the_raw_value(value in "[A-Za-z]{5,10}") {
            if let Err(error) = AccessLevel::from_transport(value.as_str()) {
                prop_assert!(error.to_string().contains(value.as_str()));
            }
        }
    }
}
