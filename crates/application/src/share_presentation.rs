//! Caller-side contract of the share form.
//!
//! The form stages its inputs in a [`ShareRecordForm`], rejects obviously
//! incomplete input before calling the service, and turns the service result
//! into exactly one [`ShareOutcome`].

use recshare_core::UserIdentity;
use recshare_domain::{GrantErrorKind, GrantResult};
use serde::{Deserialize, Serialize};

use crate::{CreateGrantRequest, GrantCreated, SharingService};

/// Message shown when the form is submitted with blank required inputs.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

const SUCCESS_TITLE: &str = "Success";
const ERROR_TITLE: &str = "Error";
const CREATED_MESSAGE: &str = "Record Created Successfully!";
const ALREADY_SHARED_MESSAGE: &str = "Record is Already Shared";

/// Values collected by the share form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecordForm {
    /// Host record being shared.
    pub record_id: Option<String>,
    /// Selected user.
    pub grantee_id: Option<String>,
    /// Selected expiry date.
    pub expiry_date: Option<String>,
    /// Selected access level; the form preselects `Read`.
    pub access_level: Option<String>,
}

impl ShareRecordForm {
    /// Returns whether any required input is blank.
    #[must_use]
    pub fn missing_required(&self) -> bool {
        let blank = |value: &Option<String>| {
            value
                .as_deref()
                .is_none_or(|value| value.trim().is_empty())
        };

        blank(&self.record_id)
            || blank(&self.grantee_id)
            || blank(&self.expiry_date)
            || self
                .access_level
                .as_deref()
                .is_some_and(|value| value.trim().is_empty())
    }

    /// Converts the staged inputs into a service request.
    #[must_use]
    pub fn into_request(self) -> CreateGrantRequest {
        CreateGrantRequest {
            resource_id: self.record_id,
            grantee_id: self.grantee_id,
            access_level: self.access_level,
            expires_at: self.expiry_date,
        }
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// Notification the caller presents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short title.
    pub title: String,
    /// Human-readable message.
    pub message: String,
    /// Severity.
    pub severity: NotificationSeverity,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            title: SUCCESS_TITLE.to_owned(),
            message: message.to_owned(),
            severity: NotificationSeverity::Success,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_owned(),
            message: message.into(),
            severity: NotificationSeverity::Error,
        }
    }
}

/// Display mode of a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Read-only detail view.
    View,
}

/// Navigation the caller performs after notifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Record to open.
    pub record_id: String,
    /// How to open it.
    pub mode: DisplayMode,
}

/// Presentation of one share attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareOutcome {
    /// Notification to show.
    pub notification: Notification,
    /// Navigation to perform, only after success.
    pub navigation: Option<Navigation>,
}

impl ShareOutcome {
    /// Maps a service result onto the three caller outcomes.
    #[must_use]
    pub fn from_result(record_id: &str, result: &GrantResult<GrantCreated>) -> Self {
        match result {
            Ok(_) => Self {
                notification: Notification::success(CREATED_MESSAGE),
                navigation: Some(Navigation {
                    record_id: record_id.to_owned(),
                    mode: DisplayMode::View,
                }),
            },
            Err(error) if error.kind() == GrantErrorKind::DuplicateGrant => Self {
                notification: Notification::error(ALREADY_SHARED_MESSAGE),
                navigation: None,
            },
            Err(error) => Self {
                notification: Notification::error(error.to_string()),
                navigation: None,
            },
        }
    }

    /// Outcome for a form rejected before submission.
    #[must_use]
    pub fn incomplete_form() -> Self {
        Self {
            notification: Notification::error(REQUIRED_FIELDS_MESSAGE),
            navigation: None,
        }
    }

    /// Returns whether the attempt succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.notification.severity == NotificationSeverity::Success
    }
}

impl SharingService {
    /// Runs the full share-form flow: pre-check, one service call, outcome.
    pub async fn share_record(&self, actor: &UserIdentity, form: ShareRecordForm) -> ShareOutcome {
        if form.missing_required() {
            return ShareOutcome::incomplete_form();
        }

        let record_id = form
            .record_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();
        let result = self.create_grant(actor, form.into_request()).await;

        ShareOutcome::from_result(record_id.as_str(), &result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use recshare_core::NonEmptyString;
    use recshare_domain::{AccessLevel, Grant, GrantError};

    use super::{
        DisplayMode, NotificationSeverity, REQUIRED_FIELDS_MESSAGE, ShareOutcome, ShareRecordForm,
    };
    use crate::{GrantCreated, GrantCreationStatus};

    fn created() -> GrantCreated {
        let now = Utc::now();
        let text = |value: &str| NonEmptyString::new(value).unwrap_or_else(|_| unreachable!());
        let grant = Grant::issue(
            text("res-42"),
            text("u2"),
            AccessLevel::Read,
            text("u1"),
            now,
            now + Duration::days(1),
        )
        .unwrap_or_else(|_| unreachable!());

        GrantCreated {
            grant_id: grant.grant_id(),
            status: GrantCreationStatus::Created,
            grant,
        }
    }

    #[test]
    fn success_notifies_then_navigates_to_view() {
        let outcome = ShareOutcome::from_result("res-42", &Ok(created()));

        assert!(outcome.is_success());
        assert_eq!(outcome.notification.title, "Success");
        assert_eq!(outcome.notification.message, "Record Created Successfully!");
        let navigation = outcome.navigation.unwrap_or_else(|| unreachable!());
        assert_eq!(navigation.record_id, "res-42");
        assert_eq!(navigation.mode, DisplayMode::View);
    }

    #[test]
    fn duplicate_reports_already_shared() {
        let outcome = ShareOutcome::from_result(
            "res-42",
            &Err(GrantError::DuplicateGrant {
                resource_id: "res-42".to_owned(),
                grantee_id: "u2".to_owned(),
            }),
        );

        assert_eq!(outcome.notification.severity, NotificationSeverity::Error);
        assert_eq!(outcome.notification.message, "Record is Already Shared");
        assert!(outcome.navigation.is_none());
    }

    #[test]
    fn other_failures_show_their_message_verbatim() {
        let error = GrantError::InvalidAccessLevel("Write".to_owned());
        let expected = error.to_string();
        let outcome = ShareOutcome::from_result("res-42", &Err(error));

        assert_eq!(outcome.notification.title, "Error");
        assert_eq!(outcome.notification.message, expected);
        assert!(outcome.navigation.is_none());
    }

    #[test]
    fn form_requires_record_grantee_and_expiry() {
        let complete = ShareRecordForm {
            record_id: Some("res-42".to_owned()),
            grantee_id: Some("u2".to_owned()),
            expiry_date: Some("2030-01-01".to_owned()),
            access_level: None,
        };
        assert!(!complete.missing_required());

        let without_grantee = ShareRecordForm {
            grantee_id: Some(" ".to_owned()),
            ..complete.clone()
        };
        assert!(without_grantee.missing_required());

        let blank_level = ShareRecordForm {
            access_level: Some(String::new()),
            ..complete.clone()
        };
        assert!(blank_level.missing_required());

        assert_eq!(
            ShareOutcome::incomplete_form().notification.message,
            REQUIRED_FIELDS_MESSAGE
        );
    }

    #[test]
    fn form_binds_fields_to_request() {
        let request = ShareRecordForm {
            record_id: Some("res-42".to_owned()),
            grantee_id: Some("u2".to_owned()),
            expiry_date: Some("2030-01-01".to_owned()),
            access_level: Some("Edit".to_owned()),
        }
        .into_request();

        assert_eq!(request.resource_id.as_deref(), Some("res-42"));
        assert_eq!(request.grantee_id.as_deref(), Some("u2"));
        assert_eq!(request.expires_at.as_deref(), Some("2030-01-01"));
        assert_eq!(request.access_level.as_deref(), Some("Edit"));
    }
}
