//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod share_presentation;
mod sharing_ports;
mod sharing_service;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use share_presentation::{
    DisplayMode, Navigation, Notification, NotificationSeverity, REQUIRED_FIELDS_MESSAGE,
    ShareOutcome, ShareRecordForm,
};
pub use sharing_ports::{
    CreateGrantRequest, GrantCreated, GrantCreationStatus, GrantQuery, GrantRepository, GrantView,
};
pub use sharing_service::SharingService;
