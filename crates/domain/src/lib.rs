//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod error;
mod grant;
mod security;

pub use access::{AccessLevel, GrantStatus};
pub use error::{GrantError, GrantErrorKind, GrantResult};
pub use grant::{Grant, GrantId, GrantRevocation, parse_expiry};
pub use security::{AuditAction, Permission};
