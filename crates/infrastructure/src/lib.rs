//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_grant_repository;
mod postgres_authorization_repository;
mod postgres_grant_repository;
mod postgres_share_audit_repository;

pub use in_memory_grant_repository::InMemoryGrantRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_grant_repository::PostgresGrantRepository;
pub use postgres_share_audit_repository::PostgresShareAuditRepository;
