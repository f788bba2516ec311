mod common;
mod sharing;

pub use common::{HealthDependencyStatus, HealthResponse};
pub use sharing::{
    CreateShareGrantRequest, CreateShareGrantResponse, EffectiveAccessResponse,
    RevokeShareGrantRequest, ShareGrantResponse, ShareNavigationResponse,
    ShareNotificationResponse,
};

#[cfg(test)]
mod tests {
    use super::{
        CreateShareGrantRequest, CreateShareGrantResponse, EffectiveAccessResponse,
        HealthDependencyStatus, HealthResponse, RevokeShareGrantRequest, ShareGrantResponse,
        ShareNavigationResponse, ShareNotificationResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        CreateShareGrantRequest::export(&config)?;
        RevokeShareGrantRequest::export(&config)?;
        ShareGrantResponse::export(&config)?;
        ShareNotificationResponse::export(&config)?;
        ShareNavigationResponse::export(&config)?;
        CreateShareGrantResponse::export(&config)?;
        EffectiveAccessResponse::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
