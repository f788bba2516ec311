mod conversions;
mod types;

pub use types::{
    CreateShareGrantRequest, CreateShareGrantResponse, EffectiveAccessResponse,
    RevokeShareGrantRequest, ShareGrantResponse, ShareNavigationResponse,
    ShareNotificationResponse,
};
