use std::str::FromStr;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use recshare_core::{AppError, TenantId, UserIdentity};
use subtle::ConstantTimeEq;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the caller subject asserted by the gateway.
pub const SUBJECT_HEADER: &str = "x-recshare-subject";
/// Header carrying the caller tenant asserted by the gateway.
pub const TENANT_HEADER: &str = "x-recshare-tenant";

/// Trusts the identity asserted by the upstream gateway once the gateway
/// proves itself with the shared bearer secret.
pub async fn require_gateway_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let headers = request.headers();

    let presented_secret = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    if !secret_matches(presented_secret, &state.gateway_shared_secret) {
        return Err(AppError::Unauthorized("invalid gateway credentials".to_owned()).into());
    }

    let subject = header_value(headers, SUBJECT_HEADER)
        .ok_or_else(|| AppError::Unauthorized("requester is required".to_owned()))?;
    let tenant_id = header_value(headers, TENANT_HEADER)
        .ok_or_else(|| AppError::Unauthorized("tenant is required".to_owned()))
        .and_then(|value| {
            TenantId::from_str(value)
                .map_err(|_| AppError::Unauthorized(format!("invalid tenant '{value}'")))
        })?;

    let identity = UserIdentity::new(subject, tenant_id);
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn secret_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::secret_matches;

    #[test]
    fn secret_comparison_requires_exact_match() {
        assert!(secret_matches("gateway-secret", "gateway-secret"));
        assert!(!secret_matches("gateway-secret", "gateway-secreT"));
        assert!(!secret_matches("gateway-secret", "gateway"));
        assert!(!secret_matches("", "gateway-secret"));
    }
}
