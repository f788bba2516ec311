use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;

use recshare_application::{CreateGrantRequest, GrantQuery, ShareOutcome};
use recshare_core::UserIdentity;

use crate::dto::{
    CreateShareGrantRequest, CreateShareGrantResponse, EffectiveAccessResponse,
    RevokeShareGrantRequest, ShareGrantResponse,
};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiJsonOrDefault, ApiPath, ApiQuery};
use crate::state::AppState;


#[derive(Debug, serde::Deserialize)]
pub struct ShareGrantListQuery {
    pub resource_id: Option<String>,
    pub grantee_id: Option<String>,
    pub active_only: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn create_grant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreateShareGrantRequest>,
) -> ApiResult<(StatusCode, Json<CreateShareGrantResponse>)> {
    let record_id = payload
        .resource_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();

    let result = state
        .sharing_service
        .create_grant(
            &user,
            CreateGrantRequest {
                resource_id: payload.resource_id,
                grantee_id: payload.grantee_id,
                access_level: payload.access_level,
                expires_at: payload.expires_at,
            },
        )
        .await;
    let outcome = ShareOutcome::from_result(record_id.as_str(), &result);
    let created = result?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShareGrantResponse::new(created, outcome)),
    ))
}

pub async fn list_grants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiQuery(query): ApiQuery<ShareGrantListQuery>,
) -> ApiResult<Json<Vec<ShareGrantResponse>>> {
    let defaults = GrantQuery::default();
    let grants = state
        .sharing_service
        .list_grants(
            &user,
            GrantQuery {
                resource_id: query.resource_id,
                grantee_id: query.grantee_id,
                active_only: query.active_only.unwrap_or(defaults.active_only),
                limit: query.limit.unwrap_or(defaults.limit),
                offset: query.offset.unwrap_or(defaults.offset),
            },
        )
        .await?
        .into_iter()
        .map(ShareGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn get_grant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiPath(grant_id): ApiPath<String>,
) -> ApiResult<Json<ShareGrantResponse>> {
    let grant = state
        .sharing_service
        .get_grant(&user, grant_id.as_str())
        .await?;

    Ok(Json(ShareGrantResponse::from(grant)))
}

pub async fn revoke_grant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiPath(grant_id): ApiPath<String>,
    ApiJsonOrDefault(payload): ApiJsonOrDefault<RevokeShareGrantRequest>,
) -> ApiResult<StatusCode> {
    state
        .sharing_service
        .revoke_grant(&user, grant_id.as_str(), payload.revoke_reason.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn effective_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiPath((resource_id, grantee_id)): ApiPath<(String, String)>,
) -> ApiResult<Json<EffectiveAccessResponse>> {
    let level = state
        .sharing_service
        .effective_access(&user, resource_id.as_str(), grantee_id.as_str())
        .await?;

    Ok(Json(EffectiveAccessResponse::new(
        resource_id,
        grantee_id,
        level,
    )))
}
