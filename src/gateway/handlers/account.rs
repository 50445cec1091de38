//! Account handlers

use std::sync::Arc;

use axum::{Extension, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use crate::account::AccountView;
use crate::auth::Claims;

/// Profile of the authenticated caller
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileData {
    #[schema(example = "alice")]
    pub login: String,
    pub account: AccountView,
}

/// Get the caller's account profile
///
/// GET /api/v1/accounts/profile
///
/// Served from the profile cache when fresh; the cache is cleared after
/// every transfer and balance reset.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/profile",
    responses(
        (status = 200, description = "Caller's profile", body = ProfileData, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Account"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<ProfileData> {
    let account_id = claims.account_id();

    let account = match state.profiles.get(&account_id) {
        Some(view) => {
            tracing::debug!(%account_id, "[cache] Profile hit");
            view
        }
        None => {
            let epoch = state.profiles.epoch();
            let account = state
                .store
                .find_by_id(account_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Account not found"))?;
            let view = AccountView::from(&account);
            state.profiles.put_if_current(view.clone(), epoch);
            view
        }
    };

    ok(ProfileData {
        login: claims.login,
        account,
    })
}
