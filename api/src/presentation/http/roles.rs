use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::error::AppResult;
use crate::application::use_cases::roles::list_roles::ListRoles;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{Bearer, authenticate};

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: i16,
    pub title: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/roles", get(list_roles))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/roles", tag = "Roles",
    responses((status = 200, body = [RoleResponse]), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn list_roles(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> AppResult<Json<Vec<RoleResponse>>> {
    authenticate(&ctx, bearer).await?;
    let repo = ctx.role_repo();
    let uc = ListRoles {
        repo: repo.as_ref(),
    };
    let roles = uc
        .execute()
        .await?
        .into_iter()
        .map(|r| RoleResponse {
            id: r.id,
            title: r.title,
        })
        .collect();
    Ok(Json(roles))
}
