use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::dto::pagination::Page;
use crate::application::error::AppResult;
use crate::application::use_cases::documents::list_user_documents::ListUserDocuments;
use crate::application::use_cases::users::delete_user::DeleteUser;
use crate::application::use_cases::users::get_user::GetUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::search_users::SearchUsers;
use crate::application::use_cases::users::update_user::{
    UpdateUser, UpdateUserRequest as UpdateDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{self, Bearer, MessageResponse, UserResponse, authenticate};
use crate::presentation::http::documents::DocumentListResponse;
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::paging::{PageMetadata, PageQuery, SearchMetadata, SearchQuery};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSearchResponse {
    pub result: Vec<UserResponse>,
    pub metadata: SearchMetadata,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only admins may change roles.
    pub role_id: Option<i16>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateUserResponse {
    pub message: String,
    pub data: UserResponse,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users).post(auth::register))
        .route("/users/search", get(search_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/documents", get(list_user_documents))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users", tag = "Users",
    params(("limit" = Option<i64>, Query, description = "Page size, at most 100"),
           ("offset" = Option<i64>, Query, description = "Rows to skip")),
    responses((status = 200, body = UserListResponse), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppQuery(q): AppQuery<PageQuery>,
) -> AppResult<Json<UserListResponse>> {
    authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let page = uc.execute(Page::from(q)).await?;
    Ok(Json(UserListResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        metadata: PageMetadata {
            count: page.total,
            limit: page.page.limit,
            offset: page.page.offset,
        },
    }))
}

#[utoipa::path(get, path = "/api/users/search", tag = "Users",
    params(("q" = Option<String>, Query, description = "Full-name fragment"),
           ("limit" = Option<i64>, Query, description = "Max results, at most 100")),
    responses((status = 200, body = UserSearchResponse), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn search_users(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppQuery(q): AppQuery<SearchQuery>,
) -> AppResult<Json<UserSearchResponse>> {
    authenticate(&ctx, bearer).await?;
    let term = q.q.unwrap_or_default();
    let limit = Page::new(q.limit, None).limit;
    let repo = ctx.user_repo();
    let uc = SearchUsers {
        repo: repo.as_ref(),
    };
    let result: Vec<UserResponse> = uc
        .execute(&term, limit)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(UserSearchResponse {
        metadata: SearchMetadata {
            count: result.len(),
            search_term: term,
        },
        result,
    }))
}

#[utoipa::path(get, path = "/api/users/{identifier}", tag = "Users",
    params(("identifier" = String, Path, description = "Numeric id, email or username")),
    responses((status = 200, body = UserResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(identifier): AppPath<String>,
) -> AppResult<Json<UserResponse>> {
    authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&identifier).await?.into()))
}

#[utoipa::path(put, path = "/api/users/{id}", tag = "Users", request_body = UpdateUserRequest,
    params(("id" = i64, Path, description = "User ID")),
    responses((status = 200, body = UpdateUserResponse), (status = 403, body = crate::presentation::http::error::ErrorBody),
              (status = 404, body = crate::presentation::http::error::ErrorBody), (status = 409, body = crate::presentation::http::error::ErrorBody)))]
pub async fn update_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UpdateUserResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = UpdateUser {
        repo: repo.as_ref(),
    };
    let dto = UpdateDto {
        username: req.username,
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        role_id: req.role_id,
    };
    let user = uc.execute(&session.requester(), id, &dto).await?;
    Ok(Json(UpdateUserResponse {
        message: format!("{id} updated"),
        data: user.into(),
    }))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses((status = 200, body = MessageResponse), (status = 403, body = crate::presentation::http::error::ErrorBody), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.user_repo();
    let uc = DeleteUser {
        repo: repo.as_ref(),
    };
    uc.execute(&session.requester(), id).await?;
    Ok(Json(MessageResponse {
        message: format!("{id} has been deleted"),
    }))
}

#[utoipa::path(get, path = "/api/users/{id}/documents", tag = "Users",
    params(("id" = i64, Path, description = "Owner ID"),
           ("limit" = Option<i64>, Query, description = "Page size, at most 100"),
           ("offset" = Option<i64>, Query, description = "Rows to skip")),
    responses((status = 200, body = DocumentListResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn list_user_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
    AppQuery(q): AppQuery<PageQuery>,
) -> AppResult<Json<DocumentListResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let users = ctx.user_repo();
    let documents = ctx.document_repo();
    let uc = ListUserDocuments {
        users: users.as_ref(),
        documents: documents.as_ref(),
    };
    let page = uc
        .execute(&session.requester(), id, Page::from(q))
        .await?;
    Ok(Json(page.into()))
}
