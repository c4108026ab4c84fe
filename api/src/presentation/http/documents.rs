use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::access::DocumentAccess;
use crate::application::dto::documents::DocumentView;
use crate::application::dto::pagination::{Page, Paged};
use crate::application::error::AppResult;
use crate::application::use_cases::documents::create_document::{
    CreateDocument, CreateDocumentRequest as CreateDto,
};
use crate::application::use_cases::documents::delete_document::DeleteDocument;
use crate::application::use_cases::documents::get_document::GetDocument;
use crate::application::use_cases::documents::list_documents::ListDocuments;
use crate::application::use_cases::documents::search_documents::SearchDocuments;
use crate::application::use_cases::documents::update_document::{
    UpdateDocument, UpdateDocumentRequest as UpdateDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::Permission;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::paging::{PageMetadata, PageQuery, SearchMetadata, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentPermission {
    Public,
    Private,
}

impl From<Permission> for DocumentPermission {
    fn from(p: Permission) -> Self {
        match p {
            Permission::Public => DocumentPermission::Public,
            Permission::Private => DocumentPermission::Private,
        }
    }
}

impl From<DocumentPermission> for Permission {
    fn from(p: DocumentPermission) -> Self {
        match p {
            DocumentPermission::Public => Permission::Public,
            DocumentPermission::Private => Permission::Private,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAccessResponse {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<DocumentAccess> for DocumentAccessResponse {
    fn from(a: DocumentAccess) -> Self {
        DocumentAccessResponse {
            can_view: a.can_view,
            can_edit: a.can_edit,
            can_delete: a.can_delete,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub permission: DocumentPermission,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access: DocumentAccessResponse,
}

impl From<DocumentView> for DocumentResponse {
    fn from(v: DocumentView) -> Self {
        let d = v.document;
        DocumentResponse {
            id: d.id,
            owner_id: d.owner_id,
            title: d.title,
            content: d.content,
            permission: d.permission.into(),
            created_at: d.created_at,
            updated_at: d.updated_at,
            access: v.access.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub items: Vec<DocumentResponse>,
    pub metadata: PageMetadata,
}

impl From<Paged<DocumentView>> for DocumentListResponse {
    fn from(p: Paged<DocumentView>) -> Self {
        DocumentListResponse {
            items: p.items.into_iter().map(Into::into).collect(),
            metadata: PageMetadata {
                count: p.total,
                limit: p.page.limit,
                offset: p.page.offset,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentSearchResponse {
    pub result: Vec<DocumentResponse>,
    pub metadata: SearchMetadata,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: Option<String>,
    /// Defaults to `private`.
    pub permission: Option<DocumentPermission>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub permission: Option<DocumentPermission>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/search", get(search_documents))
        .route(
            "/documents/:id",
            get(get_document)
                .put(update_document)
                .patch(update_document)
                .delete(delete_document),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/documents", tag = "Documents",
    params(("limit" = Option<i64>, Query, description = "Page size, at most 100"),
           ("offset" = Option<i64>, Query, description = "Rows to skip")),
    responses((status = 200, body = DocumentListResponse), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn list_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppQuery(q): AppQuery<PageQuery>,
) -> AppResult<Json<DocumentListResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.document_repo();
    let uc = ListDocuments {
        repo: repo.as_ref(),
    };
    let page = uc.execute(&session.requester(), Page::from(q)).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(get, path = "/api/documents/search", tag = "Documents",
    params(("q" = Option<String>, Query, description = "Title fragment"),
           ("limit" = Option<i64>, Query, description = "Max results, at most 100")),
    responses((status = 200, body = DocumentSearchResponse), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn search_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppQuery(q): AppQuery<SearchQuery>,
) -> AppResult<Json<DocumentSearchResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let term = q.q.unwrap_or_default();
    let limit = Page::new(q.limit, None).limit;
    let repo = ctx.document_repo();
    let uc = SearchDocuments {
        repo: repo.as_ref(),
    };
    let hits = uc.execute(&session.requester(), &term, limit).await?;
    let result: Vec<DocumentResponse> = hits.into_iter().map(Into::into).collect();
    Ok(Json(DocumentSearchResponse {
        metadata: SearchMetadata {
            count: result.len(),
            search_term: term,
        },
        result,
    }))
}

#[utoipa::path(post, path = "/api/documents", tag = "Documents", request_body = CreateDocumentRequest,
    responses((status = 201, body = DocumentResponse), (status = 400, body = crate::presentation::http::error::ErrorBody), (status = 401, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppJson(req): AppJson<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<DocumentResponse>)> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.document_repo();
    let uc = CreateDocument {
        repo: repo.as_ref(),
    };
    let dto = CreateDto {
        title: req.title,
        content: req.content,
        permission: req.permission.map(Into::into),
    };
    let view = uc.execute(&session.requester(), &dto).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(get, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    responses((status = 200, body = DocumentResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<DocumentResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.document_repo();
    let uc = GetDocument {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&session.requester(), id).await?.into()))
}

#[utoipa::path(put, path = "/api/documents/{id}", tag = "Documents", request_body = UpdateDocumentRequest,
    params(("id" = i64, Path, description = "Document ID")),
    responses((status = 200, body = DocumentResponse), (status = 403, body = crate::presentation::http::error::ErrorBody), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn update_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateDocumentRequest>,
) -> AppResult<Json<DocumentResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.document_repo();
    let uc = UpdateDocument {
        repo: repo.as_ref(),
    };
    let dto = UpdateDto {
        title: req.title,
        content: req.content,
        permission: req.permission.map(Into::into),
    };
    Ok(Json(uc.execute(&session.requester(), id, &dto).await?.into()))
}

#[utoipa::path(delete, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = i64, Path, description = "Document ID")),
    responses((status = 204), (status = 403, body = crate::presentation::http::error::ErrorBody), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn delete_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    let session = authenticate(&ctx, bearer).await?;
    let repo = ctx.document_repo();
    let uc = DeleteDocument {
        repo: repo.as_ref(),
    };
    uc.execute(&session.requester(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
