use crate::application::access::Requester;
use crate::application::error::{AppError, AppResult};
use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::logout::Logout;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::User;
use crate::presentation::http::extract::AppJson;
use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ACCESS_COOKIE: &str = "access_token";
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role_id: Option<i16>,
}

/// Any of `identifier`, `email` or `username` names the account; the first
/// non-blank one in that order wins.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

impl LoginRequest {
    fn account(&self) -> String {
        [&self.identifier, &self.email, &self.username]
            .into_iter()
            .flatten()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role_id: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            email: u.email,
            role_id: u.role.id(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role_id: i16,
    pub jti: Uuid,
    pub iat: usize,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = AuthResponse),
    (status = 400, body = crate::presentation::http::error::ErrorBody),
    (status = 403, body = crate::presentation::http::error::ErrorBody),
    (status = 409, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<AuthResponse>)> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        username: req.username,
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        role_id: req.role_id,
    };
    let user = uc.execute(&dto).await?;
    let (headers, body) = session_response(&ctx.cfg, user)?;
    Ok((StatusCode::CREATED, headers, Json(body)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = AuthResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<(HeaderMap, Json<AuthResponse>)> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        identifier: req.account(),
        password: req.password,
    };
    let user = uc.execute(&dto).await?;
    let (headers, body) = session_response(&ctx.cfg, user)?;
    Ok((headers, Json(body)))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses(
    (status = 200, body = MessageResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn logout(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> AppResult<(HeaderMap, Json<MessageResponse>)> {
    let session = authenticate(&ctx, bearer).await?;
    let expires_at =
        DateTime::<Utc>::from_timestamp(session.claims.exp as i64, 0).unwrap_or_else(Utc::now);
    let revocations = ctx.token_revocations();
    Logout {
        revocations: revocations.as_ref(),
    }
    .execute(session.claims.jti, expires_at)
    .await?;
    tracing::info!(user_id = session.user.id, "user_logged_out");

    let mut headers = HeaderMap::new();
    let cookie = expired_access_cookie(ctx.cfg.cookie_secure());
    headers.insert(header::SET_COOKIE, HeaderValue::from_static(cookie));
    Ok((
        headers,
        Json(MessageResponse {
            message: "User logged out".into(),
        }),
    ))
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn me(State(ctx): State<AppContext>, bearer: Bearer) -> AppResult<Json<UserResponse>> {
    let session = authenticate(&ctx, bearer).await?;
    Ok(Json(session.user.into()))
}

fn session_response(cfg: &Config, user: User) -> AppResult<(HeaderMap, AuthResponse)> {
    let token = issue_token(cfg, &user)?;
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, cfg.jwt_expires_secs, cfg.cookie_secure());
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.into()))?,
    );
    Ok((
        headers,
        AuthResponse {
            user: user.into(),
            token,
            expires_in: cfg.jwt_expires_secs,
        },
    ))
}

// --- Bearer extractor & JWT utils ---

/// Raw access token pulled from the request. Checked in order: the
/// `Authorization` header (with or without the `Bearer ` prefix), the
/// `x-access-token` header, then the `access_token` cookie.
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_token = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim().to_string())
                .filter(|t| !t.is_empty())
        };
        if let Some(t) = header_token(header::AUTHORIZATION.as_str()) {
            return Ok(Bearer(t));
        }
        if let Some(t) = header_token(ACCESS_TOKEN_HEADER) {
            return Ok(Bearer(t));
        }
        if let Some(token) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|c| get_cookie(c, ACCESS_COOKIE))
        {
            return Ok(Bearer(token));
        }
        Err(AppError::Unauthorized("No token provided".into()))
    }
}

/// A verified caller: the token claims plus the account as it is stored now.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub claims: Claims,
}

impl Session {
    pub fn requester(&self) -> Requester {
        Requester {
            id: self.user.id,
            role: self.user.role,
        }
    }
}

pub(crate) async fn authenticate(ctx: &AppContext, bearer: Bearer) -> AppResult<Session> {
    let claims = decode_token(&ctx.cfg, &bearer.0)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("invalid token subject".into()))?;
    let users = ctx.user_repo();
    let revocations = ctx.token_revocations();
    let user = Authenticate {
        users: users.as_ref(),
        revocations: revocations.as_ref(),
    }
    .execute(user_id, claims.jti)
    .await?;
    Ok(Session { user, claims })
}

pub fn issue_token(cfg: &Config, user: &User) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        role_id: user.role.id(),
        jti: Uuid::new_v4(),
        iat: now as usize,
        exp: (now + cfg.jwt_expires_secs) as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

pub fn decode_token(cfg: &Config, token: &str) -> AppResult<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".into()))
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|part| {
        let (k, v) = part.trim().split_once('=')?;
        (k == name && !v.is_empty()).then(|| v.to_string())
    })
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{ACCESS_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn expired_access_cookie(secure: bool) -> &'static str {
    if secure {
        "access_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure"
    } else {
        "access_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    }
}
