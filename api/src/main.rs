use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use chrono::Utc;
use dotenvy::dotenv;
use http::{HeaderName, HeaderValue, Method};
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wedoc::application::ports::token_revocation_repository::TokenRevocationRepository;
use wedoc::application::use_cases::auth::purge_revoked_tokens::PurgeRevokedTokens;
use wedoc::application::use_cases::users::ensure_admin::EnsureAdmin;
use wedoc::bootstrap::app_context::{AppContext, AppServices};
use wedoc::bootstrap::config::Config;
use wedoc::infrastructure::db::repositories::{
    document_repository_sqlx::SqlxDocumentRepository, role_repository_sqlx::SqlxRoleRepository,
    token_revocation_repository_sqlx::SqlxTokenRevocationRepository,
    user_repository_sqlx::SqlxUserRepository,
};

#[derive(OpenApi)]
#[openapi(
        paths(
            wedoc::presentation::http::auth::register,
            wedoc::presentation::http::auth::login,
            wedoc::presentation::http::auth::logout,
            wedoc::presentation::http::auth::me,
            wedoc::presentation::http::users::list_users,
            wedoc::presentation::http::users::search_users,
            wedoc::presentation::http::users::get_user,
            wedoc::presentation::http::users::update_user,
            wedoc::presentation::http::users::delete_user,
            wedoc::presentation::http::users::list_user_documents,
            wedoc::presentation::http::documents::list_documents,
            wedoc::presentation::http::documents::search_documents,
            wedoc::presentation::http::documents::create_document,
            wedoc::presentation::http::documents::get_document,
            wedoc::presentation::http::documents::update_document,
            wedoc::presentation::http::documents::delete_document,
            wedoc::presentation::http::roles::list_roles,
            wedoc::presentation::http::health::health,
        ),
        components(schemas(
            wedoc::presentation::http::error::ErrorBody,
            wedoc::presentation::http::paging::PageMetadata,
            wedoc::presentation::http::paging::SearchMetadata,
            wedoc::presentation::http::auth::RegisterRequest,
            wedoc::presentation::http::auth::LoginRequest,
            wedoc::presentation::http::auth::AuthResponse,
            wedoc::presentation::http::auth::UserResponse,
            wedoc::presentation::http::auth::MessageResponse,
            wedoc::presentation::http::users::UserListResponse,
            wedoc::presentation::http::users::UserSearchResponse,
            wedoc::presentation::http::users::UpdateUserRequest,
            wedoc::presentation::http::users::UpdateUserResponse,
            wedoc::presentation::http::documents::DocumentPermission,
            wedoc::presentation::http::documents::DocumentAccessResponse,
            wedoc::presentation::http::documents::DocumentResponse,
            wedoc::presentation::http::documents::DocumentListResponse,
            wedoc::presentation::http::documents::DocumentSearchResponse,
            wedoc::presentation::http::documents::CreateDocumentRequest,
            wedoc::presentation::http::documents::UpdateDocumentRequest,
            wedoc::presentation::http::roles::RoleResponse,
            wedoc::presentation::http::health::HealthResponse,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Users", description = "User accounts"),
            (name = "Documents", description = "Documents management"),
            (name = "Roles", description = "Account roles"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "wedoc=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting WeDoc backend");

    // Database
    let pool =
        wedoc::infrastructure::db::connect_pool(&cfg.database_url, cfg.database_max_connections)
            .await?;
    wedoc::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let document_repo = Arc::new(SqlxDocumentRepository::new(pool.clone()));
    let role_repo = Arc::new(SqlxRoleRepository::new(pool.clone()));
    let token_revocations = Arc::new(SqlxTokenRevocationRepository::new(pool.clone()));

    if let Some(seed) = &cfg.admin_seed {
        let uc = EnsureAdmin {
            repo: user_repo.as_ref(),
        };
        match uc.execute(seed).await {
            Ok(Some(admin)) => info!(user_id = admin.id, email = %admin.email, "admin_account_created"),
            Ok(None) => info!(email = %seed.email, "admin_account_present"),
            Err(e) => warn!(error = %e, "admin_bootstrap_failed"),
        }
    }

    let services = AppServices::new(
        user_repo,
        document_repo,
        role_repo,
        token_revocations.clone(),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let mut app = Router::new()
        .nest("/api", wedoc::presentation::http::health::routes(pool.clone()))
        .merge(wedoc::presentation::http::router(ctx))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));
    if let Some(dir) = &cfg.static_dir {
        info!(%dir, "serving static client");
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app.layer(cors_layer(&cfg)).layer(
        TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
            let method = req.method().clone();
            let uri = req.uri().clone();
            let matched = req
                .extensions()
                .get::<MatchedPath>()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            tracing::info_span!("http", %method, %uri, matched_path = %matched)
        }),
    );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    });

    // Background purge of revoked tokens past their expiry
    let purge_every = Duration::from_secs(cfg.token_purge_interval_secs);
    let purge_handle = tokio::spawn(purge_loop(token_revocations, purge_every));

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }
    purge_handle.abort();
    info!("shutdown complete");
    Ok(())
}

async fn purge_loop(revocations: Arc<dyn TokenRevocationRepository>, every: Duration) {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let uc = PurgeRevokedTokens {
            revocations: revocations.as_ref(),
        };
        if let Err(e) = uc.execute(Utc::now()).await {
            error!(error = ?e, "token_purge_failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::header::AUTHORIZATION,
            HeaderName::from_static("x-access-token"),
        ]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production; deny all if it is unusable
        _ if cfg.is_production => {
            base.allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
        }
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}
