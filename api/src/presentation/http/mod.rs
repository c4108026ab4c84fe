pub mod auth;
pub mod documents;
pub mod error;
pub mod extract;
pub mod health;
pub mod paging;
pub mod roles;
pub mod users;

#[cfg(test)]
mod tests;

use axum::Router;

use crate::bootstrap::app_context::AppContext;

/// Every `/api` route that runs on the application context. Health is
/// mounted separately because it talks to the pool directly.
pub fn router(ctx: AppContext) -> Router {
    let api = Router::new()
        .nest("/auth", auth::routes(ctx.clone()))
        .merge(users::routes(ctx.clone()))
        .merge(documents::routes(ctx.clone()))
        .merge(roles::routes(ctx));
    Router::new().nest("/api", api)
}
