pub mod config;
mod data_formats;
mod db_helpers;
pub mod errors;
mod extractors;
mod handlers;
pub mod models;
pub mod seed;

use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
use handlers::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tower_http::trace::TraceLayer;

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, listener: TcpListener) -> Result<()> {
    tracing::info!(address = %listener.local_addr()?, "Server started");
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub fn bind_listener(address: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(address).with_context(|| format!("Failed to bind {address}"))
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid database url {db_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to the database")?;
    tracing::info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations completed");
    Ok(pool)
}

pub fn make_router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/api", get(get_endpoints))
        .route("/api/topics", get(get_topics))
        .route("/api/articles", get(list_articles).post(post_article))
        .route(
            "/api/articles/:article_id",
            get(get_article).patch(patch_article),
        )
        .route(
            "/api/articles/:article_id/comments",
            get(get_article_comments).post(post_comment),
        )
        .route(
            "/api/comments/:comment_id",
            patch(patch_comment).delete(delete_comment),
        )
        .route("/api/users", get(get_users))
        .route("/api/users/:username", get(get_user))
        .fallback(not_found)
        .layer(Extension(pool))
        .layer(TraceLayer::new_for_http())
}
