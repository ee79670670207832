//! Interests Backend
//!
//! Serves topics a user can follow, backed by SQLite with change notification.

mod api;
mod auth;
mod config;
mod data;
mod db;
mod domain;
mod errors;
mod models;
mod observe;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use data::{OfflineFirstTopicsRepository, OfflineFirstUserDataRepository, UserDataRepository};
use db::{TopicDao, UserDataStore};
use domain::GetFollowableTopicsUseCase;
use errors::AppError;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub topic_dao: Arc<TopicDao>,
    pub user_data_repository: Arc<dyn UserDataRepository>,
    pub get_followable_topics: Arc<GetFollowableTopicsUseCase>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the DAO, repositories and use case on top of an initialized pool.
    pub async fn new(pool: SqlitePool, config: Config) -> Result<Self, AppError> {
        let topic_dao = Arc::new(TopicDao::new(pool.clone()));
        let user_data_store = Arc::new(UserDataStore::open(pool.clone()).await?);

        let topics_repository = Arc::new(OfflineFirstTopicsRepository::new(topic_dao.clone()));
        let user_data_repository: Arc<dyn UserDataRepository> =
            Arc::new(OfflineFirstUserDataRepository::new(user_data_store));
        let get_followable_topics = Arc::new(GetFollowableTopicsUseCase::new(
            topics_repository,
            user_data_repository.clone(),
        ));

        Ok(Self {
            pool,
            topic_dao,
            user_data_repository,
            get_followable_topics,
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Interests Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (INTERESTS_API_PSK). Authentication is disabled!");
    }

    let pool = db::init_database(&config.db_path).await?;
    let state = AppState::new(pool, config.clone()).await?;

    if let Some(seed_path) = &config.seed_path {
        db::seed_topics(&state.topic_dao, seed_path).await?;
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        .route("/revision", get(api::get_revision))
        // Topics
        .route("/topics", get(api::list_topics).put(api::upsert_topics))
        .route("/topics/insert-or-ignore", post(api::insert_or_ignore_topics))
        .route("/topics/delete", post(api::delete_topics))
        .route("/topics/{id}", get(api::get_topic))
        // Followable topics
        .route("/followable-topics", get(api::list_followable_topics))
        .route("/interests", get(api::list_interests_items))
        .route("/interests/previews", get(api::list_interests_previews))
        // User data
        .route("/user-data", get(api::get_user_data))
        .route("/user-data/followed-topics", put(api::set_followed_topics))
        .route(
            "/user-data/followed-topics/{id}",
            put(api::set_topic_followed),
        )
        .route(
            "/user-data/bookmarks/{id}",
            put(api::set_news_resource_bookmarked),
        )
        .route("/user-data/viewed/{id}", put(api::set_news_resource_viewed))
        .route("/user-data/preferences", put(api::update_preferences))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
