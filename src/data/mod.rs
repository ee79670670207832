//! Repositories consumed by the domain layer.
//!
//! The traits are the seam the use cases depend on; the offline-first
//! implementations read and write the local SQLite store.

mod topics_repository;
mod user_data_repository;

pub use topics_repository::*;
pub use user_data_repository::*;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{DarkThemeConfig, ThemeBrand, Topic, UserData};
use crate::observe::Observable;

/// Source of topics.
#[async_trait]
pub trait TopicsRepository: Send + Sync {
    /// All topics, re-emitted whenever they change.
    async fn get_topics(&self) -> Observable<Vec<Topic>>;

    /// A single topic. Emits nothing while the topic does not exist.
    async fn get_topic(&self, id: &str) -> Observable<Topic>;
}

/// Source and sink of the current user's preferences.
///
/// Every setter updates one field atomically and triggers a new `user_data` emission.
#[async_trait]
pub trait UserDataRepository: Send + Sync {
    async fn user_data(&self) -> Observable<UserData>;

    async fn set_followed_topic_ids(&self, followed_topic_ids: BTreeSet<String>)
        -> Result<(), AppError>;

    async fn set_topic_id_followed(&self, topic_id: &str, followed: bool) -> Result<(), AppError>;

    async fn set_news_resource_bookmarked(
        &self,
        news_resource_id: &str,
        bookmarked: bool,
    ) -> Result<(), AppError>;

    async fn set_news_resource_viewed(
        &self,
        news_resource_id: &str,
        viewed: bool,
    ) -> Result<(), AppError>;

    async fn set_theme_brand(&self, theme_brand: ThemeBrand) -> Result<(), AppError>;

    async fn set_dark_theme_config(&self, dark_theme_config: DarkThemeConfig)
        -> Result<(), AppError>;

    async fn set_dynamic_color_preference(&self, use_dynamic_color: bool) -> Result<(), AppError>;

    async fn set_should_hide_onboarding(&self, should_hide_onboarding: bool)
        -> Result<(), AppError>;
}
