use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::UserDataRepository;
use crate::db::UserDataStore;
use crate::errors::AppError;
use crate::models::{toggle_membership, DarkThemeConfig, ThemeBrand, UserData};
use crate::observe::Observable;

/// User preferences persisted in the local database.
pub struct OfflineFirstUserDataRepository {
    store: Arc<UserDataStore>,
}

impl OfflineFirstUserDataRepository {
    pub fn new(store: Arc<UserDataStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserDataRepository for OfflineFirstUserDataRepository {
    async fn user_data(&self) -> Observable<UserData> {
        self.store.observe().await
    }

    async fn set_followed_topic_ids(
        &self,
        followed_topic_ids: BTreeSet<String>,
    ) -> Result<(), AppError> {
        self.store
            .update(|data| data.followed_topics = followed_topic_ids)
            .await?;
        Ok(())
    }

    async fn set_topic_id_followed(&self, topic_id: &str, followed: bool) -> Result<(), AppError> {
        self.store
            .update(|data| toggle_membership(&mut data.followed_topics, topic_id, followed))
            .await?;
        Ok(())
    }

    async fn set_news_resource_bookmarked(
        &self,
        news_resource_id: &str,
        bookmarked: bool,
    ) -> Result<(), AppError> {
        self.store
            .update(|data| {
                toggle_membership(
                    &mut data.bookmarked_news_resources,
                    news_resource_id,
                    bookmarked,
                )
            })
            .await?;
        Ok(())
    }

    async fn set_news_resource_viewed(
        &self,
        news_resource_id: &str,
        viewed: bool,
    ) -> Result<(), AppError> {
        self.store
            .update(|data| {
                toggle_membership(&mut data.viewed_news_resources, news_resource_id, viewed)
            })
            .await?;
        Ok(())
    }

    async fn set_theme_brand(&self, theme_brand: ThemeBrand) -> Result<(), AppError> {
        self.store
            .update(|data| data.theme_brand = theme_brand)
            .await?;
        Ok(())
    }

    async fn set_dark_theme_config(
        &self,
        dark_theme_config: DarkThemeConfig,
    ) -> Result<(), AppError> {
        self.store
            .update(|data| data.dark_theme_config = dark_theme_config)
            .await?;
        Ok(())
    }

    async fn set_dynamic_color_preference(&self, use_dynamic_color: bool) -> Result<(), AppError> {
        self.store
            .update(|data| data.use_dynamic_color = use_dynamic_color)
            .await?;
        Ok(())
    }

    async fn set_should_hide_onboarding(
        &self,
        should_hide_onboarding: bool,
    ) -> Result<(), AppError> {
        self.store
            .update(|data| data.should_hide_onboarding = should_hide_onboarding)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    async fn test_repository() -> (OfflineFirstUserDataRepository, tempfile::TempDir) {
        let (pool, temp_dir) = test_pool().await;
        let store = UserDataStore::open(pool).await.unwrap();
        (OfflineFirstUserDataRepository::new(Arc::new(store)), temp_dir)
    }

    #[tokio::test]
    async fn test_follow_and_unfollow_topic() {
        let (repository, _temp_dir) = test_repository().await;
        let mut user_data = repository.user_data().await;
        assert!(user_data.next().await.unwrap().unwrap().followed_topics.is_empty());

        repository.set_topic_id_followed("1", true).await.unwrap();
        assert!(user_data.next().await.unwrap().unwrap().is_following("1"));

        repository.set_topic_id_followed("1", false).await.unwrap();
        assert!(!user_data.next().await.unwrap().unwrap().is_following("1"));
    }

    #[tokio::test]
    async fn test_set_followed_topic_ids_replaces_set() {
        let (repository, _temp_dir) = test_repository().await;
        repository.set_topic_id_followed("old", true).await.unwrap();

        let ids: BTreeSet<String> = ["1", "3"].iter().map(|s| s.to_string()).collect();
        repository.set_followed_topic_ids(ids.clone()).await.unwrap();

        let data = repository.user_data().await.first().await.unwrap();
        assert_eq!(data.followed_topics, ids);
    }

    #[tokio::test]
    async fn test_each_setter_updates_its_field() {
        let (repository, _temp_dir) = test_repository().await;

        repository
            .set_news_resource_bookmarked("news-1", true)
            .await
            .unwrap();
        repository.set_news_resource_viewed("news-2", true).await.unwrap();
        repository.set_theme_brand(ThemeBrand::Android).await.unwrap();
        repository
            .set_dark_theme_config(DarkThemeConfig::Light)
            .await
            .unwrap();
        repository.set_dynamic_color_preference(true).await.unwrap();
        repository.set_should_hide_onboarding(true).await.unwrap();

        let data = repository.user_data().await.first().await.unwrap();
        assert!(data.bookmarked_news_resources.contains("news-1"));
        assert!(data.viewed_news_resources.contains("news-2"));
        assert_eq!(data.theme_brand, ThemeBrand::Android);
        assert_eq!(data.dark_theme_config, DarkThemeConfig::Light);
        assert!(data.use_dynamic_color);
        assert!(data.should_hide_onboarding);
        assert!(data.followed_topics.is_empty());
    }
}
