use std::sync::Arc;

use async_trait::async_trait;

use super::TopicsRepository;
use crate::db::TopicDao;
use crate::models::Topic;
use crate::observe::Observable;

/// Topics served from the local database.
pub struct OfflineFirstTopicsRepository {
    dao: Arc<TopicDao>,
}

impl OfflineFirstTopicsRepository {
    pub fn new(dao: Arc<TopicDao>) -> Self {
        Self { dao }
    }
}

#[async_trait]
impl TopicsRepository for OfflineFirstTopicsRepository {
    async fn get_topics(&self) -> Observable<Vec<Topic>> {
        self.dao
            .get_topic_entities()
            .await
            .map(|entities| entities.into_iter().map(Topic::from).collect())
    }

    async fn get_topic(&self, id: &str) -> Observable<Topic> {
        self.dao.get_topic_entity(id).await.map(Topic::from)
    }
}
