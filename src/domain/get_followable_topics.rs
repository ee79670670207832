//! Joins the topic list with the user's followed topics.

use std::sync::Arc;

use crate::data::{TopicsRepository, UserDataRepository};
use crate::errors::AppError;
use crate::models::{FollowableTopic, Topic, TopicSortField, UserData};
use crate::observe::Observable;

/// Pairs every topic with whether the user follows it.
///
/// `TopicSortField::None` keeps the input order. `TopicSortField::Name` sorts by
/// name with a stable, case-sensitive comparison, so equal names keep their order.
pub fn join_followable(
    topics: &[Topic],
    user_data: &UserData,
    sort_by: TopicSortField,
) -> Vec<FollowableTopic> {
    let mut followable: Vec<FollowableTopic> = topics
        .iter()
        .map(|topic| FollowableTopic {
            topic: topic.clone(),
            is_followed: user_data.is_following(&topic.id),
        })
        .collect();

    if sort_by == TopicSortField::Name {
        followable.sort_by(|a, b| a.topic.name.cmp(&b.topic.name));
    }

    followable
}

/// Produces the list of topics the user can follow, with their follow state.
pub struct GetFollowableTopicsUseCase {
    topics_repository: Arc<dyn TopicsRepository>,
    user_data_repository: Arc<dyn UserDataRepository>,
}

impl GetFollowableTopicsUseCase {
    pub fn new(
        topics_repository: Arc<dyn TopicsRepository>,
        user_data_repository: Arc<dyn UserDataRepository>,
    ) -> Self {
        Self {
            topics_repository,
            user_data_repository,
        }
    }

    /// Subscribe to both repositories. Each call owns independent subscriptions.
    pub async fn invoke(&self, sort_by: TopicSortField) -> FollowableTopics {
        let topics = self.topics_repository.get_topics().await;
        let user_data = self.user_data_repository.user_data().await;
        FollowableTopics::new(topics, user_data, sort_by)
    }
}

enum Upstream {
    Topics(Option<Result<Vec<Topic>, AppError>>),
    UserData(Option<Result<UserData, AppError>>),
}

/// Sequence of followable topic lists.
///
/// Emits once both sources have produced a value, then again on every emission
/// from either one. Completes when both sources have completed. The first source
/// error is yielded once, the other source is dropped and the sequence ends.
pub struct FollowableTopics {
    topics: Option<Observable<Vec<Topic>>>,
    user_data: Option<Observable<UserData>>,
    latest_topics: Option<Vec<Topic>>,
    latest_user_data: Option<UserData>,
    sort_by: TopicSortField,
}

impl FollowableTopics {
    pub fn new(
        topics: Observable<Vec<Topic>>,
        user_data: Observable<UserData>,
        sort_by: TopicSortField,
    ) -> Self {
        Self {
            topics: Some(topics),
            user_data: Some(user_data),
            latest_topics: None,
            latest_user_data: None,
            sort_by,
        }
    }

    pub async fn next(&mut self) -> Option<Result<Vec<FollowableTopic>, AppError>> {
        loop {
            if self.topics.is_none() && self.user_data.is_none() {
                return None;
            }

            let event = tokio::select! {
                item = next_or_pending(&mut self.topics) => Upstream::Topics(item),
                item = next_or_pending(&mut self.user_data) => Upstream::UserData(item),
            };

            match event {
                Upstream::Topics(Some(Ok(topics))) => self.latest_topics = Some(topics),
                Upstream::UserData(Some(Ok(user_data))) => self.latest_user_data = Some(user_data),
                Upstream::Topics(Some(Err(err))) | Upstream::UserData(Some(Err(err))) => {
                    tracing::warn!("Followable topics source failed: {}", err);
                    self.topics = None;
                    self.user_data = None;
                    return Some(Err(err));
                }
                Upstream::Topics(None) => {
                    self.topics = None;
                    continue;
                }
                Upstream::UserData(None) => {
                    self.user_data = None;
                    continue;
                }
            }

            if let (Some(topics), Some(user_data)) = (&self.latest_topics, &self.latest_user_data)
            {
                return Some(Ok(join_followable(topics, user_data, self.sort_by)));
            }
        }
    }

    /// First joined list; an error if the sequence ends before producing one.
    pub async fn first(&mut self) -> Result<Vec<FollowableTopic>, AppError> {
        match self.next().await {
            Some(item) => item,
            None => Err(AppError::Internal(
                "Followable topics completed without emitting a value".to_string(),
            )),
        }
    }
}

/// Next item of a source, or a future that never resolves once the source is gone.
async fn next_or_pending<T>(source: &mut Option<Observable<T>>) -> Option<Result<T, AppError>> {
    match source {
        Some(observable) => observable.next().await,
        None => std::future::pending().await,
    }
}
