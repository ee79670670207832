//! Startup seeding of the topics table from a JSON file.

use std::path::Path;

use super::TopicDao;
use crate::errors::AppError;
use crate::models::TopicEntity;

/// Insert the topics listed in `path` that are not stored yet.
///
/// The file holds a JSON array of topic objects. Returns how many rows were new.
pub async fn seed_topics(dao: &TopicDao, path: &Path) -> Result<usize, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let entities: Vec<TopicEntity> = serde_json::from_str(&raw)?;

    let outcomes = dao.insert_or_ignore_topics(&entities).await?;
    let inserted = outcomes.iter().filter(|o| o.is_inserted()).count();

    tracing::info!(
        path = %path.display(),
        total = entities.len(),
        inserted,
        "Seeded topics"
    );

    Ok(inserted)
}
