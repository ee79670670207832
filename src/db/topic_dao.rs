//! Topic persistence with change notification.
//!
//! Writes are serialized through the listener registry lock. A write commits,
//! then every live listener whose filter covers a changed id receives a fresh
//! snapshot before the lock is released, so observers only ever see committed
//! table states and see them in commit order.
//!
//! Snapshots are ordered by insertion (`row_id`). Replacing a row keeps its position.

use std::collections::HashSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tokio::sync::Mutex;

use super::bump_revision;
use crate::errors::AppError;
use crate::models::{InsertOutcome, TopicEntity};
use crate::observe::{self, Emitter, Observable};

const SELECT_TOPICS: &str =
    "SELECT row_id, id, name, short_description, long_description, url, image_url FROM topics";

/// Ids bound per `IN (...)` query, below SQLite's bound-parameter limit.
const MAX_IDS_PER_QUERY: usize = 500;

/// A live subscription and the rows it watches.
enum TopicListener {
    All(Emitter<Vec<TopicEntity>>),
    ByIds(HashSet<String>, Emitter<Vec<TopicEntity>>),
    ById(String, Emitter<TopicEntity>),
}

impl TopicListener {
    fn is_closed(&self) -> bool {
        match self {
            TopicListener::All(emitter) | TopicListener::ByIds(_, emitter) => emitter.is_closed(),
            TopicListener::ById(_, emitter) => emitter.is_closed(),
        }
    }

    fn is_affected_by(&self, changed: &HashSet<String>) -> bool {
        match self {
            TopicListener::All(_) => !changed.is_empty(),
            TopicListener::ByIds(ids, _) => !ids.is_disjoint(changed),
            TopicListener::ById(id, _) => changed.contains(id),
        }
    }
}

/// Data access object for the `topics` table.
pub struct TopicDao {
    pool: SqlitePool,
    listeners: Mutex<Vec<TopicListener>>,
}

impl TopicDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            listeners: Mutex::new(Vec::new()),
        }
    }

    // ==================== OBSERVABLE QUERIES ====================

    /// All rows, re-emitted after every write that changes the table.
    pub async fn get_topic_entities(&self) -> Observable<Vec<TopicEntity>> {
        let mut listeners = self.listeners.lock().await;
        let (emitter, observable) = observe::channel();
        if emitter.deliver(self.fetch_all().await) {
            register(&mut listeners, TopicListener::All(emitter));
        }
        observable
    }

    /// The row for `id`. Emits nothing while no such row exists.
    pub async fn get_topic_entity(&self, id: &str) -> Observable<TopicEntity> {
        let mut listeners = self.listeners.lock().await;
        let (emitter, observable) = observe::channel();
        if deliver_if_present(&emitter, self.fetch_by_id(id).await) {
            register(&mut listeners, TopicListener::ById(id.to_string(), emitter));
        }
        observable
    }

    /// Rows whose id is in `ids`. An empty set always yields an empty list.
    pub async fn get_topic_entities_by_ids(
        &self,
        ids: &HashSet<String>,
    ) -> Observable<Vec<TopicEntity>> {
        let mut listeners = self.listeners.lock().await;
        let (emitter, observable) = observe::channel();
        if emitter.deliver(self.fetch_by_ids(ids).await) {
            register(&mut listeners, TopicListener::ByIds(ids.clone(), emitter));
        }
        observable
    }

    // ==================== ONE-SHOT QUERIES ====================

    /// Current rows without subscribing to changes.
    pub async fn get_one_off_topic_entities(&self) -> Result<Vec<TopicEntity>, AppError> {
        self.fetch_all().await
    }

    /// Current row for `id` without subscribing to changes.
    pub async fn get_one_off_topic_entity(&self, id: &str) -> Result<Option<TopicEntity>, AppError> {
        self.fetch_by_id(id).await
    }

    // ==================== WRITES ====================

    /// Insert rows whose id is not yet stored; existing rows are left untouched.
    ///
    /// Returns one outcome per input row, in input order.
    pub async fn insert_or_ignore_topics(
        &self,
        entities: &[TopicEntity],
    ) -> Result<Vec<InsertOutcome>, AppError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let mut listeners = self.listeners.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut outcomes = Vec::with_capacity(entities.len());
        let mut changed = HashSet::new();

        for entity in entities {
            let result = sqlx::query(
                r#"INSERT OR IGNORE INTO topics (
                    id, name, short_description, long_description, url, image_url
                ) VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&entity.id)
            .bind(&entity.name)
            .bind(&entity.short_description)
            .bind(&entity.long_description)
            .bind(&entity.url)
            .bind(&entity.image_url)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 1 {
                outcomes.push(InsertOutcome::Inserted(result.last_insert_rowid()));
                changed.insert(entity.id.clone());
            } else {
                outcomes.push(InsertOutcome::Ignored);
            }
        }

        if !changed.is_empty() {
            bump_revision(&mut tx).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            requested = entities.len(),
            inserted = changed.len(),
            "insert_or_ignore_topics committed"
        );

        self.notify(&mut listeners, &changed).await;
        Ok(outcomes)
    }

    /// Insert rows, fully replacing any stored row with the same id.
    ///
    /// All rows are applied in one transaction.
    pub async fn upsert_topics(&self, entities: &[TopicEntity]) -> Result<(), AppError> {
        if entities.is_empty() {
            return Ok(());
        }

        let mut listeners = self.listeners.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut changed = HashSet::new();

        for entity in entities {
            sqlx::query(
                r#"INSERT INTO topics (
                    id, name, short_description, long_description, url, image_url
                ) VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    short_description = excluded.short_description,
                    long_description = excluded.long_description,
                    url = excluded.url,
                    image_url = excluded.image_url"#,
            )
            .bind(&entity.id)
            .bind(&entity.name)
            .bind(&entity.short_description)
            .bind(&entity.long_description)
            .bind(&entity.url)
            .bind(&entity.image_url)
            .execute(&mut *tx)
            .await?;

            changed.insert(entity.id.clone());
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::debug!(count = entities.len(), "upsert_topics committed");

        self.notify(&mut listeners, &changed).await;
        Ok(())
    }

    /// Delete rows by id. Unknown ids are ignored.
    pub async fn delete_topics(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut listeners = self.listeners.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut changed = HashSet::new();

        for id in ids {
            let result = sqlx::query("DELETE FROM topics WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                changed.insert(id.clone());
            }
        }

        if !changed.is_empty() {
            bump_revision(&mut tx).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            requested = ids.len(),
            deleted = changed.len(),
            "delete_topics committed"
        );

        self.notify(&mut listeners, &changed).await;
        Ok(())
    }

    // ==================== NOTIFICATION ====================

    /// Push fresh snapshots to listeners affected by `changed`, dropping dead ones.
    async fn notify(&self, listeners: &mut Vec<TopicListener>, changed: &HashSet<String>) {
        let current = std::mem::take(listeners);
        let mut all_rows: Option<Result<Vec<TopicEntity>, AppError>> = None;

        for listener in current {
            if listener.is_closed() {
                continue;
            }
            if !listener.is_affected_by(changed) {
                listeners.push(listener);
                continue;
            }

            let live = match &listener {
                TopicListener::All(emitter) => {
                    // Unfiltered listeners share one snapshot per notification.
                    let rows = match &all_rows {
                        Some(rows) => rows.clone(),
                        None => {
                            let fetched = self.fetch_all().await;
                            all_rows = Some(fetched.clone());
                            fetched
                        }
                    };
                    emitter.deliver(rows)
                }
                TopicListener::ByIds(ids, emitter) => emitter.deliver(self.fetch_by_ids(ids).await),
                TopicListener::ById(id, emitter) => {
                    deliver_if_present(emitter, self.fetch_by_id(id).await)
                }
            };

            if live {
                listeners.push(listener);
            }
        }

        tracing::trace!(listeners = listeners.len(), "topic listeners notified");
    }

    // ==================== READS ====================

    async fn fetch_all(&self) -> Result<Vec<TopicEntity>, AppError> {
        let rows = sqlx::query(&format!("{} ORDER BY row_id", SELECT_TOPICS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(topic_entity_from_row).collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<TopicEntity>, AppError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_TOPICS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(topic_entity_from_row))
    }

    /// Large id sets are queried in chunks of [`MAX_IDS_PER_QUERY`].
    async fn fetch_by_ids(&self, ids: &HashSet<String>) -> Result<Vec<TopicEntity>, AppError> {
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut rows = Vec::new();

        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("{} WHERE id IN (", SELECT_TOPICS));
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            rows.extend(builder.build().fetch_all(&self.pool).await?);
        }

        rows.sort_by_key(|row| row.get::<i64, _>("row_id"));
        Ok(rows.iter().map(topic_entity_from_row).collect())
    }
}

/// Adds a listener, first dropping any whose subscriber has gone away.
fn register(listeners: &mut Vec<TopicListener>, listener: TopicListener) {
    listeners.retain(|l| !l.is_closed());
    listeners.push(listener);
}

/// Emits the row if there is one. Absence keeps the subscription open without emitting.
fn deliver_if_present(
    emitter: &Emitter<TopicEntity>,
    result: Result<Option<TopicEntity>, AppError>,
) -> bool {
    match result {
        Ok(Some(entity)) => emitter.emit(entity),
        Ok(None) => !emitter.is_closed(),
        Err(err) => emitter.fail(err),
    }
}

fn topic_entity_from_row(row: &SqliteRow) -> TopicEntity {
    TopicEntity {
        id: row.get("id"),
        name: row.get("name"),
        short_description: row.get("short_description"),
        long_description: row.get("long_description"),
        url: row.get("url"),
        image_url: row.get("image_url"),
    }
}
