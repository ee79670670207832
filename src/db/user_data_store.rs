//! Persistent singleton record of user preferences.

use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use super::bump_revision;
use crate::errors::AppError;
use crate::models::UserData;
use crate::observe::{self, Emitter, Observable};

struct UserDataState {
    current: UserData,
    listeners: Vec<Emitter<UserData>>,
}

/// Stores [`UserData`] as one JSON row and notifies observers after each committed change.
pub struct UserDataStore {
    pool: SqlitePool,
    state: Mutex<UserDataState>,
}

impl UserDataStore {
    /// Load the stored record, or start from defaults when none was written yet.
    pub async fn open(pool: SqlitePool) -> Result<Self, AppError> {
        let row = sqlx::query("SELECT payload FROM user_data WHERE id = 1")
            .fetch_optional(&pool)
            .await?;

        let current = match row {
            Some(row) => {
                let payload: String = row.get("payload");
                serde_json::from_str(&payload)?
            }
            None => UserData::default(),
        };

        Ok(Self {
            pool,
            state: Mutex::new(UserDataState {
                current,
                listeners: Vec::new(),
            }),
        })
    }

    /// Current record followed by every committed change.
    pub async fn observe(&self) -> Observable<UserData> {
        let mut state = self.state.lock().await;
        let (emitter, observable) = observe::channel();
        if emitter.emit(state.current.clone()) {
            state.listeners.retain(|listener| !listener.is_closed());
            state.listeners.push(emitter);
        }
        observable
    }

    /// Apply `change` to a copy of the record and persist it.
    ///
    /// Observers are only notified when the record actually changed.
    pub async fn update<F>(&self, change: F) -> Result<UserData, AppError>
    where
        F: FnOnce(&mut UserData),
    {
        let mut state = self.state.lock().await;
        state.listeners.retain(|listener| !listener.is_closed());

        let mut next = state.current.clone();
        change(&mut next);

        if next == state.current {
            return Ok(next);
        }

        let payload = serde_json::to_string(&next)?;
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"INSERT INTO user_data (id, payload, updated_at) VALUES (1, ?, ?)
               ON CONFLICT(id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at"#,
        )
        .bind(&payload)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        bump_revision(&mut tx).await?;
        tx.commit().await?;

        state.current = next.clone();
        state.listeners.retain(|emitter| emitter.emit(next.clone()));

        tracing::debug!(
            followed_topics = next.followed_topics.len(),
            listeners = state.listeners.len(),
            "user data updated"
        );

        Ok(next)
    }
}
