use anyhow::{anyhow, Context};
use async_trait::async_trait;
use shared::{
    domain::{
        from_epoch_millis, normalize_game_name, now_millis_precision, to_epoch_millis, Game,
        GameId,
    },
    error::GameListError,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::Fault(value.into())
    }
}

impl From<StoreError> for GameListError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => GameListError::NotFound(id),
            StoreError::Fault(error) => GameListError::StorageFault(format!("{error:#}")),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable CRUD over game records. Listing order is newest-created first.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn list_all(&self) -> StoreResult<Vec<Game>>;
    async fn get(&self, id: GameId) -> StoreResult<Option<Game>>;
    async fn insert(&self, name: &str) -> StoreResult<Game>;
    async fn rename(&self, id: GameId, new_name: &str) -> StoreResult<Game>;
    async fn remove(&self, id: GameId) -> StoreResult<()>;
    async fn health_check(&self) -> StoreResult<()>;
}

#[async_trait]
impl<T: GameStore + ?Sized> GameStore for Arc<T> {
    async fn list_all(&self) -> StoreResult<Vec<Game>> {
        (**self).list_all().await
    }

    async fn get(&self, id: GameId) -> StoreResult<Option<Game>> {
        (**self).get(id).await
    }

    async fn insert(&self, name: &str) -> StoreResult<Game> {
        (**self).insert(name).await
    }

    async fn rename(&self, id: GameId, new_name: &str) -> StoreResult<Game> {
        (**self).rename(id, new_name).await
    }

    async fn remove(&self, id: GameId) -> StoreResult<()> {
        (**self).remove(id).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        (**self).health_check().await
    }
}

#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_options(database_url, StorageOptions::default()).await
    }

    pub async fn with_options(database_url: &str, options: StorageOptions) -> anyhow::Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections.max(1))
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run game table migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl GameStore for Storage {
    async fn list_all(&self) -> StoreResult<Vec<Game>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at FROM games ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list games")?;
        rows.iter().map(game_from_row).collect()
    }

    async fn get(&self, id: GameId) -> StoreResult<Option<Game>> {
        let row = sqlx::query("SELECT id, name, created_at FROM games WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("failed to load game")?;
        row.as_ref().map(game_from_row).transpose()
    }

    async fn insert(&self, name: &str) -> StoreResult<Game> {
        let name = normalize_game_name(name).map_err(|e| anyhow!(e))?;
        let game = Game {
            id: GameId::new(),
            name,
            created_at: now_millis_precision(),
        };
        sqlx::query("INSERT INTO games (id, name, created_at) VALUES (?, ?, ?)")
            .bind(game.id.to_string())
            .bind(&game.name)
            .bind(to_epoch_millis(game.created_at))
            .execute(&self.pool)
            .await
            .context("failed to insert game")?;
        debug!(game_id = %game.id, "inserted game row");
        Ok(game)
    }

    async fn rename(&self, id: GameId, new_name: &str) -> StoreResult<Game> {
        let new_name = normalize_game_name(new_name).map_err(|e| anyhow!(e))?;
        let row = sqlx::query(
            "UPDATE games SET name = ? WHERE id = ? RETURNING id, name, created_at",
        )
        .bind(&new_name)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("failed to rename game")?;
        match row {
            Some(row) => game_from_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn remove(&self, id: GameId) -> StoreResult<()> {
        let affected = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("failed to remove game")?
            .rows_affected();
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(game_id = %id, "removed game row");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

fn game_from_row(row: &SqliteRow) -> StoreResult<Game> {
    let raw_id: String = row.try_get(0)?;
    let id = GameId::from_str(&raw_id)
        .with_context(|| format!("stored game id '{raw_id}' is not a uuid"))?;
    let millis: i64 = row.try_get(2)?;
    let created_at = from_epoch_millis(millis)
        .ok_or_else(|| anyhow!("stored timestamp {millis} for game {id} is out of range"))?;
    Ok(Game {
        id,
        name: row.try_get(1)?,
        created_at,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
