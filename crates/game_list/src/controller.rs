//! Owner of the ordered game list. Every mutation goes store first, list second.

use std::{future::Future, time::Duration};

use shared::{
    domain::{normalize_game_name, Game, GameId},
    error::{GameListError, Operation},
};
use storage::{GameStore, StoreResult};
use tracing::{debug, info, warn};

use crate::sink::PresentationSink;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Upper bound on a single store call before it is reported as a storage fault.
    pub store_timeout: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(30),
        }
    }
}

pub struct GameListController<S, P> {
    store: S,
    sink: P,
    games: Vec<Game>,
    options: ControllerOptions,
}

impl<S, P> GameListController<S, P>
where
    S: GameStore,
    P: PresentationSink,
{
    /// Loads the list once and publishes it to `sink`.
    pub async fn activate(
        store: S,
        mut sink: P,
        options: ControllerOptions,
    ) -> Result<Self, GameListError> {
        let loaded = bounded(options.store_timeout, store.list_all()).await;
        let games = match loaded.map_err(GameListError::from) {
            Ok(games) => games,
            Err(error) => {
                warn!(%error, "failed to load game list");
                sink.on_operation_failed(Operation::Refresh, error.reason(), &error.to_string());
                return Err(error);
            }
        };
        info!(count = games.len(), "game list activated");
        sink.on_list_replaced(&games);
        Ok(Self {
            store,
            sink,
            games,
            options,
        })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: &GameId) -> Option<&Game> {
        self.games.iter().find(|game| game.id == *id)
    }

    pub fn position(&self, id: &GameId) -> Option<usize> {
        self.games.iter().position(|game| game.id == *id)
    }

    /// Id handed to the stats view for the game shown at `index`.
    pub fn stats_target(&self, index: usize) -> Option<GameId> {
        self.games.get(index).map(|game| game.id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create(&mut self, raw_input: &str) -> Result<Game, GameListError> {
        let name = match normalize_game_name(raw_input) {
            Ok(name) => name,
            Err(error) => return Err(self.report(Operation::Create, error)),
        };

        let inserted = bounded(self.options.store_timeout, self.store.insert(&name)).await;
        let game = match inserted {
            Ok(game) => game,
            Err(failure) => return Err(self.settle(Operation::Create, failure).await),
        };

        self.games.insert(0, game.clone());
        info!(game_id = %game.id, name = %game.name, "game created");
        self.sink.on_item_inserted(0, &game);
        Ok(game)
    }

    pub async fn rename(&mut self, id: GameId, raw_input: &str) -> Result<Game, GameListError> {
        let name = match normalize_game_name(raw_input) {
            Ok(name) => name,
            Err(error) => return Err(self.report(Operation::Rename, error)),
        };

        let renamed = bounded(self.options.store_timeout, self.store.rename(id, &name)).await;
        let game = match renamed {
            Ok(game) => game,
            Err(failure) => return Err(self.settle(Operation::Rename, failure).await),
        };

        match self.position(&id) {
            Some(index) => {
                self.games[index] = game.clone();
                info!(game_id = %id, index, name = %game.name, "game renamed");
                self.sink.on_item_updated(index, &game);
            }
            None => {
                // The rename is committed either way; a failed reload has been reported.
                warn!(game_id = %id, "renamed game missing from list; reloading");
                if let Err(error) = self.reload().await {
                    debug!(game_id = %id, %error, "reload after rename failed");
                }
            }
        }
        Ok(game)
    }

    pub async fn remove(&mut self, id: GameId) -> Result<(), GameListError> {
        let removed = bounded(self.options.store_timeout, self.store.remove(id)).await;
        if let Err(failure) = removed {
            return Err(self.settle(Operation::Remove, failure).await);
        }

        match self.position(&id) {
            Some(index) => {
                self.games.remove(index);
                info!(game_id = %id, index, "game removed");
                self.sink.on_item_removed(index, &id);
            }
            None => debug!(game_id = %id, "removed game was not in list"),
        }
        Ok(())
    }

    /// Replaces the list with the store's current contents.
    pub async fn refresh(&mut self) -> Result<(), GameListError> {
        self.reload().await
    }

    async fn reload(&mut self) -> Result<(), GameListError> {
        let loaded = bounded(self.options.store_timeout, self.store.list_all()).await;
        match loaded.map_err(GameListError::from) {
            Ok(games) => {
                self.games = games;
                debug!(count = self.games.len(), "game list reloaded");
                self.sink.on_list_replaced(&self.games);
                Ok(())
            }
            Err(error) => Err(self.report(Operation::Refresh, error)),
        }
    }

    /// Reports a failed mutation. After a timeout the write may have committed
    /// anyway, so the list is rebuilt from the store before the fault goes out.
    async fn settle(&mut self, operation: Operation, failure: StoreCallError) -> GameListError {
        match failure {
            StoreCallError::Failed(error) => self.report(operation, error),
            StoreCallError::TimedOut(error) => {
                warn!(
                    operation = operation.as_str(),
                    "store call timed out; reconciling list with store"
                );
                if let Err(reload_error) = self.reload().await {
                    debug!(%reload_error, "reconcile after timeout failed");
                }
                self.report(operation, error)
            }
        }
    }

    fn report(&mut self, operation: Operation, error: GameListError) -> GameListError {
        warn!(operation = operation.as_str(), %error, "game list operation failed");
        self.sink
            .on_operation_failed(operation, error.reason(), &error.to_string());
        error
    }
}

enum StoreCallError {
    Failed(GameListError),
    TimedOut(GameListError),
}

impl From<StoreCallError> for GameListError {
    fn from(value: StoreCallError) -> Self {
        match value {
            StoreCallError::Failed(error) | StoreCallError::TimedOut(error) => error,
        }
    }
}

async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StoreCallError>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|error| StoreCallError::Failed(error.into())),
        Err(_) => Err(StoreCallError::TimedOut(GameListError::StorageFault(format!(
            "store call timed out after {}ms",
            limit.as_millis()
        )))),
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
