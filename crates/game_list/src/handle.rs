//! Shared access to one controller from several tasks.

use std::sync::Arc;

use shared::{
    domain::{Game, GameId},
    error::GameListError,
};
use storage::GameStore;
use tokio::sync::Mutex;

use crate::{controller::GameListController, sink::PresentationSink};

/// Queues operations behind one lock so a rename and a remove of the same
/// game never interleave; the later call sees the earlier result.
pub struct SharedController<S, P> {
    inner: Arc<Mutex<GameListController<S, P>>>,
}

impl<S, P> Clone for SharedController<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, P> SharedController<S, P>
where
    S: GameStore,
    P: PresentationSink,
{
    pub fn new(controller: GameListController<S, P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn create(&self, raw_input: &str) -> Result<Game, GameListError> {
        self.inner.lock().await.create(raw_input).await
    }

    pub async fn rename(&self, id: GameId, raw_input: &str) -> Result<Game, GameListError> {
        self.inner.lock().await.rename(id, raw_input).await
    }

    pub async fn remove(&self, id: GameId) -> Result<(), GameListError> {
        self.inner.lock().await.remove(id).await
    }

    pub async fn refresh(&self) -> Result<(), GameListError> {
        self.inner.lock().await.refresh().await
    }

    pub async fn snapshot(&self) -> Vec<Game> {
        self.inner.lock().await.games().to_vec()
    }
}
