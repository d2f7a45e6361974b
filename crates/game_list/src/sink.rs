//! Presentation-side receivers of list notifications.

use std::sync::{Arc, Mutex};

use shared::{
    domain::{Game, GameId},
    error::{FailureReason, Operation},
    protocol::ListEvent,
};
use tokio::sync::mpsc::UnboundedSender;

/// Observer for the controller's list. Receives borrowed snapshots only.
pub trait PresentationSink: Send {
    fn on_list_replaced(&mut self, games: &[Game]);
    fn on_item_inserted(&mut self, index: usize, game: &Game);
    fn on_item_updated(&mut self, index: usize, game: &Game);
    fn on_item_removed(&mut self, index: usize, game_id: &GameId);
    fn on_operation_failed(&mut self, operation: Operation, reason: FailureReason, message: &str);
}

/// Implements [`PresentationSink`] for a type with a `push(&mut self, ListEvent)` method.
macro_rules! event_sink {
    ($name:ident) => {
        impl PresentationSink for $name {
            fn on_list_replaced(&mut self, games: &[Game]) {
                self.push(ListEvent::ListReplaced {
                    games: games.to_vec(),
                });
            }

            fn on_item_inserted(&mut self, index: usize, game: &Game) {
                self.push(ListEvent::ItemInserted {
                    index,
                    game: game.clone(),
                });
            }

            fn on_item_updated(&mut self, index: usize, game: &Game) {
                self.push(ListEvent::ItemUpdated {
                    index,
                    game: game.clone(),
                });
            }

            fn on_item_removed(&mut self, index: usize, game_id: &GameId) {
                self.push(ListEvent::ItemRemoved {
                    index,
                    game_id: *game_id,
                });
            }

            fn on_operation_failed(
                &mut self,
                operation: Operation,
                reason: FailureReason,
                message: &str,
            ) {
                self.push(ListEvent::OperationFailed {
                    operation,
                    reason,
                    message: message.to_string(),
                });
            }
        }
    };
}

/// Forwards events to a UI loop running on another task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ListEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<ListEvent>) -> Self {
        Self { tx }
    }
}

impl ChannelSink {
    fn push(&mut self, event: ListEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("presentation receiver closed; dropping list event");
        }
    }
}

/// Keeps every event in order. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ListEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ListEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<ListEvent> {
        self.events
            .lock()
            .ok()
            .and_then(|events| events.last().cloned())
    }

    fn push(&mut self, event: ListEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

event_sink!(ChannelSink);
event_sink!(RecordingSink);
