use serde::{Deserialize, Serialize};

use crate::{
    domain::{Game, GameId},
    error::{FailureReason, Operation},
};

/// Owned form of a list notification, for sinks that hand events to another task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ListEvent {
    ListReplaced {
        games: Vec<Game>,
    },
    ItemInserted {
        index: usize,
        game: Game,
    },
    ItemUpdated {
        index: usize,
        game: Game,
    },
    ItemRemoved {
        index: usize,
        game_id: GameId,
    },
    OperationFailed {
        operation: Operation,
        reason: FailureReason,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_event_uses_tagged_snake_case_layout() {
        let event = ListEvent::OperationFailed {
            operation: Operation::Rename,
            reason: FailureReason::NotFound,
            message: "gone".into(),
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["type"], "operation_failed");
        assert_eq!(value["payload"]["operation"], "rename");
        assert_eq!(value["payload"]["reason"], "not_found");
    }
}
