use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::GameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Rename,
    Remove,
    Refresh,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Rename => "rename",
            Operation::Remove => "remove",
            Operation::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Validation,
    NotFound,
    StorageFault,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameListError {
    #[error("{0}")]
    Validation(String),
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("storage fault: {0}")]
    StorageFault(String),
}

impl GameListError {
    pub fn reason(&self) -> FailureReason {
        match self {
            GameListError::Validation(_) => FailureReason::Validation,
            GameListError::NotFound(_) => FailureReason::NotFound,
            GameListError::StorageFault(_) => FailureReason::StorageFault,
        }
    }
}
