use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameListError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One tracked game. `id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

pub const EMPTY_NAME_MESSAGE: &str = "name cannot be empty";

/// Trims user input into a storable game name.
pub fn normalize_game_name(raw: &str) -> Result<String, GameListError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GameListError::Validation(EMPTY_NAME_MESSAGE.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn to_epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Current time truncated to what the database keeps.
pub fn now_millis_precision() -> DateTime<Utc> {
    let now = Utc::now();
    from_epoch_millis(to_epoch_millis(now)).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_game_name("  Chess \n").expect("valid"), "Chess");
    }

    #[test]
    fn rejects_blank_names() {
        for raw in ["", "   ", "\t\n"] {
            let err = normalize_game_name(raw).expect_err("blank name");
            assert!(matches!(err, GameListError::Validation(ref m) if m == EMPTY_NAME_MESSAGE));
        }
    }

    #[test]
    fn game_id_text_form_parses_back() {
        let id = GameId::new();
        let parsed: GameId = id.to_string().parse().expect("parse");
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<GameId>().is_err());
    }

    #[test]
    fn epoch_millis_conversion_drops_sub_millisecond_part() {
        let at = now_millis_precision();
        let back = from_epoch_millis(to_epoch_millis(at)).expect("in range");
        assert_eq!(back, at);
    }
}
