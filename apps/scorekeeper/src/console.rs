//! Terminal rendering of list notifications.

use game_list::PresentationSink;
use shared::{
    domain::{Game, GameId},
    error::{FailureReason, Operation},
    protocol::ListEvent,
};

pub struct ConsoleSink {
    json: bool,
    show_list: bool,
}

impl ConsoleSink {
    pub fn new(json: bool, show_list: bool) -> Self {
        Self { json, show_list }
    }

    fn emit_json(&self, event: ListEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::error!(%error, "failed to encode list event"),
        }
    }
}

pub fn format_game_line(index: usize, game: &Game) -> String {
    format!(
        "{index:>3}  {}  {}  {}",
        game.id,
        game.created_at.format("%Y-%m-%d %H:%M:%S"),
        game.name
    )
}

impl PresentationSink for ConsoleSink {
    fn on_list_replaced(&mut self, games: &[Game]) {
        if !self.show_list {
            return;
        }
        if self.json {
            self.emit_json(ListEvent::ListReplaced {
                games: games.to_vec(),
            });
            return;
        }
        if games.is_empty() {
            println!("no games yet");
        }
        for (index, game) in games.iter().enumerate() {
            println!("{}", format_game_line(index, game));
        }
    }

    fn on_item_inserted(&mut self, index: usize, game: &Game) {
        if self.json {
            self.emit_json(ListEvent::ItemInserted {
                index,
                game: game.clone(),
            });
        } else {
            println!("created {}", format_game_line(index, game));
        }
    }

    fn on_item_updated(&mut self, index: usize, game: &Game) {
        if self.json {
            self.emit_json(ListEvent::ItemUpdated {
                index,
                game: game.clone(),
            });
        } else {
            println!("renamed {}", format_game_line(index, game));
        }
    }

    fn on_item_removed(&mut self, index: usize, game_id: &GameId) {
        if self.json {
            self.emit_json(ListEvent::ItemRemoved {
                index,
                game_id: *game_id,
            });
        } else {
            println!("removed {game_id} (was at {index})");
        }
    }

    fn on_operation_failed(&mut self, operation: Operation, reason: FailureReason, message: &str) {
        if self.json {
            self.emit_json(ListEvent::OperationFailed {
                operation,
                reason,
                message: message.to_string(),
            });
        } else {
            eprintln!("{} failed: {message}", operation.as_str());
        }
    }
}
