//! In-memory game list state kept in step with a [`storage::GameStore`].

pub mod controller;
pub mod handle;
pub mod sink;

pub use controller::{ControllerOptions, GameListController};
pub use handle::SharedController;
pub use sink::{ChannelSink, PresentationSink, RecordingSink};
