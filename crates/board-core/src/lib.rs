//! Board state and turn arbitration for a single lichess Board API game.

pub mod board;
pub mod event;
pub mod notation;
pub mod sync;

pub use board::{BoardError, BoardModel};
pub use event::GameEvent;
pub use shakmaty;
pub use sync::{LocalAction, PendingMove, Phase, Side, Step, SyncEngine, SyncError};
