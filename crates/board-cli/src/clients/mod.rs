pub mod lichess;
pub mod stream;

use async_trait::async_trait;

use crate::error::ClientError;
pub use stream::EventStream;

/// Remote side of a game: one push stream plus two request/response calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the long-lived game event stream.
    async fn open_stream(&self, game_id: &str) -> Result<EventStream, ClientError>;

    /// Play `uci` (long algebraic notation) in the game.
    async fn submit_move(&self, game_id: &str, uci: &str) -> Result<(), ClientError>;

    async fn resign(&self, game_id: &str) -> Result<(), ClientError>;
}
