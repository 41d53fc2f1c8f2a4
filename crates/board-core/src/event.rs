//! Records received on the board game stream.

use serde::Deserialize;

/// One record from the game stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Full snapshot: players, status and the complete move history.
    #[serde(rename = "gameFull")]
    FullState(GameFull),

    /// The complete move history as currently known to the server.
    #[serde(rename = "gameState")]
    DeltaState(GameState),

    #[serde(rename = "chatLine")]
    ChatLine(ChatLine),

    #[serde(rename = "opponentGone")]
    OpponentGone(OpponentGone),

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameFull {
    #[serde(default)]
    pub id: Option<String>,
    pub white: Participant,
    pub black: Participant,
    pub state: GameState,
}

/// A seat at the board. Engine opponents have no `id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameState {
    /// Space separated UCI moves from the initial position.
    #[serde(default)]
    pub moves: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatLine {
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentGone {
    pub gone: bool,
    #[serde(default)]
    pub claim_win_in_seconds: Option<u32>,
}

pub const STATUS_STARTED: &str = "started";
const STATUS_CREATED: &str = "created";

impl GameState {
    /// True once the server reports a finished game (mate, resign, timeout, ...).
    /// A missing status counts as still running.
    pub fn is_finished(&self) -> bool {
        match self.status.as_deref() {
            None | Some(STATUS_STARTED) | Some(STATUS_CREATED) => false,
            Some(_) => true,
        }
    }
}

/// Decode a single stream record.
pub fn parse_record(line: &str) -> Result<GameEvent, serde_json::Error> {
    serde_json::from_str(line)
}

/// Decode a single stream record straight from the wire. Invalid UTF-8 is an
/// error rather than being replaced.
pub fn parse_record_bytes(line: &[u8]) -> Result<GameEvent, serde_json::Error> {
    serde_json::from_slice(line)
}
