//! Local and remote views of a single game.
//!
//! The remote board follows the server's move history exactly. The local board
//! follows the same history, plus at most the move the user has just played
//! and the server has not echoed back yet.

use shakmaty::{Chess, Move, Position};
use thiserror::Error;

use crate::notation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The server sent a token the rules engine rejects.
    #[error("illegal move from server at ply {ply}: {token:?}")]
    IllegalMove { ply: usize, token: String },

    /// The user entered a token the rules engine rejects.
    #[error("invalid move: {0:?}")]
    InvalidMove(String),

    #[error("cannot mirror remote ply {index}: local board is at ply {local_len}")]
    Desync { index: usize, local_len: usize },
}

#[derive(Debug, Clone, Default)]
pub struct BoardModel {
    local: Chess,
    local_moves: Vec<Move>,
    remote: Chess,
    remote_moves: Vec<Move>,
}

impl BoardModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_len(&self) -> usize {
        self.local_moves.len()
    }

    pub fn remote_len(&self) -> usize {
        self.remote_moves.len()
    }

    pub fn local_moves(&self) -> &[Move] {
        &self.local_moves
    }

    pub fn remote_moves(&self) -> &[Move] {
        &self.remote_moves
    }

    pub fn local_position(&self) -> &Chess {
        &self.local
    }

    pub fn remote_position(&self) -> &Chess {
        &self.remote
    }

    /// True while a local move is waiting for the server's echo.
    pub fn has_pending_local_move(&self) -> bool {
        self.local_moves.len() > self.remote_moves.len()
    }

    /// Decode `token` as UCI against the remote position and append it.
    pub fn apply_remote_token(&mut self, token: &str) -> Result<Move, BoardError> {
        let ply = self.remote_moves.len();
        let mv = notation::decode_uci(&self.remote, token).ok_or_else(|| {
            BoardError::IllegalMove {
                ply,
                token: token.to_string(),
            }
        })?;

        self.remote.play_unchecked(mv.clone());
        self.remote_moves.push(mv.clone());
        Ok(mv)
    }

    /// Replay the remote move at `index` onto the local board.
    ///
    /// Only the next local ply can be mirrored; anything else means the two
    /// boards have drifted apart.
    pub fn mirror_remote_move_to_local(&mut self, index: usize) -> Result<Move, BoardError> {
        let local_len = self.local_moves.len();
        let mv = match self.remote_moves.get(index) {
            Some(mv) if index == local_len && self.local.is_legal(mv.clone()) => mv.clone(),
            _ => return Err(BoardError::Desync { index, local_len }),
        };

        self.local.play_unchecked(mv.clone());
        self.local_moves.push(mv.clone());
        Ok(mv)
    }

    /// Decode a user-entered token against the local position and append it.
    /// Leaves the board untouched on failure.
    pub fn apply_local_token(&mut self, token: &str) -> Result<Move, BoardError> {
        let mv = notation::decode_human(&self.local, token)
            .ok_or_else(|| BoardError::InvalidMove(token.to_string()))?;

        self.local.play_unchecked(mv.clone());
        self.local_moves.push(mv.clone());
        Ok(mv)
    }

    /// Legal moves from the local position, in SAN.
    pub fn legal_move_suggestions(&self) -> impl Iterator<Item = String> + '_ {
        self.local
            .legal_moves()
            .into_iter()
            .map(move |mv| notation::encode_san(&self.local, &mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(tokens: &[&str]) -> BoardModel {
        let mut board = BoardModel::new();
        for (i, token) in tokens.iter().enumerate() {
            board.apply_remote_token(token).unwrap();
            board.mirror_remote_move_to_local(i).unwrap();
        }
        board
    }

    #[test]
    fn test_remote_and_mirror_stay_in_lockstep() {
        let board = board_with(&["e2e4", "e7e5"]);
        assert_eq!(board.remote_len(), 2);
        assert_eq!(board.local_len(), 2);
        assert_eq!(board.local_moves(), board.remote_moves());
        assert_eq!(board.local_position().turn(), shakmaty::Color::White);
    }

    #[test]
    fn test_illegal_remote_token() {
        let mut board = board_with(&["e2e4"]);
        let err = board.apply_remote_token("e2e4").unwrap_err();
        assert_eq!(
            err,
            BoardError::IllegalMove {
                ply: 1,
                token: "e2e4".to_string()
            }
        );
        assert_eq!(board.remote_len(), 1);
    }

    #[test]
    fn test_local_token_appends() {
        let mut board = BoardModel::new();
        let mv = board.apply_local_token("e4").unwrap();
        assert_eq!(notation::encode_uci(&mv), "e2e4");
        assert_eq!(board.local_len(), 1);
        assert_eq!(board.remote_len(), 0);
        assert!(board.has_pending_local_move());
    }

    #[test]
    fn test_invalid_local_token_leaves_state() {
        let mut board = board_with(&["e2e4"]);
        let err = board.apply_local_token("e9e9").unwrap_err();
        assert_eq!(err, BoardError::InvalidMove("e9e9".to_string()));
        assert_eq!(board.local_len(), 1);
        assert_eq!(board.remote_len(), 1);
    }

    #[test]
    fn test_mirror_rejects_out_of_order_index() {
        let mut board = BoardModel::new();
        board.apply_remote_token("e2e4").unwrap();
        board.apply_remote_token("e7e5").unwrap();
        assert_eq!(
            board.mirror_remote_move_to_local(1),
            Err(BoardError::Desync {
                index: 1,
                local_len: 0
            })
        );
        assert!(board.mirror_remote_move_to_local(0).is_ok());
        assert!(board.mirror_remote_move_to_local(5).is_err());
    }

    #[test]
    fn test_suggestions_follow_local_position() {
        let mut board = BoardModel::new();
        assert_eq!(board.legal_move_suggestions().count(), 20);
        board.apply_local_token("e4").unwrap();
        let moves: Vec<String> = board.legal_move_suggestions().collect();
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e5".to_string()));
        // Restartable
        assert_eq!(board.legal_move_suggestions().count(), moves.len());
    }
}
