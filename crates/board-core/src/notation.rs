//! Move notation helpers.
//! The server speaks UCI (`e2e4`, `e7e8q`); the prompt speaks SAN (`Nf3`, `O-O`).

use std::str::FromStr;

use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Move};

/// Split a move-history string into tokens.
/// An empty history yields no tokens at all.
pub fn split_moves(history: &str) -> Vec<&str> {
    history.split_whitespace().collect()
}

/// Decode a UCI token against `pos`. Returns `None` if the token is malformed
/// or not legal in the position.
pub fn decode_uci(pos: &Chess, token: &str) -> Option<Move> {
    let uci = UciMove::from_str(token).ok()?;
    uci.to_move(pos).ok()
}

/// Decode a human-entered token: SAN first (check/mate suffix allowed),
/// then UCI as a fallback.
pub fn decode_human(pos: &Chess, token: &str) -> Option<Move> {
    if let Ok(san_plus) = SanPlus::from_str(token) {
        if let Ok(mv) = san_plus.san.to_move(pos) {
            return Some(mv);
        }
    }
    decode_uci(pos, token)
}

pub fn encode_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// SAN for `mv`, which must be legal in `pos`.
pub fn encode_san(pos: &Chess, mv: &Move) -> String {
    San::from_move(pos, mv.clone()).to_string()
}
