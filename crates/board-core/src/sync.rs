//! Stream reconciliation and turn arbitration.
//!
//! [`SyncEngine`] never performs I/O. The caller feeds it stream events and
//! user input; it answers with what should happen next ([`Step`],
//! [`LocalAction`]) and leaves the network and the terminal to the caller.

use shakmaty::Move;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{BoardError, BoardModel};
use crate::event::{GameEvent, GameFull, GameState, STATUS_STARTED};
use crate::notation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("game is not active (status: {0})")]
    GameNotStarted(String),

    #[error("user {0:?} does not match either side of the game")]
    NoMatchingSide(String),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("server history diverged from local move at ply {0}")]
    Diverged(usize),

    #[error("not waiting for a local move")]
    NotYourTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The side to move after `plies` half-moves from the initial position.
    pub fn to_move(plies: usize) -> Side {
        if plies % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFullState,
    Synced,
    AwaitingLocalMove,
    Terminal,
}

/// What the caller should do after an event has been absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading the stream.
    Wait,
    /// The local side is to move: prompt the user.
    Prompt,
    /// The server reported the game as over.
    Finished(String),
}

/// The result of feeding one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    Quit,
    Resign,
    /// A legal move was applied locally and must be sent to the server.
    Submit(PendingMove),
    /// The input was rejected; prompt again.
    Rejected(BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub uci: String,
    pub san: String,
}

pub const QUIT_COMMANDS: &[&str] = &["quit", "exit"];
pub const RESIGN_COMMAND: &str = "resign";

pub struct SyncEngine {
    user_id: String,
    side: Option<Side>,
    phase: Phase,
    board: BoardModel,
}

impl SyncEngine {
    /// `user_id` is compared case-insensitively against participant ids.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_lowercase(),
            side: None,
            phase: Phase::AwaitingFullState,
            board: BoardModel::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    /// Absorb one stream event.
    pub fn handle_event(&mut self, event: GameEvent) -> Result<Step, SyncError> {
        let result = match event {
            GameEvent::FullState(full) => self.handle_full_state(full),
            GameEvent::DeltaState(state) => self.handle_delta_state(state),
            GameEvent::ChatLine(chat) => {
                info!(username = %chat.username, text = %chat.text, "Chat");
                Ok(self.current_step())
            }
            GameEvent::OpponentGone(gone) => {
                info!(
                    gone = gone.gone,
                    claim_win_in_seconds = ?gone.claim_win_in_seconds,
                    "Opponent presence changed"
                );
                Ok(self.current_step())
            }
            GameEvent::Unknown => {
                debug!("Ignoring unknown stream record");
                Ok(self.current_step())
            }
        };

        if result.is_err() {
            self.phase = Phase::Terminal;
        }
        result
    }

    fn handle_full_state(&mut self, full: GameFull) -> Result<Step, SyncError> {
        let status = full.state.status.clone().unwrap_or_default();
        if status != STATUS_STARTED {
            return Err(SyncError::GameNotStarted(status));
        }

        let side = self.match_side(&full)?;
        self.reconcile(&full.state.moves)?;

        if self.side.is_none() {
            info!(side = ?side, game_id = ?full.id, "Side assigned");
        }
        self.side = Some(side);
        Ok(self.evaluate_turn())
    }

    fn handle_delta_state(&mut self, state: GameState) -> Result<Step, SyncError> {
        self.reconcile(&state.moves)?;

        if self.side.is_none() {
            // Nothing to arbitrate until the full snapshot names the players.
            return Ok(Step::Wait);
        }
        if state.is_finished() {
            let status = state.status.unwrap_or_default();
            info!(status = %status, winner = ?state.winner, "Game over");
            self.phase = Phase::Terminal;
            return Ok(Step::Finished(status));
        }
        Ok(self.evaluate_turn())
    }

    fn match_side(&self, full: &GameFull) -> Result<Side, SyncError> {
        let is_user = |id: &Option<String>| {
            id.as_deref()
                .is_some_and(|id| id.to_lowercase() == self.user_id)
        };

        if is_user(&full.white.id) {
            Ok(Side::White)
        } else if is_user(&full.black.id) {
            Ok(Side::Black)
        } else {
            Err(SyncError::NoMatchingSide(self.user_id.clone()))
        }
    }

    /// Extend both boards to match `history`.
    ///
    /// Tokens already on the remote board are skipped. A new remote ply is
    /// mirrored locally only if the local board has not reached it yet; when
    /// it has, that ply is the user's own move coming back from the server.
    fn reconcile(&mut self, history: &str) -> Result<(), SyncError> {
        let tokens = notation::split_moves(history);

        if tokens.len() < self.board.remote_len() {
            warn!(
                known = self.board.remote_len(),
                received = tokens.len(),
                "Ignoring shorter move history"
            );
            return Ok(());
        }

        for (ply, token) in tokens.iter().enumerate().skip(self.board.remote_len()) {
            let mv = self.board.apply_remote_token(token)?;
            debug!(ply, token = %token, "Applied remote move");

            if ply >= self.board.local_len() {
                self.board.mirror_remote_move_to_local(ply)?;
            } else if !same_move(&self.board.local_moves()[ply], &mv) {
                return Err(SyncError::Diverged(ply));
            }
        }
        Ok(())
    }

    /// Decide whether the local side is to move, from the remote ply count.
    fn evaluate_turn(&mut self) -> Step {
        let Some(side) = self.side else {
            return Step::Wait;
        };

        let plies = self.board.remote_len();
        let local_to_move = Side::to_move(plies) == side;

        // A move already sent but not yet echoed also flips the parity;
        // prompting again would play twice.
        if local_to_move && !self.board.has_pending_local_move() {
            self.phase = Phase::AwaitingLocalMove;
            Step::Prompt
        } else {
            self.phase = Phase::Synced;
            Step::Wait
        }
    }

    fn current_step(&self) -> Step {
        match self.phase {
            Phase::AwaitingLocalMove => Step::Prompt,
            _ => Step::Wait,
        }
    }

    /// Feed one line of user input while a local move is awaited.
    pub fn handle_input(&mut self, input: &str) -> Result<LocalAction, SyncError> {
        if self.phase != Phase::AwaitingLocalMove {
            return Err(SyncError::NotYourTurn);
        }

        let input = input.trim();
        if QUIT_COMMANDS.contains(&input) {
            self.phase = Phase::Terminal;
            return Ok(LocalAction::Quit);
        }
        if input == RESIGN_COMMAND {
            self.phase = Phase::Terminal;
            return Ok(LocalAction::Resign);
        }

        let before = self.board.local_position().clone();
        match self.board.apply_local_token(input) {
            Ok(mv) => {
                self.phase = Phase::Synced;
                Ok(LocalAction::Submit(PendingMove {
                    uci: notation::encode_uci(&mv),
                    san: notation::encode_san(&before, &mv),
                }))
            }
            Err(err) => Ok(LocalAction::Rejected(err)),
        }
    }

    /// Completion candidates: commands first, then legal moves.
    pub fn suggestions(&self) -> Vec<String> {
        let mut suggestions = vec![RESIGN_COMMAND.to_string(), QUIT_COMMANDS[0].to_string()];
        suggestions.extend(self.board.legal_move_suggestions());
        suggestions
    }

    /// Mark the session as over after a fatal error outside the engine.
    pub fn abort(&mut self) {
        self.phase = Phase::Terminal;
    }
}

fn same_move(a: &Move, b: &Move) -> bool {
    notation::encode_uci(a) == notation::encode_uci(b)
}
