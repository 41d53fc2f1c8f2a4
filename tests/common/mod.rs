//! In-process mock of the lichess Board API plus a scripted prompt.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use board_cli::config::Config;
use board_cli::error::ClientError;
use board_cli::prompt::Prompt;
use serde_json::json;

pub const TOKEN: &str = "lip_test_token";
pub const GAME_ID: &str = "5IrD6Gzz";

pub struct MockLichess {
    pub records: Vec<String>,
    pub move_status: StatusCode,
    pub moves: Mutex<Vec<String>>,
    pub resigned: Mutex<bool>,
}

impl MockLichess {
    pub fn new(records: Vec<String>) -> Self {
        Self {
            records,
            move_status: StatusCode::OK,
            moves: Mutex::new(Vec::new()),
            resigned: Mutex::new(false),
        }
    }

    pub fn moves(&self) -> Vec<String> {
        self.moves.lock().unwrap().clone()
    }

    pub fn resigned(&self) -> bool {
        *self.resigned.lock().unwrap()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn stream(
    State(mock): State<Arc<MockLichess>>,
    Path(game_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if game_id != GAME_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    let body: String = mock.records.iter().map(|r| format!("{r}\n")).collect();
    ([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response()
}

async fn play(
    State(mock): State<Arc<MockLichess>>,
    Path((game_id, uci)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) || game_id != GAME_ID {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if mock.move_status != StatusCode::OK {
        return (mock.move_status, Json(json!({ "error": "Not your turn" }))).into_response();
    }

    mock.moves.lock().unwrap().push(uci);
    Json(json!({ "ok": true })).into_response()
}

async fn resign(
    State(mock): State<Arc<MockLichess>>,
    Path(game_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) || game_id != GAME_ID {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    *mock.resigned.lock().unwrap() = true;
    Json(json!({ "ok": true })).into_response()
}

/// Serve `mock` on an ephemeral port and return its base URL.
pub async fn serve(mock: Arc<MockLichess>) -> String {
    let app = Router::new()
        .route("/api/board/game/stream/{game_id}", get(stream))
        .route("/api/board/game/{game_id}/move/{uci}", post(play))
        .route("/api/board/game/{game_id}/resign", post(resign))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn config(base_url: &str, token: &str, user: &str) -> Config {
    Config {
        auth_token: token.to_string(),
        game_id: GAME_ID.to_string(),
        user_id: user.to_lowercase(),
        base_url: base_url.to_string(),
    }
}

pub fn game_full(white: &str, black: &str, moves: &str) -> String {
    json!({
        "type": "gameFull",
        "id": GAME_ID,
        "white": { "id": white, "name": white },
        "black": { "id": black, "name": black },
        "initialFen": "startpos",
        "state": { "type": "gameState", "moves": moves, "status": "started" },
    })
    .to_string()
}

pub fn game_state(moves: &str) -> String {
    json!({ "type": "gameState", "moves": moves, "status": "started" }).to_string()
}

/// Replays canned input lines.
pub struct ScriptedPrompt {
    inputs: VecDeque<String>,
    pub notices: Vec<String>,
    pub last_suggestions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            notices: Vec::new(),
            last_suggestions: Vec::new(),
        }
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn read_line(&mut self, suggestions: &[String]) -> Result<Option<String>, ClientError> {
        self.last_suggestions = suggestions.to_vec();
        Ok(self.inputs.pop_front())
    }

    async fn notice(&mut self, message: &str) -> Result<(), ClientError> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
