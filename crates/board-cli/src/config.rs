use clap::Parser;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://lichess.org";

/// Play a lichess game from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "board-cli")]
#[command(about = "Play a lichess Board API game from the terminal")]
pub struct Args {
    /// Personal API token with the board:play scope.
    #[arg(long, env = "LICHESS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Id of the game to join.
    #[arg(long = "game-id", env = "LICHESS_GAME_ID")]
    pub game_id: String,

    /// Your lichess user id.
    #[arg(long, env = "LICHESS_USER")]
    pub user: String,

    /// Server base URL.
    #[arg(long = "base-url", env = "LICHESS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub auth_token: String,
    pub game_id: String,
    /// Always lowercase.
    pub user_id: String,
    pub base_url: String,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ClientError> {
        let auth_token = non_empty(args.token, "missing lichess auth token")?;
        let game_id = non_empty(args.game_id, "missing lichess game id")?;
        let user_id = non_empty(args.user, "missing lichess user id")?.to_lowercase();
        let base_url = args.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("empty base URL"));
        }

        Ok(Self {
            auth_token,
            game_id,
            user_id,
            base_url,
        })
    }
}

fn non_empty(value: String, missing: &'static str) -> Result<String, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClientError::Config(missing))
    } else {
        Ok(value.to_string())
    }
}
