use std::process::ExitCode;

use board_cli::clients::lichess::LichessClient;
use board_cli::config::{Args, Config};
use board_cli::prompt::StdinPrompt;
use board_cli::session::{Outcome, Session};

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the prompt
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(outcome) => {
            match outcome {
                Outcome::GameOver(status) => println!("Game over: {status}"),
                Outcome::StreamEnded => println!("Game stream closed"),
                Outcome::Quit | Outcome::Resigned => {}
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<Outcome> {
    let config = Config::from_args(args)?;
    let client = LichessClient::new(&config)?;

    let mut session = Session::new(client, StdinPrompt::new(), &config.game_id, &config.user_id);
    Ok(session.run().await?)
}
