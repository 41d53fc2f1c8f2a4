//! Terminal input.
//!
//! Without a line editor, completions are shown on request: `?` lists every
//! candidate and `N?` lists candidates starting with `N`.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::error::ClientError;

const PROMPT: &str = "> ";
const HELP_SUFFIX: char = '?';

#[async_trait]
pub trait Prompt: Send {
    /// Read one line from the user. `None` means input is closed.
    /// `suggestions` are advisory only.
    async fn read_line(&mut self, suggestions: &[String]) -> Result<Option<String>, ClientError>;

    /// Show a short message to the user.
    async fn notice(&mut self, message: &str) -> Result<(), ClientError>;
}

/// Case-insensitive prefix filter on the last word of `input`.
pub fn filter_suggestions<'a>(suggestions: &'a [String], input: &str) -> Vec<&'a str> {
    let word = input.split_whitespace().last().unwrap_or("").to_lowercase();
    suggestions
        .iter()
        .filter(|s| s.to_lowercase().starts_with(&word))
        .map(String::as_str)
        .collect()
}

pub struct StdinPrompt {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

async fn write_stdout(text: &str) -> Result<(), ClientError> {
    let mut out = tokio::io::stdout();
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn read_line(&mut self, suggestions: &[String]) -> Result<Option<String>, ClientError> {
        loop {
            write_stdout(PROMPT).await?;
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };

            let line = line.trim();
            if let Some(prefix) = line.strip_suffix(HELP_SUFFIX) {
                let matches = filter_suggestions(suggestions, prefix);
                write_stdout(&format!("{}\n", matches.join(" "))).await?;
                continue;
            }
            return Ok(Some(line.to_string()));
        }
    }

    async fn notice(&mut self, message: &str) -> Result<(), ClientError> {
        write_stdout(&format!("{message}\n")).await
    }
}
