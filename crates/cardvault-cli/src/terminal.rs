//! Line-based terminal implementing the vault collaborators.
//!
//! Messages, stories and prompts go to `output` (stderr in the binary) so
//! that stdout carries nothing but a restored passphrase. Input is read one
//! line at a time; end of input counts as "cancel".

use cardvault_core::{
    MenuItem, SecretString,
    ux::{MediumPrompt, MenuHost, Ux},
};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::CliError;

/// Shown when the medium is missing during a save
pub const MEDIUM_PROMPT: &str = "Insert the card and press Enter to retry, or type c to cancel.";

/// Shown before reading an entry number
pub const CHOOSE_PROMPT: &str = "Select entry (blank to go back):";

/// Shown before reading a passphrase to save
pub const SECRET_PROMPT: &str = "Passphrase to save:";

/// Terminal over any async line reader and writer.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    selection: Option<usize>,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a terminal.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output, selection: None }
    }

    /// Answer the next menu with `index` instead of asking.
    #[must_use]
    pub fn with_selection(mut self, index: Option<usize>) -> Self {
        self.selection = index;
        self
    }

    /// Consume the terminal, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read a passphrase line.
    ///
    /// # Errors
    ///
    /// `EmptySecret` on end of input or an empty line.
    pub async fn read_secret(&mut self) -> Result<SecretString, CliError> {
        self.write_line(SECRET_PROMPT).await;
        match self.read_line().await? {
            Some(line) if !line.is_empty() => Ok(SecretString::new(line)),
            _ => Err(CliError::EmptySecret),
        }
    }

    /// Write one line, logging instead of failing.
    pub async fn write_line(&mut self, text: &str) {
        if let Err(err) = self.try_write_line(text).await {
            tracing::warn!(error = %err, "terminal write failed");
        }
    }

    async fn try_write_line(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Next line without its line ending, or `None` at end of input.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R, W> Ux for Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn show_transient(&mut self, text: &str) {
        self.write_line(text).await;
    }

    async fn show_story(&mut self, text: &str, title: &str) {
        self.write_line(&format!("== {title} ==")).await;
        self.write_line(text).await;
    }

    async fn prompt_medium(&mut self) -> MediumPrompt {
        self.write_line(MEDIUM_PROMPT).await;
        match self.read_line().await {
            Ok(Some(answer)) if !answer.trim().eq_ignore_ascii_case("c") => MediumPrompt::Retry,
            Ok(_) => MediumPrompt::Cancel,
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed, cancelling");
                MediumPrompt::Cancel
            },
        }
    }
}

impl<R, W> MenuHost for Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn choose(&mut self, items: &[MenuItem]) -> Option<usize> {
        for item in items {
            self.write_line(&format!("{:>3}  {}", item.index, item.label)).await;
        }

        if let Some(index) = self.selection.take() {
            return Some(index);
        }

        self.write_line(CHOOSE_PROMPT).await;
        let answer = match self.read_line().await {
            Ok(Some(answer)) => answer,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed");
                return None;
            },
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }

        match answer.parse() {
            Ok(index) => Some(index),
            Err(_) => {
                self.write_line(&format!("not an entry number: {answer}")).await;
                None
            },
        }
    }
}
