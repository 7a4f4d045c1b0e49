//! Subcommands and their execution.

use cardvault_core::{
    AppendOutcome, Environment, MasterSecret, Medium, OwnerId, Record, RestoreOutcome,
    SecretString, VaultSession,
    medium::DirMedium,
    ux::{Identity, Ux},
};
use clap::Subcommand;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::{CliError, CliIdentity, Terminal, wallet::EXPLANATION};

/// Random bytes in a new medium identity
pub const VOLUME_ID_SIZE: usize = 16;

/// Vault subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Give a directory medium its identity file (never replaces one)
    InitMedium,

    /// Append a passphrase to the vault
    Save {
        /// Owner identity, 8 hex digits
        #[arg(long)]
        owner: OwnerId,

        /// Passphrase; read from stdin when omitted
        #[arg(long)]
        secret: Option<String>,
    },

    /// Show the menu labels without revealing anything else
    List {
        /// Only list entries of this owner
        #[arg(long)]
        owner: Option<OwnerId>,
    },

    /// Choose an entry and write its passphrase to stdout
    Restore {
        /// Active identity, 8 hex digits
        #[arg(long)]
        owner: OwnerId,

        /// Entry to restore; asked interactively when omitted
        #[arg(long)]
        index: Option<usize>,

        /// Only offer entries owned by the active identity
        #[arg(long)]
        filter: bool,
    },
}

/// Create the identity file of a directory medium.
///
/// Returns false if the medium already had one.
pub fn init_medium<E: Environment>(medium: &DirMedium, env: &E) -> Result<bool, CliError> {
    let mut raw = [0u8; VOLUME_ID_SIZE];
    env.random_bytes(&mut raw);

    let mut volume_id = hex::encode(raw);
    volume_id.push('\n');

    Ok(medium.initialize(volume_id.as_bytes())?)
}

/// Append a passphrase, reading it from the terminal if not given.
pub async fn save<M, S, E, R, W>(
    session: &mut VaultSession<'_, M, S, E>,
    terminal: &mut Terminal<R, W>,
    owner: OwnerId,
    secret: Option<String>,
) -> Result<AppendOutcome, CliError>
where
    M: Medium,
    S: MasterSecret,
    E: Environment,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let secret = match secret {
        Some(secret) if !secret.is_empty() => SecretString::new(secret),
        Some(_) => return Err(CliError::EmptySecret),
        None => terminal.read_secret().await?,
    };

    let outcome = session.append(terminal, Record::new(owner, secret)).await?;
    if outcome == AppendOutcome::Cancelled {
        terminal.write_line("Not saved.").await;
    }
    Ok(outcome)
}

/// Write the menu labels, returning how many there are.
pub async fn list<M, S, E, R, W>(
    session: &mut VaultSession<'_, M, S, E>,
    terminal: &mut Terminal<R, W>,
    owner: Option<OwnerId>,
) -> usize
where
    M: Medium,
    S: MasterSecret,
    E: Environment,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let menu = match owner {
        Some(owner) => session.build_menu_for(owner),
        None => session.build_menu(),
    };

    let Some(menu) = menu else {
        terminal.write_line("No saved passphrases.").await;
        return 0;
    };

    for item in menu.items() {
        terminal.write_line(&format!("{:>3}  {}", item.index, item.label)).await;
    }
    menu.len()
}

/// Offer the vault and apply the chosen entry to `identity`.
///
/// The explanation is shown once per device, before the first menu.
pub async fn restore<M, S, E, R, W>(
    session: &mut VaultSession<'_, M, S, E>,
    terminal: &mut Terminal<R, W>,
    identity: &mut CliIdentity,
) -> Result<RestoreOutcome, CliError>
where
    M: Medium,
    S: MasterSecret,
    E: Environment,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    if !identity.skip_explanation() {
        terminal.show_story(EXPLANATION, "Passphrase").await;
    }

    let outcome = session.restore(terminal, identity).await?;

    match outcome {
        RestoreOutcome::Unavailable => terminal.write_line("No saved passphrases.").await,
        RestoreOutcome::Dismissed => terminal.write_line("Nothing restored.").await,
        RestoreOutcome::Restored { .. } => {},
    }
    Ok(outcome)
}
