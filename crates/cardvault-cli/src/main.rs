//! Cardvault binary.
//!
//! # Usage
//!
//! ```bash
//! # Prepare a mounted card once
//! cardvault --medium /media/card init-medium
//!
//! # Save a passphrase for identity 0F056943
//! cardvault --medium /media/card --device-secret ~/.cardvault/device.key \
//!     save --owner 0F056943
//!
//! # Restore it later
//! cardvault --medium /media/card --device-secret ~/.cardvault/device.key \
//!     restore --owner 0F056943
//! ```

use std::path::PathBuf;

use cardvault_cli::{CliError, CliIdentity, Command, Terminal, commands};
use cardvault_core::{DeviceKeyFile, SystemEnv, VaultSession, medium::DirMedium};
use clap::Parser;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Encrypted passphrase vault on removable media
#[derive(Parser, Debug)]
#[command(name = "cardvault")]
#[command(about = "Save and restore passphrases on a removable card")]
#[command(version)]
struct Args {
    /// Mount point of the card
    #[arg(short, long)]
    medium: PathBuf,

    /// File holding the device key material
    #[arg(short = 'k', long)]
    device_secret: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Marker recording that the restore explanation was shown.
fn explanation_marker(device_secret: &std::path::Path) -> PathBuf {
    let mut name = device_secret.as_os_str().to_owned();
    name.push(".seen");
    PathBuf::from(name)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let medium = DirMedium::new(&args.medium);
    let env = SystemEnv::new();
    let mut terminal = Terminal::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr());

    if args.command == Command::InitMedium {
        if commands::init_medium(&medium, &env)? {
            terminal.write_line("Card initialized.").await;
        } else {
            terminal.write_line("Card already has an identity.").await;
        }
        return Ok(());
    }

    let key_path = args.device_secret.ok_or(CliError::MissingDeviceSecret)?;
    let device = DeviceKeyFile::new(&key_path);
    tracing::debug!(medium = %args.medium.display(), "vault session starting");

    match args.command {
        Command::InitMedium => {},
        Command::Save { owner, secret } => {
            let mut session = VaultSession::new(&medium, &device, env);
            commands::save(&mut session, &mut terminal, owner, secret).await?;
        },
        Command::List { owner } => {
            let mut session = VaultSession::new(&medium, &device, env);
            commands::list(&mut session, &mut terminal, owner).await;
        },
        Command::Restore { owner, index, filter } => {
            let mut session =
                VaultSession::new(&medium, &device, env).with_owner_filter(filter);
            let mut terminal = terminal.with_selection(index);
            let mut identity = CliIdentity::new(owner, Some(explanation_marker(&key_path)));

            commands::restore(&mut session, &mut terminal, &mut identity).await?;

            if let Some(secret) = identity.take_restored() {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(secret.expose().as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        },
    }

    Ok(())
}
