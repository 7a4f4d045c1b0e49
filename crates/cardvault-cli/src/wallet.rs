//! Identity used by the command line.
//!
//! There is no wallet behind the CLI: "applying" a restored passphrase means
//! handing it back to the caller, who prints it. The one-time explanation
//! flag persists as a marker file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cardvault_core::{IdentityError, OwnerId, SecretString, ux::Identity};

/// Shown before the first restore on a device
pub const EXPLANATION: &str = "The restored passphrase is written to stdout. It is not kept \
                               anywhere else; pipe it where it is needed.";

/// Identity named on the command line.
#[derive(Debug)]
pub struct CliIdentity {
    owner: OwnerId,
    marker: Option<PathBuf>,
    skip: bool,
    restored: Option<SecretString>,
}

impl CliIdentity {
    /// Identity `owner` with the explanation flag kept at `marker`.
    pub fn new(owner: OwnerId, marker: Option<PathBuf>) -> Self {
        let skip = marker.as_deref().is_some_and(Path::exists);
        Self { owner, marker, skip, restored: None }
    }

    /// Take the passphrase applied by the last restore.
    pub fn take_restored(&mut self) -> Option<SecretString> {
        self.restored.take()
    }
}

impl Identity for CliIdentity {
    fn active_owner(&self) -> OwnerId {
        self.owner
    }

    fn apply_secret(&mut self, secret: &str) -> Result<(), IdentityError> {
        if secret.is_empty() {
            return Err(IdentityError::new("Empty passphrase cannot be applied."));
        }
        self.restored = Some(secret.into());
        Ok(())
    }

    fn skip_explanation(&self) -> bool {
        self.skip
    }

    fn set_skip_explanation(&mut self) {
        self.skip = true;
        let Some(marker) = &self.marker else {
            return;
        };
        if let Err(err) = fs::write(marker, b"") {
            tracing::warn!(path = %marker.display(), error = %err, "could not persist explanation flag");
        }
    }
}
