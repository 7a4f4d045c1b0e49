//! Restore menu built from decrypted vault records.
//!
//! Entries are the distinct secrets in first-seen order, labelled with hint
//! fragments. Selecting an entry maps it back to the records holding that
//! secret and checks ownership against the active identity before anything
//! is applied.

use crate::{
    OwnerId, Record, SecretString, VaultError,
    hints::{self, Reveal},
    ux::{FAIL_TITLE, Identity, Ux},
};

/// Story shown after a secret was applied
pub const RESTORED_TEXT: &str = "Passphrase restored.";

/// One selectable menu line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Masked hint fragment
    pub label: String,
    /// Position in the menu, passed back on selection
    pub index: usize,
}

/// Selectable list of vault entries for one restore.
///
/// Holds the decrypted records for the lifetime of the menu only.
pub struct VaultMenu {
    records: Vec<Record>,
    secrets: Vec<SecretString>,
    items: Vec<MenuItem>,
    reveal: Reveal,
}

impl VaultMenu {
    /// Build a menu over every record.
    ///
    /// Returns `None` for an empty record list: an empty vault offers no menu.
    pub fn new(records: Vec<Record>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let unique = hints::dedup(records.iter().map(|record| record.secret.expose()));
        let secrets: Vec<SecretString> = unique.iter().map(|&secret| secret.into()).collect();
        let hints = hints::compute_hints(&unique);
        let reveal = hints.reveal();

        let items = hints
            .into_fragments()
            .into_iter()
            .enumerate()
            .map(|(index, label)| MenuItem { label, index })
            .collect();

        tracing::debug!(records = records.len(), entries = secrets.len(), ?reveal, "vault menu built");

        Some(Self { records, secrets, items, reveal })
    }

    /// Build a menu over the records owned by `owner` only.
    ///
    /// Hints are computed over the filtered set, so labels can be shorter
    /// than in the unfiltered menu.
    pub fn for_owner(records: Vec<Record>, owner: OwnerId) -> Option<Self> {
        Self::new(records.into_iter().filter(|record| record.owner_id == owner).collect())
    }

    /// Menu lines in display order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Reveal mode the labels were built with.
    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed menu.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve entry `index` for the `active` identity.
    ///
    /// The entry is accepted if any record with that secret is owned by
    /// `active`. Otherwise the owner of the first such record is reported.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `index` is out of range
    /// - `IdentityMismatch` if no matching record belongs to `active`
    pub fn resolve(&self, index: usize, active: OwnerId) -> Result<&SecretString, VaultError> {
        let secret = self.secrets.get(index).ok_or(VaultError::NotFound { index })?;

        let mut owners =
            self.records.iter().filter(|record| record.secret == *secret).map(|r| r.owner_id);

        let first = owners.next().ok_or(VaultError::NotFound { index })?;
        if first == active || owners.any(|owner| owner == active) {
            return Ok(secret);
        }

        Err(VaultError::IdentityMismatch { record: first, active })
    }

    /// Apply entry `index` to the active identity.
    ///
    /// Every failure is also reported to the user as a story titled
    /// [`FAIL_TITLE`]. On success the passphrase explanation is marked as
    /// seen and a confirmation story names the owner.
    ///
    /// # Errors
    ///
    /// Returns the [`resolve`](Self::resolve) errors, or `Rejected` if the
    /// identity refused the secret.
    pub async fn select<I, U>(
        &self,
        index: usize,
        identity: &mut I,
        ux: &mut U,
    ) -> Result<OwnerId, VaultError>
    where
        I: Identity,
        U: Ux,
    {
        let active = identity.active_owner();

        let secret = match self.resolve(index, active) {
            Ok(secret) => secret,
            Err(err) => {
                tracing::warn!(index, %active, error = %err, "vault entry refused");
                ux.show_story(&err.to_string(), FAIL_TITLE).await;
                return Err(err);
            },
        };

        if let Err(rejection) = identity.apply_secret(secret.expose()) {
            tracing::warn!(index, %active, "identity rejected restored secret");
            ux.show_story(&rejection.reason, FAIL_TITLE).await;
            return Err(rejection.into());
        }

        if !identity.skip_explanation() {
            identity.set_skip_explanation();
        }

        tracing::debug!(index, %active, "passphrase restored");
        ux.show_story(RESTORED_TEXT, &format!("[{active}]")).await;

        Ok(active)
    }
}

impl std::fmt::Debug for VaultMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultMenu")
            .field("records", &self.records.len())
            .field("entries", &self.items.len())
            .field("reveal", &self.reveal)
            .finish()
    }
}
