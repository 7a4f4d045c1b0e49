//! One vault session on one medium slot.
//!
//! A [`VaultSession`] owns the derived key for as long as the user works with
//! the vault and drops it with the session. The key is remembered together
//! with the medium identity it was derived for; if a different card shows up
//! (for example after a medium-missing retry) the key is derived again.
//!
//! Every medium access acquires the slot, does its work and releases the slot
//! before the next await point. The blob itself is never cached: append is
//! read-modify-write in one scoped call, restore reads once per menu.

use cardvault_crypto::VaultKey;

use crate::{
    Environment, KeyUnavailable, MasterSecret, Medium, MediumSlot, OwnerId, Record, VaultError,
    VaultMenu,
    codec::{decrypt_or_empty, decrypt_records, encrypt_records},
    derive_key, store,
    ux::{FAIL_TITLE, Identity, MediumPrompt, MenuHost, Ux},
};

/// Transient message shown before each save attempt
pub const SAVING_TEXT: &str = "Saving...";

/// Transient message shown after a successful save
pub const SAVED_TEXT: &str = "Saved.";

/// Result of [`VaultSession::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Record written; `count` records are now in the vault
    Saved {
        /// Vault size after the append
        count: usize,
    },
    /// User cancelled the medium prompt; nothing was written
    Cancelled,
}

/// Result of [`VaultSession::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Secret applied to the active identity
    Restored {
        /// Identity the secret was applied to
        owner: OwnerId,
    },
    /// No vault to offer: no medium, no file, no key or no records
    Unavailable,
    /// User closed the menu without choosing
    Dismissed,
}

struct CachedKey {
    identity: Vec<u8>,
    key: VaultKey,
}

/// Vault operations against one medium with one master secret.
pub struct VaultSession<'a, M, S, E> {
    medium: &'a M,
    master: &'a S,
    env: E,
    owner_filter: bool,
    key: Option<CachedKey>,
}

impl<'a, M, S, E> VaultSession<'a, M, S, E>
where
    M: Medium,
    S: MasterSecret,
    E: Environment,
{
    /// Start a session. Nothing is derived until the first vault access.
    pub fn new(medium: &'a M, master: &'a S, env: E) -> Self {
        Self { medium, master, env, owner_filter: false, key: None }
    }

    /// Only offer entries owned by the active identity on restore.
    ///
    /// Off by default: every entry is listed and ownership is checked when
    /// one is selected.
    #[must_use]
    pub fn with_owner_filter(mut self, enabled: bool) -> Self {
        self.owner_filter = enabled;
        self
    }

    /// Key for the medium behind `slot`, derived on first use per card.
    fn key_for(&mut self, slot: &M::Slot) -> Result<VaultKey, VaultError> {
        let identity = slot.identity_hash().map_err(|err| {
            if err.is_missing() {
                VaultError::MediumMissing
            } else {
                KeyUnavailable::MediumIdentity(err.to_string()).into()
            }
        })?;

        if let Some(cached) = &self.key {
            if cached.identity == identity {
                return Ok(cached.key.clone());
            }
            tracing::debug!("medium identity changed, deriving new vault key");
        }

        let key = derive_key(self.master, &identity)?;
        self.key = Some(CachedKey { identity, key: key.clone() });
        Ok(key)
    }

    /// Read every record, keeping the failure kind.
    ///
    /// A medium without a vault file yields an empty list without deriving
    /// a key.
    ///
    /// # Errors
    ///
    /// `MediumMissing`, `Storage`, `KeyUnavailable` or `Decrypt`.
    pub fn load(&mut self) -> Result<Vec<Record>, VaultError> {
        let slot = self.medium.acquire()?;

        if !store::exists(&slot)? {
            tracing::debug!("no vault file on medium");
            return Ok(Vec::new());
        }

        let key = self.key_for(&slot)?;
        match store::read(&slot)? {
            Some(blob) => Ok(decrypt_records(&key, &blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Read every record, treating any failure as an empty vault.
    pub fn load_or_empty(&mut self) -> Vec<Record> {
        self.load().unwrap_or_else(|err| {
            if err.degrades_to_empty() {
                tracing::warn!(error = %err, "vault unavailable, treating as empty");
            } else {
                tracing::error!(error = %err, "vault read failed, treating as empty");
            }
            Vec::new()
        })
    }

    /// One append attempt: derive, read, decrypt, push, encrypt, write.
    ///
    /// An unreadable existing vault is treated as empty and replaced. No
    /// prompting happens here; the slot is released before returning.
    ///
    /// # Errors
    ///
    /// `MediumMissing` is worth retrying after the user reinserts the card.
    /// Everything else is final.
    pub fn try_append(&mut self, record: &Record) -> Result<usize, VaultError> {
        let slot = self.medium.acquire()?;
        let key = self.key_for(&slot)?;

        let mut records = match store::read(&slot)? {
            Some(blob) => decrypt_or_empty(&key, &blob),
            None => Vec::new(),
        };
        records.push(record.clone());

        let blob = encrypt_records(&key, &records, &self.env)?;
        store::write(&slot, &blob)?;

        tracing::debug!(owner = %record.owner_id, count = records.len(), "vault record appended");
        Ok(records.len())
    }

    /// Append `record`, asking for the medium until it works or the user
    /// cancels.
    ///
    /// Each attempt restarts from a fresh read, so a retry never loses
    /// records written by an earlier session. Failures other than a missing
    /// medium are shown as a story titled [`FAIL_TITLE`] and returned.
    ///
    /// # Errors
    ///
    /// Any [`try_append`](Self::try_append) error except `MediumMissing`.
    pub async fn append<U: Ux>(
        &mut self,
        ux: &mut U,
        record: Record,
    ) -> Result<AppendOutcome, VaultError> {
        loop {
            ux.show_transient(SAVING_TEXT).await;

            match self.try_append(&record) {
                Ok(count) => {
                    ux.show_transient(SAVED_TEXT).await;
                    return Ok(AppendOutcome::Saved { count });
                },
                Err(err) if err.is_retryable() => {
                    tracing::warn!("medium missing during save, prompting");
                    match ux.prompt_medium().await {
                        MediumPrompt::Retry => {},
                        MediumPrompt::Cancel => {
                            tracing::debug!("save cancelled at medium prompt");
                            return Ok(AppendOutcome::Cancelled);
                        },
                    }
                },
                Err(err) => {
                    tracing::error!(error = %err, "save failed");
                    ux.show_story(&err.to_string(), FAIL_TITLE).await;
                    return Err(err);
                },
            }
        }
    }

    /// Menu over the current vault, or `None` if there is nothing to offer.
    pub fn build_menu(&mut self) -> Option<VaultMenu> {
        VaultMenu::new(self.load_or_empty())
    }

    /// Menu over the entries owned by `owner`.
    pub fn build_menu_for(&mut self, owner: OwnerId) -> Option<VaultMenu> {
        VaultMenu::for_owner(self.load_or_empty(), owner)
    }

    /// Offer the vault as a menu and apply the chosen secret.
    ///
    /// `ux` shows the menu as well as the outcome stories.
    ///
    /// # Errors
    ///
    /// The [`VaultMenu::select`] errors. A missing or empty vault is
    /// [`RestoreOutcome::Unavailable`], not an error.
    pub async fn restore<U, I>(
        &mut self,
        ux: &mut U,
        identity: &mut I,
    ) -> Result<RestoreOutcome, VaultError>
    where
        U: Ux + MenuHost,
        I: Identity,
    {
        let menu = if self.owner_filter {
            self.build_menu_for(identity.active_owner())
        } else {
            self.build_menu()
        };

        let Some(menu) = menu else {
            return Ok(RestoreOutcome::Unavailable);
        };

        let Some(index) = ux.choose(menu.items()).await else {
            return Ok(RestoreOutcome::Dismissed);
        };

        let owner = menu.select(index, identity, ux).await?;
        Ok(RestoreOutcome::Restored { owner })
    }
}
