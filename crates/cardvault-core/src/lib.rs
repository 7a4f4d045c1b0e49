//! Cardvault core
//!
//! Stores an append-only list of passphrase records on removable media,
//! encrypted under a key bound to both the device and the medium, and offers
//! them back through a menu whose labels hint at each entry without showing
//! it.
//!
//! # Components
//!
//! - [`derive_key`]: device master secret + medium identity -> [`VaultKey`]
//! - [`codec`]: whole-list encrypt/decrypt of the record blob
//! - [`store`]: fixed-path read/write on a [`MediumSlot`]
//! - [`hints`]: minimal distinguishing fragments for a set of secrets
//! - [`VaultMenu`]: hint labels, selection and identity check
//! - [`VaultSession`]: one medium session tying the above together
//!
//! # Flows
//!
//! ```text
//! append:  derive key -> read + decrypt -> push -> encrypt -> write
//! restore: exists? -> derive key -> read + decrypt -> hints -> menu -> apply
//! ```
//!
//! Collaborators outside this crate (display, menu widget, wallet identity)
//! are reached through the traits in [`ux`]; removable storage through
//! [`Medium`]; the device secret through [`MasterSecret`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod deriver;
mod env;
mod error;
pub mod hints;
mod master;
pub mod medium;
mod menu;
mod model;
mod session;
pub mod store;
pub mod ux;

pub use cardvault_crypto::VaultKey;
pub use deriver::derive_key;
pub use env::{Environment, SeededEnv, SystemEnv};
pub use error::{DecryptFailure, IdentityError, KeyUnavailable, VaultError};
pub use master::{
    DeviceKeyFile, DeviceSecret, DeviceSecretHandle, MasterSecret, MasterSecretError, SecretHandle,
};
pub use medium::{Medium, MediumError, MediumSlot};
pub use menu::{MenuItem, VaultMenu};
pub use model::{OwnerId, ParseOwnerIdError, Record, SecretString};
pub use session::{AppendOutcome, RestoreOutcome, VaultSession};
