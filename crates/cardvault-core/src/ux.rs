//! Collaborator traits for the user-facing side of vault flows.
//!
//! The core never draws anything or reads keys. A frontend implements
//! [`Ux`] for messages and the medium prompt, [`MenuHost`] for the entry
//! picker, and [`Identity`] for the wallet the restored secret is applied to.
//! The CLI implements them over a terminal; tests implement them with
//! scripted answers.

use std::future::Future;

use crate::{IdentityError, MenuItem, OwnerId};

/// Title of stories reporting a failed operation
pub const FAIL_TITLE: &str = "Fail";

/// Answer to the "insert medium" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumPrompt {
    /// User reinserted the medium and wants another attempt
    Retry,
    /// User gave up; the operation ends without writing
    Cancel,
}

/// Display surface for progress messages, stories and the medium prompt.
pub trait Ux: Send {
    /// Short status line that is replaced by the next message.
    fn show_transient(&mut self, text: &str) -> impl Future<Output = ()> + Send;

    /// Message the user has to acknowledge.
    fn show_story(&mut self, text: &str, title: &str) -> impl Future<Output = ()> + Send;

    /// Ask the user to insert the medium.
    ///
    /// Called with no medium acquired. Suspends until the user answers.
    fn prompt_medium(&mut self) -> impl Future<Output = MediumPrompt> + Send;
}

/// Menu widget showing vault entries.
pub trait MenuHost: Send {
    /// Present `items` and wait for a choice.
    ///
    /// Returns the chosen item's `index`, or `None` if the user backed out.
    fn choose(&mut self, items: &[MenuItem]) -> impl Future<Output = Option<usize>> + Send;
}

/// The wallet identity a restored secret is applied to.
pub trait Identity: Send {
    /// Identity currently active on the device.
    fn active_owner(&self) -> OwnerId;

    /// Use `secret` as the passphrase for the active identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] with a user-facing reason if the active
    /// identity cannot take a passphrase.
    fn apply_secret(&mut self, secret: &str) -> Result<(), IdentityError>;

    /// Whether the one-time passphrase explanation was already dismissed.
    fn skip_explanation(&self) -> bool;

    /// Mark the passphrase explanation as dismissed.
    fn set_skip_explanation(&mut self);
}
