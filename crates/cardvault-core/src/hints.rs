//! Disambiguation hints for secrets shown in a menu.
//!
//! The menu must let the user tell entries apart without putting any secret
//! on screen. Each secret is shown with only its first or last N characters
//! visible and the rest masked, using the smallest N that makes every label
//! unique.
//!
//! For N = 1 to [`MAX_REVEAL`], prefix reveal is tried before suffix reveal.
//! If nothing in that range separates the set, the secrets are shown in full:
//! picking the right entry matters more than hiding near-identical ones.
//!
//! Lengths count Unicode scalar values, not bytes.

use std::collections::HashSet;

/// Character used to mask hidden positions
pub const MASK_CHAR: char = '*';

/// Largest number of characters revealed before giving up and showing all
pub const MAX_REVEAL: usize = 7;

/// How much of each secret the fragments reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// First N characters visible
    Prefix(usize),
    /// Last N characters visible
    Suffix(usize),
    /// Secrets shown unmasked
    Full,
}

/// Display fragments for a set of secrets, in input order.
#[derive(Clone, PartialEq, Eq)]
pub struct Hints {
    reveal: Reveal,
    fragments: Vec<String>,
}

impl Hints {
    /// Reveal mode that made the fragments distinct.
    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    /// Fragments, one per input secret.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Take the fragments.
    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }
}

impl std::fmt::Debug for Hints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Full reveal fragments are the secrets themselves
        f.debug_struct("Hints")
            .field("reveal", &self.reveal)
            .field("count", &self.fragments.len())
            .finish_non_exhaustive()
    }
}

/// Compute distinguishing fragments for pairwise-distinct secrets.
///
/// Remove duplicates with [`dedup`] first: two equal secrets can never be
/// told apart, so any input containing them ends in [`Reveal::Full`].
pub fn compute_hints<S: AsRef<str>>(secrets: &[S]) -> Hints {
    for n in 1..=MAX_REVEAL {
        let prefixed: Vec<String> = secrets.iter().map(|s| mask_prefix(s.as_ref(), n)).collect();
        if all_distinct(prefixed.iter().map(String::as_str)) {
            return Hints { reveal: Reveal::Prefix(n), fragments: prefixed };
        }

        let suffixed: Vec<String> = secrets.iter().map(|s| mask_suffix(s.as_ref(), n)).collect();
        if all_distinct(suffixed.iter().map(String::as_str)) {
            return Hints { reveal: Reveal::Suffix(n), fragments: suffixed };
        }
    }

    tracing::debug!(count = secrets.len(), "no hint length separates secrets, revealing in full");
    Hints {
        reveal: Reveal::Full,
        fragments: secrets.iter().map(|s| s.as_ref().to_string()).collect(),
    }
}

/// Deduplicate secrets by exact value, keeping first-seen order.
pub fn dedup<'a, I>(secrets: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    secrets.into_iter().filter(|secret| seen.insert(*secret)).collect()
}

/// First `n` characters, then one mask per remaining character.
fn mask_prefix(secret: &str, n: usize) -> String {
    let len = secret.chars().count();
    let mut fragment: String = secret.chars().take(n).collect();
    fragment.extend(std::iter::repeat_n(MASK_CHAR, len.saturating_sub(n)));
    fragment
}

/// One mask per leading hidden character, then the last `n` characters.
fn mask_suffix(secret: &str, n: usize) -> String {
    let len = secret.chars().count();
    let hidden = len.saturating_sub(n);
    let mut fragment: String = std::iter::repeat_n(MASK_CHAR, hidden).collect();
    fragment.extend(secret.chars().skip(hidden));
    fragment
}

fn all_distinct<'a>(mut fragments: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    fragments.all(|fragment| seen.insert(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_output() {
        let hints = compute_hints::<&str>(&[]);
        assert!(hints.fragments().is_empty());
    }

    #[test]
    fn single_secret_reveals_one_character() {
        let hints = compute_hints(&["hunter2"]);

        assert_eq!(hints.reveal(), Reveal::Prefix(1));
        assert_eq!(hints.fragments(), ["h******"]);
    }

    #[test]
    fn shared_first_letter_needs_two() {
        let hints = compute_hints(&["alpha", "apple", "azure"]);

        assert_eq!(hints.reveal(), Reveal::Prefix(2));
        assert_eq!(hints.fragments(), ["al***", "ap***", "az***"]);
    }

    #[test]
    fn suffix_is_tried_before_longer_prefix() {
        let hints = compute_hints(&["secret-a", "secret-b"]);

        assert_eq!(hints.reveal(), Reveal::Suffix(1));
        assert_eq!(hints.fragments(), ["*******a", "*******b"]);
    }

    #[test]
    fn short_secrets_are_not_padded() {
        let hints = compute_hints(&["ab", "abc"]);

        // N=1 prefix: "a*" vs "a**" already differ by length
        assert_eq!(hints.reveal(), Reveal::Prefix(1));
        assert_eq!(hints.fragments(), ["a*", "a**"]);
    }

    #[test]
    fn secret_shorter_than_n_is_fully_visible() {
        assert_eq!(mask_prefix("ab", 5), "ab");
        assert_eq!(mask_suffix("ab", 5), "ab");
        assert_eq!(mask_prefix("", 1), "");
    }

    #[test]
    fn falls_back_to_full_reveal() {
        let a = "prefix-middle-of-the-road-suffix";
        let b = "prefix-muddle-of-the-road-suffix";

        let hints = compute_hints(&[a, b]);

        assert_eq!(hints.reveal(), Reveal::Full);
        assert_eq!(hints.fragments(), [a, b]);
    }

    #[test]
    fn reveal_seven_is_last_masked_attempt() {
        // Same length, differ only at the 7th character from the start
        let hints = compute_hints(&["abcdefXzzzzzzz", "abcdefYzzzzzzz"]);

        assert_eq!(hints.reveal(), Reveal::Prefix(7));
        assert_eq!(hints.fragments(), ["abcdefX*******", "abcdefY*******"]);
    }

    #[test]
    fn multibyte_characters_count_once() {
        let hints = compute_hints(&["ñandú", "ñoño"]);

        assert_eq!(hints.reveal(), Reveal::Prefix(1));
        assert_eq!(hints.fragments(), ["ñ****", "ñ***"]);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let secrets = dedup(["same", "other", "same", "third", "other"]);
        assert_eq!(secrets, ["same", "other", "third"]);
    }

    #[test]
    fn duplicates_removed_upstream_reveal_one() {
        let unique = dedup(["same", "same"]);
        let hints = compute_hints(&unique);

        assert_eq!(hints.fragments(), ["s***"]);
    }

    #[test]
    fn duplicates_left_in_reveal_full() {
        let hints = compute_hints(&["same", "other", "same"]);

        assert_eq!(hints.reveal(), Reveal::Full);
        assert_eq!(hints.fragments(), ["same", "other", "same"]);
    }

    #[test]
    fn debug_does_not_print_fragments() {
        let hints = compute_hints(&["abc", "abd"]);
        assert!(!format!("{hints:?}").contains("ab"));
    }
}
