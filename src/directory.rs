//! GitHub login → Discord user directory.
//!
//! The directory is built once at startup from `DISCORD_USER_<LOGIN>=<id>`
//! variables and never changes afterwards. It is shared across request
//! handlers behind an `Arc` and needs no locking.
//!
//! Lookups are case-insensitive: keys are lowercased on insertion and the
//! queried login is lowercased before comparison. A miss is not an error, it
//! just means "nobody to ping".

use std::collections::HashMap;

use crate::types::DiscordId;

/// Environment variable prefix for directory entries.
pub const USER_VAR_PREFIX: &str = "DISCORD_USER_";

/// Immutable mapping from lowercase GitHub login to Discord user ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDirectory {
    entries: HashMap<String, DiscordId>,
}

impl IdentityDirectory {
    /// Builds a directory from `(github_login, discord_id)` pairs.
    ///
    /// Logins are lowercased. Pairs with an empty Discord ID are skipped; if a
    /// login appears twice (in any casing) the last pair wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .filter_map(|(login, id)| {
                DiscordId::new(id).map(|id| (login.as_ref().to_lowercase(), id))
            })
            .collect();
        IdentityDirectory { entries }
    }

    /// Builds a directory from environment-style `(key, value)` pairs.
    ///
    /// Only keys starting with [`USER_VAR_PREFIX`] are considered; the rest of
    /// the key is the GitHub login.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::from_pairs(vars.into_iter().filter_map(|(key, value)| {
            key.strip_prefix(USER_VAR_PREFIX)
                .filter(|login| !login.is_empty())
                .map(|login| (login.to_string(), value))
        }))
    }

    /// Looks up the Discord ID for a GitHub login, ignoring case.
    pub fn lookup(&self, github_login: &str) -> Option<&DiscordId> {
        self.entries.get(&github_login.to_lowercase())
    }

    /// Returns the number of mapped logins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no logins are mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the mapped logins (lowercase), sorted.
    pub fn logins(&self) -> Vec<&str> {
        let mut logins: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        logins.sort_unstable();
        logins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dir = IdentityDirectory::from_pairs([("testuser1", "123456789012345678")]);

        let expected = DiscordId::new("123456789012345678");
        assert_eq!(dir.lookup("testuser1"), expected.as_ref());
        assert_eq!(dir.lookup("TestUser1"), expected.as_ref());
        assert_eq!(dir.lookup("TESTUSER1"), expected.as_ref());
        assert_eq!(dir.lookup("tEsTuSeR1"), expected.as_ref());
    }

    #[test]
    fn unknown_login_is_a_miss() {
        let dir = IdentityDirectory::from_pairs([("testuser1", "1")]);
        assert!(dir.lookup("unknownuser").is_none());
        assert!(dir.lookup("").is_none());
    }

    #[test]
    fn keys_are_lowercased_on_insert() {
        let dir = IdentityDirectory::from_pairs([("FROSTER01", "620058726069567503")]);
        assert_eq!(dir.logins(), vec!["froster01"]);
        assert!(dir.lookup("froster01").is_some());
    }

    #[test]
    fn empty_ids_are_skipped() {
        let dir = IdentityDirectory::from_pairs([("ghost", ""), ("real", "42")]);
        assert_eq!(dir.len(), 1);
        assert!(dir.lookup("ghost").is_none());
    }

    #[test]
    fn from_vars_reads_prefixed_keys_only() {
        let dir = IdentityDirectory::from_vars(vars(&[
            ("DISCORD_USER_FROSTER01", "620058726069567503"),
            ("DISCORD_USER_CHAAD98", "335363734446931968"),
            ("DISCORD_WEBHOOK_CORE", "https://discord.com/api/webhooks/x"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.logins(), vec!["chaad98", "froster01"]);
        assert_eq!(
            dir.lookup("Chaad98").map(DiscordId::as_str),
            Some("335363734446931968")
        );
    }

    #[test]
    fn from_vars_ignores_bare_prefix_and_empty_values() {
        let dir = IdentityDirectory::from_vars(vars(&[
            ("DISCORD_USER_", "1"),
            ("DISCORD_USER_NOBODY", ""),
        ]));
        assert!(dir.is_empty());
    }

    #[test]
    fn malformed_ids_are_kept_verbatim() {
        let dir = IdentityDirectory::from_pairs([("odd", "not-a-snowflake")]);
        assert_eq!(
            dir.lookup("odd").map(DiscordId::as_str),
            Some("not-a-snowflake")
        );
    }

    proptest! {
        #[test]
        fn any_casing_resolves_to_the_same_entry(
            login in "[a-z][a-z0-9-]{0,38}",
            id in "[0-9]{17,20}",
            mask in proptest::collection::vec(any::<bool>(), 39),
        ) {
            let dir = IdentityDirectory::from_pairs([(login.clone(), id.clone())]);
            let mixed: String = login
                .chars()
                .zip(mask.iter())
                .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                .collect();

            prop_assert_eq!(dir.lookup(&mixed).map(DiscordId::as_str), Some(id.as_str()));
        }
    }
}
