//! Repository → Discord channel routing.
//!
//! Each repository posts to its own Discord webhook, configured as
//! `DISCORD_WEBHOOK_<REPO>=<url>`. The variable suffix maps to a repository
//! name by lowercasing and turning `_` into `-`, since environment variable
//! names cannot contain dashes: `DISCORD_WEBHOOK_NG_CORE` routes `ng-core`.
//!
//! The short variable names of existing deployments keep working:
//! `DISCORD_WEBHOOK_CORE` still routes `ng-core`. See [`LEGACY_ROUTE_NAMES`].

use std::collections::HashMap;

/// Environment variable prefix for channel routes.
pub const WEBHOOK_VAR_PREFIX: &str = "DISCORD_WEBHOOK_";

/// Immutable mapping from repository name to Discord webhook URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRoutes {
    routes: HashMap<String, String>,
}

impl ChannelRoutes {
    /// Builds routes from `(repository, url)` pairs.
    ///
    /// Repository names are lowercased; empty URLs are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let routes = pairs
            .into_iter()
            .map(|(repo, url)| (repo.as_ref().to_lowercase(), url.into()))
            .filter(|(repo, url)| !repo.is_empty() && !url.trim().is_empty())
            .collect();
        ChannelRoutes { routes }
    }

    /// Builds routes from environment-style `(key, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::from_pairs(vars.into_iter().filter_map(|(key, url)| {
            key.strip_prefix(WEBHOOK_VAR_PREFIX)
                .map(|suffix| (repo_name_from_var(suffix), url))
        }))
    }

    /// Returns the webhook URL for a repository, ignoring case.
    pub fn url_for(&self, repo: &str) -> Option<&str> {
        self.routes.get(&repo.to_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the routed repository names, sorted.
    pub fn repos(&self) -> Vec<&str> {
        let mut repos: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        repos.sort_unstable();
        repos
    }
}

/// Variable suffixes whose repository name is not derivable from the suffix.
pub const LEGACY_ROUTE_NAMES: &[(&str, &str)] = &[
    ("AI", "ng-ai"),
    ("CORE", "ng-core"),
    ("HOMELAND", "ng-homeland"),
    ("WEB", "ng-web"),
    ("INTEGRATION", "webhook-integration"),
];

/// `NG_CORE` → `ng-core`, after the legacy aliases.
fn repo_name_from_var(suffix: &str) -> String {
    LEGACY_ROUTE_NAMES
        .iter()
        .find(|(var, _)| suffix.eq_ignore_ascii_case(var))
        .map(|(_, repo)| repo.to_string())
        .unwrap_or_else(|| suffix.to_lowercase().replace('_', "-"))
}
