//! League aliases (`epl`, `seriea`, ...) mapped to upstream league ids.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// One league as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeagueConfig {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "league".to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    country: String,
    name: String,
    id: i64,
    kind: String,
}

impl League {
    pub fn new(country: impl Into<String>, name: impl Into<String>, id: i64, kind: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            name: name.into(),
            id,
            kind: kind.into(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upstream league id.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeagueError {
    #[error("no league with alias: {0}")]
    UnknownAlias(String),
    /// `_` separates alias from season in storage keys, so it cannot appear in an alias.
    #[error("invalid league alias '{0}': must be non-empty and contain no '_'")]
    InvalidAlias(String),
}

/// Alias lookup over every configured country.
#[derive(Debug, Clone, Default)]
pub struct Leagues {
    by_alias: HashMap<String, League>,
}

impl Leagues {
    pub fn from_config(
        countries: &BTreeMap<String, BTreeMap<String, LeagueConfig>>,
    ) -> Result<Self, LeagueError> {
        let mut by_alias = HashMap::new();
        for (country, leagues) in countries {
            for (alias, league) in leagues {
                if alias.is_empty() || alias.contains('_') {
                    return Err(LeagueError::InvalidAlias(alias.clone()));
                }
                let league = League::new(country, &league.name, league.id, &league.kind);
                debug!(alias = %alias, league = %league, id = league.id(), "loaded league");
                by_alias.insert(alias.clone(), league);
            }
        }
        Ok(Self { by_alias })
    }

    pub fn get(&self, alias: &str) -> Result<&League, LeagueError> {
        self.by_alias
            .get(alias)
            .ok_or_else(|| LeagueError::UnknownAlias(alias.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
