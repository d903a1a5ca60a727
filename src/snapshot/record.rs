//! Win/draw/loss tallies and the per-scope collection that holds them.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The scopes a [`Record`] can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordScope {
    All,
    Home,
    Away,
}

impl RecordScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordScope::All => "all",
            RecordScope::Home => "home",
            RecordScope::Away => "away",
        }
    }
}

impl fmt::Display for RecordScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordScope {
    type Err = UnsupportedRecordScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(RecordScope::All),
            "home" => Ok(RecordScope::Home),
            "away" => Ok(RecordScope::Away),
            other => Err(UnsupportedRecordScope::not_supported(other)),
        }
    }
}

/// Why a scope was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRejection {
    /// The scope is not one of `all`, `home`, `away`.
    NotSupported,
    /// The scope is valid but no record was ever added for it.
    NeverAdded,
}

impl fmt::Display for ScopeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeRejection::NotSupported => f.write_str("record is not supported"),
            ScopeRejection::NeverAdded => f.write_str("record wanted but never added"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{scope}' {reason}")]
pub struct UnsupportedRecordScope {
    pub scope: String,
    pub reason: ScopeRejection,
}

impl UnsupportedRecordScope {
    fn not_supported(scope: &str) -> Self {
        Self {
            scope: scope.to_owned(),
            reason: ScopeRejection::NotSupported,
        }
    }

    fn never_added(scope: RecordScope) -> Self {
        Self {
            scope: scope.as_str().to_owned(),
            reason: ScopeRejection::NeverAdded,
        }
    }
}

/// A team's tally of games for one scope.
///
/// Goal difference is always derived from the goal counts and never stored.
/// Human-readable output (JSON) carries it as `goalDiff`; binary frames hold
/// only the six counts, and deserialization ignores `goalDiff`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u32,
    goals_against: u32,
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_diff = serializer.is_human_readable();
        let mut state = serializer.serialize_struct("Record", if with_diff { 7 } else { 6 })?;
        state.serialize_field("played", &self.played)?;
        state.serialize_field("wins", &self.wins)?;
        state.serialize_field("draws", &self.draws)?;
        state.serialize_field("losses", &self.losses)?;
        state.serialize_field("goalsFor", &self.goals_for)?;
        state.serialize_field("goalsAgainst", &self.goals_against)?;
        if with_diff {
            state.serialize_field("goalDiff", &self.goal_diff())?;
        }
        state.end()
    }
}

impl Record {
    pub fn new(
        played: u32,
        wins: u32,
        draws: u32,
        losses: u32,
        goals_for: u32,
        goals_against: u32,
    ) -> Self {
        Self {
            played,
            wins,
            draws,
            losses,
            goals_for,
            goals_against,
        }
    }

    pub fn played(&self) -> u32 {
        self.played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn goals_for(&self) -> u32 {
        self.goals_for
    }

    pub fn goals_against(&self) -> u32 {
        self.goals_against
    }

    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// At most one [`Record`] per supported scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    records: BTreeMap<RecordScope, Record>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `record` under the scope named `scope`, replacing any previous one.
    pub fn add(&mut self, scope: &str, record: Record) -> Result<(), UnsupportedRecordScope> {
        let scope = scope.parse::<RecordScope>()?;
        self.insert(scope, record);
        Ok(())
    }

    pub fn insert(&mut self, scope: RecordScope, record: Record) {
        self.records.insert(scope, record);
    }

    /// Look up the record for the scope named `scope`.
    ///
    /// Fails for scopes outside `all`/`home`/`away` and for valid scopes that
    /// were never added.
    pub fn get(&self, scope: &str) -> Result<&Record, UnsupportedRecordScope> {
        self.get_scope(scope.parse::<RecordScope>()?)
    }

    pub fn get_scope(&self, scope: RecordScope) -> Result<&Record, UnsupportedRecordScope> {
        self.records
            .get(&scope)
            .ok_or_else(|| UnsupportedRecordScope::never_added(scope))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
