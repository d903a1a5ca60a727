//! League table snapshot: teams, ranked standings and the per-season collection.

mod record;

pub use record::{Record, RecordScope, Records, ScopeRejection, UnsupportedRecordScope};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: i64,
    name: String,
    logo: String,
    homepage: Option<String>,
}

impl Team {
    pub fn new(id: i64, name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            logo: logo.into(),
            homepage: None,
        }
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logo(&self) -> &str {
        &self.logo
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStanding {
    #[error("standing for {team} has rank 0; ranks start at 1")]
    ZeroRank { team: String },
    #[error(transparent)]
    MissingRecord(#[from] UnsupportedRecordScope),
}

/// One ranked row of a league table.
///
/// Only the `all` record is kept; its fields are exposed as the standing's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    rank: u32,
    team: Team,
    points: i32,
    group: String,
    form: String,
    record: Record,
}

impl Standing {
    /// Build a standing, resolving the `all` record from `records`. Ranks are 1-based.
    pub fn new(
        rank: u32,
        team: Team,
        points: i32,
        group: impl Into<String>,
        form: impl Into<String>,
        records: &Records,
    ) -> Result<Self, InvalidStanding> {
        if rank == 0 {
            return Err(InvalidStanding::ZeroRank {
                team: team.name().to_owned(),
            });
        }
        let record = records.get_scope(RecordScope::All)?.clone();
        Ok(Self {
            rank,
            team,
            points,
            group: group.into(),
            form: form.into(),
            record,
        })
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn played(&self) -> u32 {
        self.record.played()
    }

    pub fn wins(&self) -> u32 {
        self.record.wins()
    }

    pub fn draws(&self) -> u32 {
        self.record.draws()
    }

    pub fn losses(&self) -> u32 {
        self.record.losses()
    }

    pub fn goals_for(&self) -> u32 {
        self.record.goals_for()
    }

    pub fn goals_against(&self) -> u32 {
        self.record.goals_against()
    }

    pub fn goal_diff(&self) -> i64 {
        self.record.goal_diff()
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({} pts)", self.rank, self.team, self.points)
    }
}

/// All standings of a league season, keyed by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    standings: BTreeMap<u32, Standing>,
}

impl Standings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a standing under its rank, replacing any standing already at that rank.
    pub fn add(&mut self, standing: Standing) -> Option<Standing> {
        self.standings.insert(standing.rank(), standing)
    }

    pub fn get(&self, rank: u32) -> Option<&Standing> {
        self.standings.get(&rank)
    }

    /// Standings in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.standings.values()
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<Standing> for Standings {
    fn from_iter<I: IntoIterator<Item = Standing>>(iter: I) -> Self {
        let mut standings = Standings::new();
        for standing in iter {
            standings.add(standing);
        }
        standings
    }
}
