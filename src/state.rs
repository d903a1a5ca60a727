//! Application state shared by the web handlers.

use crate::leagues::{LeagueError, Leagues};
use crate::snapshot::Standings;
use crate::source::StandingsSource;
use crate::storage::{Key, StandingsStorage, StorageError, StoreOutcome};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    UnknownLeague(#[from] LeagueError),
    #[error("invalid season '{0}': expected a four-digit year")]
    InvalidSeason(String),
    #[error("no standings available for {0}")]
    NoData(Key),
    #[error("failed to fetch standings for {key} from {source_name}")]
    Upstream {
        key: Key,
        source_name: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Seasons are the starting year, e.g. `2020`.
fn validate_season(season: &str) -> Result<(), LookupError> {
    if season.len() == 4 && season.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(LookupError::InvalidSeason(season.to_owned()))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StandingsStorage>,
    pub source: Arc<dyn StandingsSource>,
    pub leagues: Arc<Leagues>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn StandingsStorage>,
        source: Arc<dyn StandingsSource>,
        leagues: Leagues,
    ) -> Self {
        Self {
            storage,
            source,
            leagues: Arc::new(leagues),
        }
    }

    /// Serve standings from storage, fetching and storing them on a total miss.
    pub async fn get_standings_or_fetch(
        &self,
        alias: &str,
        season: &str,
    ) -> Result<Standings, LookupError> {
        let league = self.leagues.get(alias)?;
        validate_season(season)?;
        let key = Key::new(alias, season);

        if let Some(standings) = self.storage.check_and_get(&key).await? {
            info!(key = %key, mode = %self.storage.mode(), "serving stored standings");
            return Ok(standings);
        }

        let fetched = self
            .source
            .fetch(league, season)
            .await
            .map_err(|source| LookupError::Upstream {
                key: key.clone(),
                source_name: self.source.name(),
                source,
            })?;
        let Some(standings) = fetched else {
            return Err(LookupError::NoData(key));
        };

        let outcome = self.storage.store(&key, &standings).await?;
        match outcome {
            StoreOutcome::Conflict => {
                warn!(key = %key, outcome = %outcome, "fetched standings not persisted")
            }
            _ => info!(key = %key, outcome = %outcome, source = self.source.name(), "stored fetched standings"),
        }
        Ok(standings)
    }
}
