//! Where fresh standings come from when no storage tier has them.

pub mod json;
pub mod mock;
pub mod rapidapi;

pub use mock::MockStandingsSource;
pub use rapidapi::RapidApiSource;

use crate::config::Config;
use crate::leagues::League;
use crate::snapshot::Standings;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait StandingsSource: Send + Sync {
    /// `Ok(None)` when the upstream has no standings for this league season.
    async fn fetch(&self, league: &League, season: &str) -> anyhow::Result<Option<Standings>>;

    fn name(&self) -> &'static str;
}

/// Pick the mock source in `mock_mode`, otherwise the RapidAPI client.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn StandingsSource>> {
    if config.mock_mode {
        info!("standings source: mock");
        return Ok(Arc::new(MockStandingsSource::new()));
    }

    let api_key = config
        .rapidapi_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("rapidapi_key is required outside mock mode"))?;
    let source = RapidApiSource::new(
        &config.rapidapi_host,
        &config.rapidapi_version,
        api_key,
        config.rapidapi_requests_per_minute,
    )?;
    info!(host = %config.rapidapi_host, version = %config.rapidapi_version, "standings source: rapidapi");
    Ok(Arc::new(source))
}
