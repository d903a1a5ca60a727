//! API-Football client (via RapidAPI) for league standings.

use super::StandingsSource;
use super::json::parse_json_with_context;
use crate::leagues::League;
use crate::snapshot::{Record, RecordScope, Records, Standing, Standings, Team};
use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, info, warn};

const BASE_PATH: &str = "standings";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response: Vec<ApiLeagueEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiLeagueEntry {
    league: ApiLeague,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    #[serde(default)]
    standings: Vec<Vec<ApiStanding>>,
}

#[derive(Debug, Deserialize)]
struct ApiStanding {
    rank: u32,
    team: ApiTeam,
    points: i32,
    group: String,
    form: Option<String>,
    all: ApiRecord,
    home: Option<ApiRecord>,
    away: Option<ApiRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: i64,
    name: String,
    logo: String,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    played: Option<u32>,
    win: Option<u32>,
    draw: Option<u32>,
    lose: Option<u32>,
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiGoals {
    #[serde(rename = "for")]
    goals_for: Option<u32>,
    against: Option<u32>,
}

impl From<&ApiRecord> for Record {
    fn from(r: &ApiRecord) -> Self {
        Record::new(
            r.played.unwrap_or(0),
            r.win.unwrap_or(0),
            r.draw.unwrap_or(0),
            r.lose.unwrap_or(0),
            r.goals.goals_for.unwrap_or(0),
            r.goals.against.unwrap_or(0),
        )
    }
}

impl ApiStanding {
    fn into_standing(self) -> Result<Standing> {
        let mut records = Records::new();
        records.insert(RecordScope::All, Record::from(&self.all));
        if let Some(home) = &self.home {
            records.insert(RecordScope::Home, Record::from(home));
        }
        if let Some(away) = &self.away {
            records.insert(RecordScope::Away, Record::from(away));
        }

        let team = Team::new(self.team.id, self.team.name, self.team.logo);
        Ok(Standing::new(
            self.rank,
            team,
            self.points,
            self.group,
            self.form.unwrap_or_default(),
            &records,
        )?)
    }
}

/// Parse an upstream `/standings` body. `None` when it carries no table.
pub(crate) fn parse_standings(body: &str) -> Result<Option<Standings>> {
    let parsed: ApiResponse = parse_json_with_context(body)?;
    let Some(rows) = parsed
        .response
        .into_iter()
        .next()
        .and_then(|entry| entry.league.standings.into_iter().next())
    else {
        return Ok(None);
    };

    let mut standings = Standings::new();
    for row in rows {
        let standing = row.into_standing()?;
        debug!(standing = %standing, "added standing");
        standings.add(standing);
    }
    Ok((!standings.is_empty()).then_some(standings))
}

pub struct RapidApiSource {
    http: reqwest::Client,
    url: String,
    host: String,
    api_key: String,
    limiter: DefaultDirectRateLimiter,
}

impl RapidApiSource {
    pub fn new(host: &str, version: &str, api_key: String, requests_per_minute: u32) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build upstream HTTP client")?;
        let per_minute = NonZeroU32::new(requests_per_minute)
            .context("rapidapi_requests_per_minute must be positive")?;

        Ok(Self {
            http,
            url: format!("https://{host}/{version}/{BASE_PATH}"),
            host: host.to_owned(),
            api_key,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }
}

#[async_trait]
impl StandingsSource for RapidApiSource {
    async fn fetch(&self, league: &League, season: &str) -> Result<Option<Standings>> {
        self.limiter.until_ready().await;

        info!(league = %league, season, url = %self.url, "fetching standings from upstream");
        let resp = self
            .http
            .get(&self.url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(&[("league", league.id().to_string()), ("season", season.to_owned())])
            .send()
            .await
            .context("Upstream standings request failed")?;

        let status = resp.status();
        if !status.is_success() {
            warn!(league = %league, season, status = status.as_u16(), "upstream returned no standings");
            return Ok(None);
        }

        let body = resp.text().await.context("Failed to read upstream body")?;
        parse_standings(&body).context("Failed to parse upstream standings")
    }

    fn name(&self) -> &'static str {
        "rapidapi"
    }
}
