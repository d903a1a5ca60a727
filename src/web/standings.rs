//! Standings lookup handler.

use axum::extract::{Path, State};
use axum::response::Json;
use tracing::debug;

use crate::snapshot::Standings;
use crate::state::AppState;
use crate::web::error::ApiError;

/// `GET /standings/{league}/{season}`
pub(super) async fn get_standings(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<Json<Standings>, ApiError> {
    debug!(league = %league, season = %season, "standings requested");
    let standings = state.get_standings_or_fetch(&league, &season).await?;
    Ok(Json(standings))
}
