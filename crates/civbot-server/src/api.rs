//! REST endpoints for non-Telegram callers.
//!
//! Mirrors the webhook's game operations as plain JSON: the leaderboard,
//! a manual accrual tick, and raid resolution. These share the same
//! storage paths as the chat commands, so every mutation goes through the
//! same atomic statements.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use civbot_engine::economy::{BASE_INCOME, MARKET_INCOME_BONUS};
use civbot_types::{ChatId, Group};
use serde::Deserialize;

use crate::dispatch::{self, RaidResolution};
use crate::error::ApiError;
use crate::state::AppState;

/// Entries returned by `GET /api/leaderboard`.
const API_LEADERBOARD_LIMIT: i64 = 20;

/// Cap for the full group listing.
const API_GROUPS_LIMIT: i64 = 1000;

/// `GET /api/leaderboard` -- top groups by bricks descending.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = state.store.top_groups(API_LEADERBOARD_LIMIT).await?;
    Ok(Json(groups))
}

/// `GET /api/groups` -- all groups, bricks descending.
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = state.store.top_groups(API_GROUPS_LIMIT).await?;
    Ok(Json(groups))
}

/// Request body for `POST /api/groups/brick`.
#[derive(Debug, Deserialize)]
pub struct AddBrickRequest {
    /// Target group's chat ID.
    pub id: Option<String>,
}

/// `POST /api/groups/brick` -- apply one passive accrual tick.
pub async fn add_brick(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddBrickRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = request
        .id
        .ok_or_else(|| ApiError::BadRequest(String::from("group ID is required")))?;
    let id = ChatId::new(id);

    let group = state
        .store
        .get_group(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))?;

    let bricks = state
        .store
        .accrue_passive(&id, &group.name, BASE_INCOME, MARKET_INCOME_BONUS)
        .await?;
    Ok(Json(serde_json::json!({
        "message": "Brick added!",
        "bricks": bricks,
    })))
}

/// Request body for `POST /api/groups/raid`.
#[derive(Debug, Deserialize)]
pub struct RaidRequest {
    /// Raiding group's chat ID.
    pub attacker_id: Option<String>,
    /// Raided group's chat ID.
    pub defender_id: Option<String>,
}

/// `POST /api/groups/raid` -- resolve a raid between two groups.
pub async fn raid(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RaidRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(attacker), Some(defender)) = (request.attacker_id, request.defender_id) else {
        return Err(ApiError::BadRequest(String::from(
            "both attacker_id and defender_id are required",
        )));
    };
    let attacker = ChatId::new(attacker);
    let defender = ChatId::new(defender);

    let resolution = dispatch::resolve_raid(&state.store, &attacker, Some(&defender)).await?;
    match resolution {
        RaidResolution::Looted {
            steal, wall_reduced, ..
        } => Ok(Json(serde_json::json!({
            "steal": steal,
            "wall_reduced": wall_reduced,
            "attacker": attacker,
            "defender": defender,
        }))),
        RaidResolution::NothingToSteal { defender_name } => Ok(Json(serde_json::json!({
            "steal": 0,
            "message": format!("{defender_name} has nothing to steal"),
        }))),
        RaidResolution::Raced => Err(ApiError::Conflict(String::from(
            "raid lost a concurrent race; retry",
        ))),
    }
}
