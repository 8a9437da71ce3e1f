use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use signage_core::{
    errors::ScheduleError,
    models::{
        block::ScreenId,
        schedule::{GetScheduleResponse, PutScheduleRequest, PutScheduleResponse, ScheduleScope},
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query string of `GET /api/schedules`.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Comma-separated screen ids
    pub screens: String,
    pub organization: Option<Uuid>,
    pub branch: Option<Uuid>,
}

impl ScheduleQuery {
    pub fn scope(&self) -> ScheduleScope {
        let screens = self
            .screens
            .split(',')
            .map(str::trim)
            .filter(|screen| !screen.is_empty())
            .map(ScreenId::from);

        ScheduleScope {
            organization_id: self.organization,
            branch_id: self.branch,
            ..ScheduleScope::for_screens(screens)
        }
    }
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<GetScheduleResponse>, AppError> {
    let scope = query.scope();
    if scope.screen_ids.is_empty() {
        return Err(AppError(ScheduleError::Validation(
            "At least one screen must be selected".to_string(),
        )));
    }

    let blocks = state.repository.blocks_for_scope(&scope).await;

    Ok(Json(GetScheduleResponse { blocks }))
}

#[axum::debug_handler]
pub async fn put_schedule(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PutScheduleRequest>,
) -> Result<Json<PutScheduleResponse>, AppError> {
    // Reject the whole batch before touching storage
    for block in &payload.blocks {
        block.validate()?;
        if !payload.scope.contains(&block.screen_id) {
            return Err(AppError(ScheduleError::Validation(format!(
                "Block for screen {} is outside the submitted scope",
                block.screen_id
            ))));
        }
    }

    let saved = state
        .repository
        .replace_scope(&payload.scope, payload.blocks)
        .await;
    info!(
        "Saved {} block(s) for screens {:?}",
        saved, payload.scope.screen_ids
    );

    Ok(Json(PutScheduleResponse {
        saved,
        updated_at: Utc::now(),
    }))
}
