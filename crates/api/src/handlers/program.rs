use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use signage_core::{
    models::{block::ScreenId, program::EffectiveProgram},
    resolver,
};
use std::sync::Arc;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct ProgramQuery {
    /// Defaults to today in the server's local time zone
    pub date: Option<NaiveDate>,
}

/// The resolved playback program of one screen on one date.
#[axum::debug_handler]
pub async fn get_program(
    State(state): State<Arc<ApiState>>,
    Path(screen_id): Path<String>,
    Query(query): Query<ProgramQuery>,
) -> Result<Json<EffectiveProgram>, AppError> {
    let screen_id = ScreenId::from(screen_id);
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());

    let blocks = state.repository.blocks_for_screen(&screen_id).await;
    let program = resolver::resolve(&screen_id, date, &blocks);
    if !program.warnings.is_empty() {
        warn!(
            "Program for {} on {} has {} ambiguous overlap(s)",
            screen_id,
            date,
            program.warnings.len()
        );
    }

    Ok(Json(program))
}
