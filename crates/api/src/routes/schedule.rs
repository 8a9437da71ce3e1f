use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/schedules",
        get(handlers::schedule::get_schedule).put(handlers::schedule::put_schedule),
    )
}
