pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/score", post(handlers::score_user))
        .route("/api/score/batch", post(handlers::score_batch))
}
