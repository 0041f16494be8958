pub mod handlers;
pub mod responses;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/{user_id}/score", get(handlers::latest_score))
        .route("/api/users/{user_id}/audits", get(handlers::list_audits))
}
