pub mod case;

use axum::{routing::get, Router};

use crate::db::AppState;

/// Build the case REST router. Literal paths are registered before
/// `/{case_id}` so they never parse as an id.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/cases", get(case::list_cases))
        .route("/api/v1/cases/", get(case::list_cases))
        .route("/api/v1/cases/search", get(case::search_cases))
        .route("/api/v1/cases/upcoming-hearings", get(case::upcoming_hearings))
        .route("/api/v1/cases/stats", get(case::case_stats))
        .route(
            "/api/v1/cases/{case_id}",
            get(case::get_case)
                .patch(case::update_case)
                .delete(case::delete_case),
        )
        .route("/api/v1/cases/{case_id}/analysis", get(case::get_case_analysis))
}
