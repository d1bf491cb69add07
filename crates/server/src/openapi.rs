use axum::Router;
use shared_types::{
    AiAnalysis, AppError, AppErrorKind, Case, CaseDetailResponse, CaseHistory, CaseListResponse,
    CaseStatsResponse, CaseStatus, CasesResponse, DeleteCaseResponse, Document,
    MonthlyTrendPoint, PartyRole, UpdateCaseRequest,
};
use sqlx::{Pool, Postgres};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::case::list_cases,
        rest::case::search_cases,
        rest::case::upcoming_hearings,
        rest::case::case_stats,
        rest::case::get_case,
        rest::case::update_case,
        rest::case::delete_case,
        rest::case::get_case_analysis,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        Case, CaseStatus, PartyRole,
        CaseListResponse, CasesResponse, CaseStatsResponse, MonthlyTrendPoint,
        CaseDetailResponse, UpdateCaseRequest, DeleteCaseResponse,
        Document, CaseHistory, AiAnalysis,
        HealthResponse,
    )),
    tags(
        (name = "cases", description = "Advocate case listing, search, detail and updates"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Caseload API",
        description = "Case tracking for advocates",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`,
/// the health probe at `/health` and the REST API at `/api/v1/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(AppState::new(pool))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}

/// The full service: [`api_router`] wrapped in auth, tracing and
/// request-id middleware.
pub fn app(pool: Pool<Postgres>) -> Router {
    let mut router = api_router(pool);

    if crate::config::feature_flags().telemetry {
        router = router.layer(crate::telemetry::OtelTraceLayer);
    }

    router
        .layer(axum::middleware::from_fn(
            crate::auth::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
