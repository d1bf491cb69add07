use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    AiAnalysis, AppError, Case, CaseDetailResponse, CaseListParams, CaseListQuery,
    CaseListResponse, CaseSearchParams, CaseStatsResponse, CasesResponse, DeleteCaseResponse,
    Record, RecordFields, UpcomingHearingsParams, UpdateCaseRequest,
};

use crate::auth::extractors::AuthRequired;
use crate::error_convert::ValidateRequest;
use crate::repo;

fn parse_case_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid UUID format"))
}

/// Fetch a case by id and check the caller owns it.
///
/// Missing cases are 404 and foreign cases 403, so an id's existence is
/// observable by any authenticated caller.
async fn load_owned_case(
    pool: &Pool<Postgres>,
    id: Uuid,
    advocate_id: Uuid,
    action: &str,
) -> Result<Case, AppError> {
    let case = repo::case::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    if !case.is_owned_by(advocate_id) {
        tracing::warn!(case_id = %id, advocate_id = %advocate_id, action, "Case access denied");
        return Err(AppError::forbidden(format!(
            "Not authorized to {action} this case"
        )));
    }
    Ok(case)
}

/// GET /api/v1/cases
#[utoipa::path(
    get,
    path = "/api/v1/cases",
    params(CaseListParams),
    responses(
        (status = 200, description = "Page of cases", body = CaseListResponse),
        (status = 400, description = "Invalid status filter", body = AppError),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 422, description = "Invalid pagination", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn list_cases(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<CaseListParams>,
) -> Result<Json<CaseListResponse>, AppError> {
    params.validate_request()?;
    let query = CaseListQuery::try_from(&params)?;

    let (cases, total) = repo::case::list(&pool, auth.advocate_id(), &query).await?;

    Ok(Json(CaseListResponse::new(
        cases,
        total,
        params.page,
        params.per_page,
    )))
}

/// GET /api/v1/cases/search
#[utoipa::path(
    get,
    path = "/api/v1/cases/search",
    params(CaseSearchParams),
    responses(
        (status = 200, description = "Matching cases (at most 50)", body = CasesResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 422, description = "Query too short", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn search_cases(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<CaseSearchParams>,
) -> Result<Json<CasesResponse>, AppError> {
    params.validate_request()?;

    let cases = repo::case::search(&pool, auth.advocate_id(), &params.q).await?;

    Ok(Json(CasesResponse { cases }))
}

/// GET /api/v1/cases/upcoming-hearings
#[utoipa::path(
    get,
    path = "/api/v1/cases/upcoming-hearings",
    params(UpcomingHearingsParams),
    responses(
        (status = 200, description = "Cases with a hearing in the window, soonest first", body = CasesResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 422, description = "days outside 1-90", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn upcoming_hearings(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<UpcomingHearingsParams>,
) -> Result<Json<CasesResponse>, AppError> {
    params.validate_request()?;

    let cases =
        repo::case::upcoming_hearings(&pool, auth.advocate_id(), Utc::now(), params.days).await?;

    Ok(Json(CasesResponse { cases }))
}

/// GET /api/v1/cases/stats
#[utoipa::path(
    get,
    path = "/api/v1/cases/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = CaseStatsResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn case_stats(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<CaseStatsResponse>, AppError> {
    let stats = repo::case::stats(&pool, auth.advocate_id(), Utc::now()).await?;
    Ok(Json(stats))
}

/// GET /api/v1/cases/{case_id}
#[utoipa::path(
    get,
    path = "/api/v1/cases/{case_id}",
    params(
        ("case_id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Case with documents, history and AI analysis", body = CaseDetailResponse),
        (status = 400, description = "Malformed id", body = AppError),
        (status = 403, description = "Case belongs to another advocate", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn get_case(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(case_id): Path<String>,
) -> Result<Json<CaseDetailResponse>, AppError> {
    let id = parse_case_id(&case_id)?;
    let case = load_owned_case(&pool, id, auth.advocate_id(), "access").await?;

    let documents = repo::document::list_by_case(&pool, id).await?;
    let history = repo::case_history::list_by_case(&pool, id).await?;
    let ai_analysis = repo::ai_analysis::first_for_case(&pool, id).await?;

    Ok(Json(CaseDetailResponse {
        case,
        documents: documents.iter().map(RecordFields::record_fields).collect(),
        history: history.iter().map(RecordFields::record_fields).collect(),
        ai_analysis: ai_analysis.as_ref().map(RecordFields::record_fields),
    }))
}

/// PATCH /api/v1/cases/{case_id}
#[utoipa::path(
    patch,
    path = "/api/v1/cases/{case_id}",
    request_body = UpdateCaseRequest,
    params(
        ("case_id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Updated case", body = Case),
        (status = 400, description = "Malformed id", body = AppError),
        (status = 403, description = "Case belongs to another advocate", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 422, description = "Malformed body or null on a required field")
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth, body), fields(advocate_id = %auth.advocate_id()))]
pub async fn update_case(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(case_id): Path<String>,
    Json(body): Json<UpdateCaseRequest>,
) -> Result<Json<Case>, AppError> {
    let id = parse_case_id(&case_id)?;
    let case = load_owned_case(&pool, id, auth.advocate_id(), "modify").await?;

    let changes = body.changes();
    let saved =
        repo::case::update(&pool, case.id, auth.advocate_id(), &changes, Utc::now()).await?;

    let fields: Vec<&str> = changes.iter().map(|(column, _)| *column).collect();
    tracing::info!(case_id = %id, fields = ?fields, "Case updated");

    Ok(Json(saved))
}

/// DELETE /api/v1/cases/{case_id}
#[utoipa::path(
    delete,
    path = "/api/v1/cases/{case_id}",
    params(
        ("case_id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Case hidden from listings", body = DeleteCaseResponse),
        (status = 400, description = "Malformed id", body = AppError),
        (status = 403, description = "Case belongs to another advocate", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn delete_case(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(case_id): Path<String>,
) -> Result<Json<DeleteCaseResponse>, AppError> {
    let id = parse_case_id(&case_id)?;
    let case = load_owned_case(&pool, id, auth.advocate_id(), "delete").await?;

    repo::case::soft_delete(&pool, case.id, Utc::now().max(case.updated_at)).await?;
    tracing::info!(case_id = %id, "Case soft-deleted");

    Ok(Json(DeleteCaseResponse::new(id)))
}

/// GET /api/v1/cases/{case_id}/analysis
#[utoipa::path(
    get,
    path = "/api/v1/cases/{case_id}/analysis",
    params(
        ("case_id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "AI analysis of the case", body = AiAnalysis),
        (status = 400, description = "Malformed id", body = AppError),
        (status = 404, description = "No visible owned case, or no analysis yet", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth), fields(advocate_id = %auth.advocate_id()))]
pub async fn get_case_analysis(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(case_id): Path<String>,
) -> Result<Json<Record>, AppError> {
    let id = parse_case_id(&case_id)?;

    // Foreign and hidden cases are indistinguishable from missing ones here.
    repo::case::find_by_id(&pool, id)
        .await?
        .filter(|case| case.is_owned_by(auth.advocate_id()) && case.is_visible)
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    let analysis = repo::ai_analysis::first_for_case(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Analysis not found"))?;

    Ok(Json(analysis.record_fields()))
}
