use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use shared_types::{
    AppError, Case, CaseListQuery, CaseStatsResponse, ColumnChange, ColumnValue,
    MonthlyTrendPoint, CASE_STATUSES,
};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Every column of `cases`, in `Case` field order.
const CASE_COLUMNS: &str = "id, advocate_id, case_number, efiling_number, case_type, case_year, \
     party_role, petitioner_name, respondent_name, efiling_date, efiling_details, bench_type, \
     judge_name, court_number, status, next_hearing_date, khc_source_url, last_synced_at, \
     sync_status, is_visible, transferred_reason, transferred_at, created_at, updated_at";

/// Maximum rows returned by the quick search.
pub const SEARCH_LIMIT: i64 = 50;

/// Look-ahead window for the dashboard's upcoming hearing count.
const STATS_UPCOMING_DAYS: i64 = 7;

/// Window for the dashboard's monthly trend.
const STATS_TREND_DAYS: i64 = 180;

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// `WHERE` clause shared by every listing: the caller's visible cases.
fn push_owner_scope(qb: &mut QueryBuilder<'static, Postgres>, advocate_id: Uuid) {
    qb.push(" WHERE advocate_id = ")
        .push_bind(advocate_id)
        .push(" AND is_visible = TRUE");
}

/// Case-insensitive substring match over number and party name columns.
fn push_search(qb: &mut QueryBuilder<'static, Postgres>, term: &str) {
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in ["case_number", "efiling_number", "petitioner_name", "respondent_name"]
        .iter()
        .enumerate()
    {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
}

fn push_list_filters(qb: &mut QueryBuilder<'static, Postgres>, query: &CaseListQuery) {
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(case_type) = &query.case_type {
        qb.push(" AND case_type = ").push_bind(case_type.clone());
    }
    if let Some(year) = query.case_year {
        qb.push(" AND case_year = ").push_bind(year);
    }
    if let Some(term) = &query.search {
        push_search(qb, term);
    }
}

fn list_count_query(advocate_id: Uuid, query: &CaseListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM cases");
    push_owner_scope(&mut qb, advocate_id);
    push_list_filters(&mut qb, query);
    qb
}

fn list_page_query(advocate_id: Uuid, query: &CaseListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {CASE_COLUMNS} FROM cases"));
    push_owner_scope(&mut qb, advocate_id);
    push_list_filters(&mut qb, query);
    // Column names come from CaseSortField, never from the request.
    let direction = query.order.as_sql();
    qb.push(format!(
        " ORDER BY {} {direction}, id {direction}",
        query.sort.column()
    ));
    qb.push(" LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset);
    qb
}

fn search_query(advocate_id: Uuid, term: &str) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {CASE_COLUMNS} FROM cases"));
    push_owner_scope(&mut qb, advocate_id);
    push_search(&mut qb, term);
    qb.push(" LIMIT ").push_bind(SEARCH_LIMIT);
    qb
}

/// One page of the caller's visible cases plus the filtered total.
pub async fn list(
    pool: &Pool<Postgres>,
    advocate_id: Uuid,
    query: &CaseListQuery,
) -> Result<(Vec<Case>, i64), AppError> {
    let mut count = list_count_query(advocate_id, query);
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    let mut page = list_page_query(advocate_id, query);
    let rows = page
        .build_query_as::<Case>()
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}

/// Quick search over the caller's visible cases, capped at [`SEARCH_LIMIT`].
pub async fn search(
    pool: &Pool<Postgres>,
    advocate_id: Uuid,
    term: &str,
) -> Result<Vec<Case>, AppError> {
    let mut qb = search_query(advocate_id, term);
    qb.build_query_as::<Case>()
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Visible cases with a hearing between `now` and `now + days`, soonest first.
pub async fn upcoming_hearings(
    pool: &Pool<Postgres>,
    advocate_id: Uuid,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<Case>, AppError> {
    let sql = format!(
        "SELECT {CASE_COLUMNS} FROM cases \
         WHERE advocate_id = $1 AND is_visible = TRUE \
           AND next_hearing_date IS NOT NULL \
           AND next_hearing_date BETWEEN $2 AND $3 \
         ORDER BY next_hearing_date ASC"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(advocate_id)
        .bind(now)
        .bind(now + Duration::days(days))
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Dashboard aggregates for one advocate.
///
/// The upcoming-hearing count and monthly trend include soft-deleted cases;
/// every other figure counts visible cases only. `total_documents` counts
/// documents attached to visible cases.
pub async fn stats(
    pool: &Pool<Postgres>,
    advocate_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CaseStatsResponse, AppError> {
    let (total_cases, pending_cases, disposed_cases) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE status = 'pending'),
               COUNT(*) FILTER (WHERE status = 'disposed')
        FROM cases
        WHERE advocate_id = $1 AND is_visible = TRUE
        "#,
    )
    .bind(advocate_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let upcoming_hearings: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM cases
        WHERE advocate_id = $1
          AND next_hearing_date BETWEEN $2 AND $3
        "#,
    )
    .bind(advocate_id)
    .bind(now)
    .bind(now + Duration::days(STATS_UPCOMING_DAYS))
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let total_documents: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM documents d
        JOIN cases c ON c.id = d.case_id
        WHERE c.advocate_id = $1 AND c.is_visible = TRUE
        "#,
    )
    .bind(advocate_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    // Every status is reported, zero when no case has it.
    let mut cases_by_status: BTreeMap<String, i64> = CASE_STATUSES
        .iter()
        .map(|status| (status.to_string(), 0))
        .collect();
    let status_counts = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, COUNT(*) FROM cases
        WHERE advocate_id = $1 AND is_visible = TRUE
        GROUP BY status
        "#,
    )
    .bind(advocate_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    cases_by_status.extend(status_counts);

    let cases_by_type: BTreeMap<String, i64> = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT case_type, COUNT(*) FROM cases
        WHERE advocate_id = $1 AND is_visible = TRUE
        GROUP BY case_type
        "#,
    )
    .bind(advocate_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .into_iter()
    .collect();

    let monthly_trend: Vec<MonthlyTrendPoint> = sqlx::query_as::<_, (i32, i32, i64)>(
        r#"
        SELECT EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::INT AS year,
               EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::INT AS month,
               COUNT(*)
        FROM cases
        WHERE advocate_id = $1 AND created_at >= $2
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(advocate_id)
    .bind(now - Duration::days(STATS_TREND_DAYS))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .into_iter()
    .map(|(year, month, count)| {
        MonthlyTrendPoint::new(year, u32::try_from(month).unwrap_or(0), count)
    })
    .collect();

    Ok(CaseStatsResponse {
        total_cases,
        pending_cases,
        disposed_cases,
        upcoming_hearings,
        total_documents,
        cases_by_status,
        cases_by_type,
        monthly_trend,
    })
}

/// Fetch a case by id regardless of owner or visibility.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Case>, AppError> {
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = $1");
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// `UPDATE` touching only the changed columns plus `updated_at`.
///
/// `updated_at` never moves backwards. Column names come from
/// [`UpdateCaseRequest::changes`](shared_types::UpdateCaseRequest::changes).
fn update_query(
    id: Uuid,
    advocate_id: Uuid,
    changes: &[ColumnChange],
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE cases SET ");
    for (column, value) in changes {
        qb.push(*column).push(" = ");
        match value.clone() {
            ColumnValue::Text(v) => qb.push_bind(v),
            ColumnValue::Integer(v) => qb.push_bind(v),
            ColumnValue::Bool(v) => qb.push_bind(v),
            ColumnValue::Timestamp(v) => qb.push_bind(v),
        };
        qb.push(", ");
    }
    qb.push("updated_at = GREATEST(updated_at, ")
        .push_bind(now)
        .push(")");
    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(" AND advocate_id = ")
        .push_bind(advocate_id);
    qb.push(format!(" RETURNING {CASE_COLUMNS}"));
    qb
}

/// Apply `changes` to one of the advocate's cases and return the stored row.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    advocate_id: Uuid,
    changes: &[ColumnChange],
    now: DateTime<Utc>,
) -> Result<Case, AppError> {
    let mut qb = update_query(id, advocate_id, changes, now);
    qb.build_query_as::<Case>()
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?
        .ok_or_else(|| AppError::not_found("Case not found"))
}

/// Hide a case from every listing. The row is kept.
pub async fn soft_delete(
    pool: &Pool<Postgres>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE cases SET is_visible = FALSE, updated_at = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Case not found"));
    }
    Ok(())
}
