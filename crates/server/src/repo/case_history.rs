use shared_types::{AppError, CaseHistory};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Proceedings of a case, most recent event first.
pub async fn list_by_case(
    pool: &Pool<Postgres>,
    case_id: Uuid,
) -> Result<Vec<CaseHistory>, AppError> {
    sqlx::query_as::<_, CaseHistory>(
        r#"
        SELECT id, case_id, event_type, event_date, business_recorded,
               judge_name, bench_type, court_number, next_hearing_date,
               order_document_id, created_at
        FROM case_history
        WHERE case_id = $1
        ORDER BY event_date DESC
        "#,
    )
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
