use shared_types::{AiAnalysis, AppError};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// The first analysis recorded for a case, if any.
pub async fn first_for_case(
    pool: &Pool<Postgres>,
    case_id: Uuid,
) -> Result<Option<AiAnalysis>, AppError> {
    sqlx::query_as::<_, AiAnalysis>(
        r#"
        SELECT id, case_id, advocate_id, status, model_version, analysis,
               urgency_level, case_summary, processed_at, processing_time_seconds,
               token_count, error_message, retry_count, created_at, updated_at
        FROM ai_analyses
        WHERE case_id = $1
        ORDER BY created_at ASC, id ASC
        LIMIT 1
        "#,
    )
    .bind(case_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
