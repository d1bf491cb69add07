use shared_types::{AppError, Document};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// All documents attached to a case, oldest first.
pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<Document>, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        SELECT id, case_id, khc_document_id, category, title, description,
               s3_key, s3_bucket, s3_version_id, file_size, content_type,
               checksum_md5, upload_status, uploaded_at, upload_error, source_url,
               is_ocr_required, ocr_status, ocr_job_id, extracted_text,
               classification_confidence, ai_metadata, is_locked, lock_reason,
               locked_at, created_at, updated_at
        FROM documents
        WHERE case_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
