use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Record, RecordBuilder, RecordFields};

/// A file attached to a case (petition, order sheet, judgment, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub case_id: Uuid,
    pub khc_document_id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub s3_key: String,
    pub s3_bucket: String,
    pub s3_version_id: Option<String>,
    pub file_size: i64,
    pub content_type: String,
    pub checksum_md5: Option<String>,
    pub upload_status: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub upload_error: Option<String>,
    pub source_url: Option<String>,
    pub is_ocr_required: bool,
    pub ocr_status: String,
    pub ocr_job_id: Option<String>,
    pub extracted_text: Option<String>,
    pub classification_confidence: Option<f64>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub ai_metadata: Option<serde_json::Value>,
    pub is_locked: bool,
    pub lock_reason: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordFields for Document {
    fn record_fields(&self) -> Record {
        RecordBuilder::new()
            .uuid("id", self.id)
            .uuid("case_id", self.case_id)
            .value("khc_document_id", self.khc_document_id.clone())
            .value("category", self.category.clone())
            .value("title", self.title.clone())
            .value("description", self.description.clone())
            .value("s3_key", self.s3_key.clone())
            .value("s3_bucket", self.s3_bucket.clone())
            .value("s3_version_id", self.s3_version_id.clone())
            .value("file_size", self.file_size)
            .value("content_type", self.content_type.clone())
            .value("checksum_md5", self.checksum_md5.clone())
            .value("upload_status", self.upload_status.clone())
            .opt_timestamp("uploaded_at", self.uploaded_at.as_ref())
            .value("upload_error", self.upload_error.clone())
            .value("source_url", self.source_url.clone())
            .value("is_ocr_required", self.is_ocr_required)
            .value("ocr_status", self.ocr_status.clone())
            .value("ocr_job_id", self.ocr_job_id.clone())
            .value("extracted_text", self.extracted_text.clone())
            .value("classification_confidence", self.classification_confidence)
            .json("ai_metadata", self.ai_metadata.as_ref())
            .value("is_locked", self.is_locked)
            .value("lock_reason", self.lock_reason.clone())
            .opt_timestamp("locked_at", self.locked_at.as_ref())
            .timestamp("created_at", &self.created_at)
            .timestamp("updated_at", &self.updated_at)
            .build()
    }
}
