use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Record, RecordBuilder, RecordFields};

/// Model-generated analysis of a case. At most one is shown per case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AiAnalysis {
    pub id: Uuid,
    pub case_id: Uuid,
    pub advocate_id: Uuid,
    pub status: String,
    pub model_version: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub analysis: Option<serde_json::Value>,
    pub urgency_level: Option<String>,
    pub case_summary: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_time_seconds: Option<f64>,
    pub token_count: Option<i32>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordFields for AiAnalysis {
    fn record_fields(&self) -> Record {
        RecordBuilder::new()
            .uuid("id", self.id)
            .uuid("case_id", self.case_id)
            .uuid("advocate_id", self.advocate_id)
            .value("status", self.status.clone())
            .value("model_version", self.model_version.clone())
            .json("analysis", self.analysis.as_ref())
            .value("urgency_level", self.urgency_level.clone())
            .value("case_summary", self.case_summary.clone())
            .opt_timestamp("processed_at", self.processed_at.as_ref())
            .value("processing_time_seconds", self.processing_time_seconds)
            .value("token_count", self.token_count)
            .value("error_message", self.error_message.clone())
            .value("retry_count", self.retry_count)
            .timestamp("created_at", &self.created_at)
            .timestamp("updated_at", &self.updated_at)
            .build()
    }
}
