use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Record, RecordBuilder, RecordFields};

/// One entry in a case's proceedings history (hearing, order, adjournment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CaseHistory {
    pub id: Uuid,
    pub case_id: Uuid,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    pub business_recorded: String,
    pub judge_name: Option<String>,
    pub bench_type: Option<String>,
    pub court_number: Option<String>,
    pub next_hearing_date: Option<DateTime<Utc>>,
    pub order_document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl RecordFields for CaseHistory {
    fn record_fields(&self) -> Record {
        RecordBuilder::new()
            .uuid("id", self.id)
            .uuid("case_id", self.case_id)
            .value("event_type", self.event_type.clone())
            .timestamp("event_date", &self.event_date)
            .value("business_recorded", self.business_recorded.clone())
            .value("judge_name", self.judge_name.clone())
            .value("bench_type", self.bench_type.clone())
            .value("court_number", self.court_number.clone())
            .opt_timestamp("next_hearing_date", self.next_hearing_date.as_ref())
            .opt_uuid("order_document_id", self.order_document_id)
            .timestamp("created_at", &self.created_at)
            .build()
    }
}
