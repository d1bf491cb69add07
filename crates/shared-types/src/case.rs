use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::AppError;
use crate::Record;

// ── Enumerations ────────────────────────────────────────────────────

/// Valid case status values matching the DB CHECK constraint.
pub const CASE_STATUSES: &[&str] = &["filed", "registered", "pending", "disposed", "transferred"];

/// Procedural status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Filed,
    Registered,
    Pending,
    Disposed,
    Transferred,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Filed => "filed",
            CaseStatus::Registered => "registered",
            CaseStatus::Pending => "pending",
            CaseStatus::Disposed => "disposed",
            CaseStatus::Transferred => "transferred",
        }
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filed" => Ok(CaseStatus::Filed),
            "registered" => Ok(CaseStatus::Registered),
            "pending" => Ok(CaseStatus::Pending),
            "disposed" => Ok(CaseStatus::Disposed),
            "transferred" => Ok(CaseStatus::Transferred),
            other => Err(AppError::bad_request(format!(
                "Invalid status: {}. Valid values: all, {}",
                other,
                CASE_STATUSES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the case the advocate represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Petitioner,
    Respondent,
    Appellant,
    Other,
}

impl PartyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyRole::Petitioner => "petitioner",
            PartyRole::Respondent => "respondent",
            PartyRole::Appellant => "appellant",
            PartyRole::Other => "other",
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DB row struct ───────────────────────────────────────────────────

/// A case tracked on behalf of an advocate.
///
/// `status` and `party_role` hold the underlying enum values as stored in
/// the database, so the row serializes without any enum-name mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Case {
    pub id: Uuid,
    pub advocate_id: Uuid,
    pub case_number: Option<String>,
    pub efiling_number: String,
    pub case_type: String,
    pub case_year: i32,
    pub party_role: String,
    pub petitioner_name: String,
    pub respondent_name: String,
    pub efiling_date: DateTime<Utc>,
    pub efiling_details: Option<String>,
    pub bench_type: Option<String>,
    pub judge_name: Option<String>,
    pub court_number: Option<String>,
    pub status: String,
    pub next_hearing_date: Option<DateTime<Utc>>,
    pub khc_source_url: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub sync_status: String,
    pub is_visible: bool,
    pub transferred_reason: Option<String>,
    pub transferred_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    pub fn is_owned_by(&self, advocate_id: Uuid) -> bool {
        self.advocate_id == advocate_id
    }
}

// ── Sorting ─────────────────────────────────────────────────────────

/// Columns a case listing may be ordered by.
///
/// Every case column is sortable. Unknown names resolve to `UpdatedAt`
/// instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSortField {
    Id,
    AdvocateId,
    CaseNumber,
    EfilingNumber,
    CaseType,
    CaseYear,
    PartyRole,
    PetitionerName,
    RespondentName,
    EfilingDate,
    EfilingDetails,
    BenchType,
    JudgeName,
    CourtNumber,
    Status,
    NextHearingDate,
    KhcSourceUrl,
    LastSyncedAt,
    SyncStatus,
    IsVisible,
    TransferredReason,
    TransferredAt,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl CaseSortField {
    const ALL: &'static [CaseSortField] = &[
        CaseSortField::Id,
        CaseSortField::AdvocateId,
        CaseSortField::CaseNumber,
        CaseSortField::EfilingNumber,
        CaseSortField::CaseType,
        CaseSortField::CaseYear,
        CaseSortField::PartyRole,
        CaseSortField::PetitionerName,
        CaseSortField::RespondentName,
        CaseSortField::EfilingDate,
        CaseSortField::EfilingDetails,
        CaseSortField::BenchType,
        CaseSortField::JudgeName,
        CaseSortField::CourtNumber,
        CaseSortField::Status,
        CaseSortField::NextHearingDate,
        CaseSortField::KhcSourceUrl,
        CaseSortField::LastSyncedAt,
        CaseSortField::SyncStatus,
        CaseSortField::IsVisible,
        CaseSortField::TransferredReason,
        CaseSortField::TransferredAt,
        CaseSortField::CreatedAt,
        CaseSortField::UpdatedAt,
    ];

    /// Column name in the `cases` table. Also the accepted `sort` parameter.
    pub fn column(&self) -> &'static str {
        match self {
            CaseSortField::Id => "id",
            CaseSortField::AdvocateId => "advocate_id",
            CaseSortField::CaseNumber => "case_number",
            CaseSortField::EfilingNumber => "efiling_number",
            CaseSortField::CaseType => "case_type",
            CaseSortField::CaseYear => "case_year",
            CaseSortField::PartyRole => "party_role",
            CaseSortField::PetitionerName => "petitioner_name",
            CaseSortField::RespondentName => "respondent_name",
            CaseSortField::EfilingDate => "efiling_date",
            CaseSortField::EfilingDetails => "efiling_details",
            CaseSortField::BenchType => "bench_type",
            CaseSortField::JudgeName => "judge_name",
            CaseSortField::CourtNumber => "court_number",
            CaseSortField::Status => "status",
            CaseSortField::NextHearingDate => "next_hearing_date",
            CaseSortField::KhcSourceUrl => "khc_source_url",
            CaseSortField::LastSyncedAt => "last_synced_at",
            CaseSortField::SyncStatus => "sync_status",
            CaseSortField::IsVisible => "is_visible",
            CaseSortField::TransferredReason => "transferred_reason",
            CaseSortField::TransferredAt => "transferred_at",
            CaseSortField::CreatedAt => "created_at",
            CaseSortField::UpdatedAt => "updated_at",
        }
    }

    /// Resolve a `sort` query parameter, falling back to `updated_at`.
    pub fn from_param(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.column() == name)
            .unwrap_or_default()
    }
}

/// Direction for a case listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `"desc"` sorts descending; any other value sorts ascending.
    pub fn from_param(order: &str) -> Self {
        if order == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────────

/// Number of pages needed for `total` rows; never less than one.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 1;
    }
    ((total + per_page - 1) / per_page).max(1)
}

/// Row offset of the first item on a 1-based page.
///
/// Saturates at `i64::MAX`, which selects an empty page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page.max(0))
}

// ── Query parameters ────────────────────────────────────────────────

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Query parameters for `GET /api/v1/cases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CaseListParams {
    /// Case status, or `all` for no status filter.
    pub status: Option<String>,
    pub case_type: Option<String>,
    pub case_year: Option<i32>,
    /// Matched against case number, e-filing number and party names.
    pub search: Option<String>,
    /// Column to sort by (default `updated_at`).
    pub sort: Option<String>,
    /// `asc` or `desc` (default `desc`).
    pub order: Option<String>,
    #[serde(default = "default_page")]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "page must be at least 1"))
    )]
    pub page: i64,
    #[serde(default = "default_per_page")]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))
    )]
    pub per_page: i64,
}

impl Default for CaseListParams {
    fn default() -> Self {
        Self {
            status: None,
            case_type: None,
            case_year: None,
            search: None,
            sort: None,
            order: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Normalized filter, sort and window for a case listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseListQuery {
    pub status: Option<CaseStatus>,
    pub case_type: Option<String>,
    pub case_year: Option<i32>,
    pub search: Option<String>,
    pub sort: CaseSortField,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl TryFrom<&CaseListParams> for CaseListQuery {
    type Error = AppError;

    fn try_from(params: &CaseListParams) -> Result<Self, Self::Error> {
        let status = match params.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<CaseStatus>()?),
        };

        Ok(Self {
            status,
            case_type: non_empty(params.case_type.as_deref()),
            // Year 0 is treated as unset.
            case_year: params.case_year.filter(|y| *y != 0),
            search: non_empty(params.search.as_deref()),
            sort: params
                .sort
                .as_deref()
                .map(CaseSortField::from_param)
                .unwrap_or_default(),
            order: params
                .order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
            limit: params.per_page,
            offset: page_offset(params.page, params.per_page),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Query parameters for `GET /api/v1/cases/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CaseSearchParams {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 2, message = "Search query must be at least 2 characters"))
    )]
    pub q: String,
}

fn default_days() -> i64 {
    7
}

/// Query parameters for `GET /api/v1/cases/upcoming-hearings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpcomingHearingsParams {
    /// Days to look ahead (1-90, default 7).
    #[serde(default = "default_days")]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 90, message = "days must be between 1 and 90"))
    )]
    pub days: i64,
}

impl Default for UpcomingHearingsParams {
    fn default() -> Self {
        Self { days: default_days() }
    }
}

// ── API response types ──────────────────────────────────────────────

/// Paginated case listing. `items` and `cases` carry the same page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseListResponse {
    pub items: Vec<Case>,
    pub cases: Vec<Case>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl CaseListResponse {
    pub fn new(cases: Vec<Case>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            items: cases.clone(),
            cases,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        }
    }
}

/// Unpaginated list of cases (search and upcoming hearings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CasesResponse {
    pub cases: Vec<Case>,
}

/// Cases created in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MonthlyTrendPoint {
    /// Three-letter month abbreviation, without the year.
    pub month: String,
    pub count: i64,
}

impl MonthlyTrendPoint {
    pub fn new(year: i32, month: u32, count: i64) -> Self {
        Self {
            month: month_label(year, month),
            count,
        }
    }
}

/// `"Jan"` .. `"Dec"` for a calendar month; empty for an invalid month.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

/// Dashboard statistics for the calling advocate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseStatsResponse {
    pub total_cases: i64,
    pub pending_cases: i64,
    pub disposed_cases: i64,
    pub upcoming_hearings: i64,
    pub total_documents: i64,
    /// Every status value, zero-filled.
    pub cases_by_status: BTreeMap<String, i64>,
    pub cases_by_type: BTreeMap<String, i64>,
    pub monthly_trend: Vec<MonthlyTrendPoint>,
}

/// A case with its documents, history and AI analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseDetailResponse {
    #[serde(flatten)]
    pub case: Case,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub documents: Vec<Record>,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub history: Vec<Record>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub ai_analysis: Option<Record>,
}

/// Confirmation returned by a soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteCaseResponse {
    pub message: String,
    pub case_id: String,
}

impl DeleteCaseResponse {
    pub fn new(case_id: Uuid) -> Self {
        Self {
            message: "Case deleted successfully".to_string(),
            case_id: case_id.to_string(),
        }
    }
}

// ── Update request ──────────────────────────────────────────────────

/// A present field must carry a value; `null` is a decode error.
///
/// Decoded through `Option<T>` so `null` is a data error for every `T`,
/// enums included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(de::Error::invalid_type(de::Unexpected::Unit, &"a non-null value")),
    }
}

/// A present field may be `null`, which clears the column.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update of a case.
///
/// Outer `None` means the field was absent and is left untouched. For
/// nullable columns `Some(None)` is an explicit `null` and clears the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCaseRequest {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub case_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub case_year: Option<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub party_role: Option<PartyRole>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub petitioner_name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub efiling_details: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub bench_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub judge_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub court_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub next_hearing_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub transferred_reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub transferred_at: Option<Option<DateTime<Utc>>>,
}

/// New value for one `cases` column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Integer(i32),
    Bool(bool),
    Timestamp(Option<DateTime<Utc>>),
}

/// A column name paired with the value to store in it.
pub type ColumnChange = (&'static str, ColumnValue);

impl UpdateCaseRequest {
    /// The present fields as column assignments, in a fixed order.
    /// Absent fields produce nothing; `updated_at` is never included.
    pub fn changes(&self) -> Vec<ColumnChange> {
        let text = |v: &Option<String>| ColumnValue::Text(v.clone());
        let required = |v: &String| ColumnValue::Text(Some(v.clone()));
        let mut changes = Vec::new();

        if let Some(v) = &self.case_number {
            changes.push(("case_number", text(v)));
        }
        if let Some(v) = &self.case_type {
            changes.push(("case_type", required(v)));
        }
        if let Some(v) = self.case_year {
            changes.push(("case_year", ColumnValue::Integer(v)));
        }
        if let Some(v) = self.party_role {
            changes.push(("party_role", ColumnValue::Text(Some(v.as_str().to_string()))));
        }
        if let Some(v) = &self.petitioner_name {
            changes.push(("petitioner_name", required(v)));
        }
        if let Some(v) = &self.respondent_name {
            changes.push(("respondent_name", required(v)));
        }
        if let Some(v) = &self.efiling_details {
            changes.push(("efiling_details", text(v)));
        }
        if let Some(v) = &self.bench_type {
            changes.push(("bench_type", text(v)));
        }
        if let Some(v) = &self.judge_name {
            changes.push(("judge_name", text(v)));
        }
        if let Some(v) = &self.court_number {
            changes.push(("court_number", text(v)));
        }
        if let Some(v) = self.status {
            changes.push(("status", ColumnValue::Text(Some(v.as_str().to_string()))));
        }
        if let Some(v) = self.next_hearing_date {
            changes.push(("next_hearing_date", ColumnValue::Timestamp(v)));
        }
        if let Some(v) = &self.sync_status {
            changes.push(("sync_status", required(v)));
        }
        if let Some(v) = self.is_visible {
            changes.push(("is_visible", ColumnValue::Bool(v)));
        }
        if let Some(v) = &self.transferred_reason {
            changes.push(("transferred_reason", text(v)));
        }
        if let Some(v) = self.transferred_at {
            changes.push(("transferred_at", ColumnValue::Timestamp(v)));
        }

        changes
    }
}
