//! Asset request model

use std::borrow::Cow;

use chrono::{DateTime, Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgTypeInfo, Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// How far ahead of today a request date may be
pub const REQUEST_WINDOW_MONTHS: u32 = 2;

static EMPLOYEE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ATS0[0-9]{3}$").unwrap());
static OTHER_ASSET_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());

// ---------------------------------------------------------------------------
// AssetType
// ---------------------------------------------------------------------------

/// Catalog of requestable assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AssetType {
    Laptop,
    Desktop,
    Monitor,
    Keyboard,
    Mouse,
    Headset,
    Phone,
    Tablet,
    Printer,
    /// Anything outside the catalog, described by `otherAssetName`
    Other,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Laptop => "Laptop",
            AssetType::Desktop => "Desktop",
            AssetType::Monitor => "Monitor",
            AssetType::Keyboard => "Keyboard",
            AssetType::Mouse => "Mouse",
            AssetType::Headset => "Headset",
            AssetType::Phone => "Phone",
            AssetType::Tablet => "Tablet",
            AssetType::Printer => "Printer",
            AssetType::Other => "Other",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Laptop" => Ok(AssetType::Laptop),
            "Desktop" => Ok(AssetType::Desktop),
            "Monitor" => Ok(AssetType::Monitor),
            "Keyboard" => Ok(AssetType::Keyboard),
            "Mouse" => Ok(AssetType::Mouse),
            "Headset" => Ok(AssetType::Headset),
            "Phone" => Ok(AssetType::Phone),
            "Tablet" => Ok(AssetType::Tablet),
            "Printer" => Ok(AssetType::Printer),
            "Other" => Ok(AssetType::Other),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

// SQLx conversion for AssetType (stored as text)
impl sqlx::Type<Postgres> for AssetType {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for AssetType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AssetType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Review status of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Parse a reviewer decision. Only `Approved` and `Rejected` are
    /// accepted; a request cannot be put back to `Pending`.
    pub fn parse_decision(s: &str) -> AppResult<Self> {
        match s.parse::<RequestStatus>() {
            Ok(status @ (RequestStatus::Approved | RequestStatus::Rejected)) => Ok(status),
            _ => Err(AppError::Validation("Invalid status".to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Approved" => Ok(RequestStatus::Approved),
            "Rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Asset request record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    pub id: i32,
    pub employee_name: String,
    /// Employee identifier (ATS0 followed by three digits)
    pub employee_id: String,
    pub asset_type: AssetType,
    /// Custom asset name, only set when `assetType` is `Other`
    pub other_asset_name: Option<String>,
    pub reason: String,
    /// Date the asset is needed (YYYY-MM-DD)
    pub request_date: NaiveDate,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Submit asset request body.
///
/// Every field defaults to empty so that a missing field is reported by the
/// validation schema with the same message as an invalid one.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_other_asset_name", skip_on_field_errors = false))]
pub struct SubmitAssetRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_employee_name"))]
    pub employee_name: String,
    #[serde(default, alias = "employeeID")]
    #[validate(custom(function = "validate_employee_id"))]
    pub employee_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_asset_type"))]
    pub asset_type: String,
    #[serde(default)]
    pub other_asset_name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_reason"))]
    pub reason: String,
    /// Date the asset is needed (YYYY-MM-DD)
    #[serde(default)]
    pub request_date: String,
}

/// A validated submission, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetRequest {
    pub employee_name: String,
    pub employee_id: String,
    pub asset_type: AssetType,
    pub other_asset_name: Option<String>,
    pub reason: String,
    pub request_date: NaiveDate,
}

impl NewAssetRequest {
    /// Name of the requested asset as shown to users
    pub fn asset_label(&self) -> &str {
        match (&self.asset_type, &self.other_asset_name) {
            (AssetType::Other, Some(name)) => name.as_str(),
            (asset_type, _) => asset_type.as_str(),
        }
    }

    pub fn duplicate_error(&self) -> AppError {
        AppError::Duplicate(format!("Duplicate request for {}", self.asset_label()))
    }
}

/// Update request status body
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    /// `Approved` or `Rejected`
    #[serde(default)]
    pub status: Option<String>,
}

/// Bulk delete body
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequests {
    #[serde(default)]
    pub ids: Option<Vec<i32>>,
}

/// Query parameters for listing requests
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AssetRequestQuery {
    /// Status to filter on, `all` for no filter
    pub status: Option<String>,
    /// Case-insensitive substring of the employee name
    pub search: Option<String>,
}

impl AssetRequestQuery {
    /// Status filter, if any
    pub fn status_filter(&self) -> Option<&str> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty() && *s != "all")
    }

    /// Search filter, if any
    pub fn search_filter(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Validation schema
// ---------------------------------------------------------------------------

/// Error codes in the order they are reported. The request date is checked
/// last, outside the schema, because it depends on the current date.
const VALIDATION_ORDER: [&str; 5] = [
    "employee_name",
    "employee_id",
    "asset_type",
    "other_asset_name",
    "reason",
];

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn trimmed_len_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

fn validate_employee_name(name: &str) -> Result<(), ValidationError> {
    if !trimmed_len_between(name, 5, 40) {
        return Err(invalid(
            "employee_name",
            "Employee name must be between 5 and 40 characters",
        ));
    }
    Ok(())
}

fn validate_employee_id(employee_id: &str) -> Result<(), ValidationError> {
    if !EMPLOYEE_ID_PATTERN.is_match(employee_id) || employee_id.ends_with("000") {
        return Err(invalid("employee_id", "Invalid employee ID format"));
    }
    Ok(())
}

fn validate_asset_type(asset_type: &str) -> Result<(), ValidationError> {
    let asset_type = asset_type.trim();
    if asset_type.is_empty() {
        return Err(invalid("asset_type", "Asset type is required"));
    }
    asset_type
        .parse::<AssetType>()
        .map(|_| ())
        .map_err(|e| invalid("asset_type", e))
}

fn validate_other_asset_name(request: &SubmitAssetRequest) -> Result<(), ValidationError> {
    if request.asset_type.trim() != AssetType::Other.as_str() {
        return Ok(());
    }
    match request.other_asset_name.as_deref() {
        Some(name) if OTHER_ASSET_NAME_PATTERN.is_match(name) && trimmed_len_between(name, 3, 30) => {
            Ok(())
        }
        _ => Err(invalid("other_asset_name", "Invalid other asset name")),
    }
}

fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if !trimmed_len_between(reason, 5, 300) {
        return Err(invalid(
            "reason",
            "Reason must be between 5 and 300 characters",
        ));
    }
    Ok(())
}

/// Pick the error to report: the first failing check in `VALIDATION_ORDER`.
fn first_error(errors: &ValidationErrors) -> AppError {
    let all: Vec<&ValidationError> = errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .collect();

    VALIDATION_ORDER
        .iter()
        .find_map(|code| all.iter().find(|e| e.code == *code))
        .or_else(|| all.first())
        .map(|e| {
            AppError::Validation(
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", e.code)),
            )
        })
        .unwrap_or_else(|| AppError::Validation("Invalid request".to_string()))
}

/// Parse a request date, given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_request_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Latest acceptable request date for a submission made on `today`.
/// Month overflow clamps to the last day of the target month (Dec 31 gives
/// Feb 28/29). JavaScript's `Date.setMonth` rolls over into March instead,
/// so a browser-side check can allow a day or two more than this one.
pub fn latest_request_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(REQUEST_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether `date` falls in `[today, today + 2 months]`
pub fn is_within_request_window(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && date <= latest_request_date(today)
}

impl SubmitAssetRequest {
    /// Validate the submission against the schema and the request window
    /// starting at `today`, and normalize it for storage.
    pub fn into_new_request(self, today: NaiveDate) -> AppResult<NewAssetRequest> {
        self.validate().map_err(|e| first_error(&e))?;

        let request_date = parse_request_date(&self.request_date)
            .filter(|date| is_within_request_window(*date, today))
            .ok_or_else(|| AppError::Validation("Invalid request date".to_string()))?;

        let asset_type: AssetType = self
            .asset_type
            .trim()
            .parse()
            .map_err(AppError::Validation)?;

        let other_asset_name = match asset_type {
            AssetType::Other => self.other_asset_name.map(|name| name.trim().to_string()),
            _ => None,
        };

        Ok(NewAssetRequest {
            employee_name: self.employee_name.trim().to_string(),
            employee_id: self.employee_id,
            asset_type,
            other_asset_name,
            reason: self.reason.trim().to_string(),
            request_date,
        })
    }
}
