//! Query filters for the list endpoints.
//!
//! Every field is optional and is left out of the query string when `None`.
//! Raw form input goes through [`text`] / [`tri_state`] / [`choice`] so an
//! empty box or an "All" option becomes `None` rather than an empty or
//! sentinel value.

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;

use serde::Serialize;

use crate::net::error::ApiError;

/// Blank input means "no filter".
#[must_use]
pub fn text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(ToOwned::to_owned)
}

/// Parse a `"true"` / `"false"` / anything-else select into a tri-state filter.
#[must_use]
pub fn tri_state(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Pick a code from a fixed table. Matching ignores case and surrounding
/// whitespace; blank input means "no filter".
///
/// # Errors
///
/// [`ApiError::Validation`] listing the known codes when `raw` matches none.
pub fn choice(raw: Option<&str>, allowed: &[&str]) -> Result<Option<String>, ApiError> {
    let Some(value) = text(raw) else {
        return Ok(None);
    };
    allowed
        .iter()
        .find(|code| code.eq_ignore_ascii_case(&value))
        .map(|code| Some((*code).to_owned()))
        .ok_or_else(|| {
            ApiError::Validation(format!("Unknown value \"{value}\"; expected one of {}", allowed.join(", ")))
        })
}

/// Page number and size shared by every list filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PageQuery {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page: Some(page), limit: Some(limit) }
    }
}

/// `GET /admin/users` filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

/// `GET /admin/mechanics` filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicFilter {
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

/// `GET /admin/bookings` filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_dispute: Option<bool>,
}

/// `GET /admin/transactions` filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}
