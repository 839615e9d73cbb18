//! Wire types for the admin REST contract.
//!
//! Field names follow the backend's camelCase JSON. Members the backend may
//! omit or send as `null` are `Option`, or fall back to their default through
//! `null_as_default` where the console has a natural display default, so
//! partially populated payloads still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// Decode a member the backend may send as `null` or leave out, falling back
/// to the type's default in both cases.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Role string that grants access to protected console routes.
pub const ADMIN_ROLE: &str = "ADMIN";

// =============================================================================
// AUTH
// =============================================================================

/// Identity returned by the admin login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl AdminUser {
    /// Whether this identity carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// `POST /auth/login/admin` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/login/admin` response body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AdminUser,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Paged list envelope shared by every list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    #[serde(default, deserialize_with = "null_as_default", bound(deserialize = "T: Deserialize<'de>"))]
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

// =============================================================================
// STATS
// =============================================================================

/// Aggregate counters for the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mechanics_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified_mechanics: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookings_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue_naira: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disputed_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookings_by_status: BTreeMap<String, u64>,
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_verified: bool,
    pub created_at: Option<String>,
}

impl UserSummary {
    /// Non-empty first/last names joined with a space, or `"No name"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub profile: Option<UserProfile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookings: Vec<BookingSummary>,
}

pub(crate) fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    let parts: Vec<&str> = [first, last].into_iter().flatten().filter(|part| !part.is_empty()).collect();
    if parts.is_empty() { "No name".to_owned() } else { parts.join(" ") }
}

// =============================================================================
// MECHANICS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicProfile {
    pub avatar: Option<String>,
}

/// Amount the platform owes a mechanic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance_minor: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance_naira: f64,
}

/// Amount a mechanic owes the platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub owing_minor: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owing_naira: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicSummary {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    pub created_at: Option<String>,
    pub profile: Option<MechanicProfile>,
    pub balance: Option<Balance>,
    pub owing: Option<Owing>,
}

impl MechanicSummary {
    /// Platform balance in minor units, zero when absent.
    #[must_use]
    pub fn balance_minor(&self) -> i64 {
        self.balance.as_ref().map_or(0, |b| b.balance_minor)
    }

    /// A payout can only be recorded against a positive balance.
    #[must_use]
    pub fn is_payout_eligible(&self) -> bool {
        self.balance_minor() > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicDetail {
    #[serde(flatten)]
    pub summary: MechanicSummary,
    pub default_bank_account: Option<BankAccount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookings: Vec<BookingSummary>,
}

/// Entry of `GET /admin/payouts/mechanics`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutMechanic {
    #[serde(flatten)]
    pub summary: MechanicSummary,
    pub default_bank_account: Option<BankAccount>,
}

// =============================================================================
// BOOKINGS
// =============================================================================

/// Known booking lifecycle states, in order.
pub const BOOKING_STATUSES: [&str; 6] = ["REQUESTED", "ACCEPTED", "IN_PROGRESS", "DONE", "PAID", "DELIVERED"];

/// Human label for a booking status (`IN_PROGRESS` -> `IN PROGRESS`).
#[must_use]
pub fn booking_status_label(status: &str) -> String {
    status.replacen('_', " ", 1)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMechanic {
    pub id: Option<String>,
    pub company_name: Option<String>,
    pub owner_full_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub brand: Option<String>,
    pub model: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    pub created_at: Option<String>,
    pub estimated_cost: Option<f64>,
    pub dispute_reason: Option<String>,
    pub dispute_resolved_at: Option<String>,
    pub user: Option<PartyUser>,
    pub mechanic: Option<PartyMechanic>,
    pub vehicle: Option<Vehicle>,
    pub fault: Option<Fault>,
}

impl BookingSummary {
    /// A dispute is open when a reason is recorded and it is not yet resolved.
    #[must_use]
    pub fn has_open_dispute(&self) -> bool {
        self.dispute_reason.as_deref().is_some_and(|reason| !reason.is_empty()) && self.dispute_resolved_at.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    #[serde(flatten)]
    pub summary: BookingSummary,
    pub paid_at: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Transaction type codes with their display labels.
pub const TRANSACTION_TYPES: [(&str, &str); 4] = [
    ("USER_PAYMENT", "User payment"),
    ("PLATFORM_PAYOUT", "Payout"),
    ("MECHANIC_FEE", "Mechanic fee"),
    ("REFUND", "Refund"),
];

/// Known transaction status codes.
pub const TRANSACTION_STATUSES: [&str; 3] = ["PENDING", "SUCCESS", "FAILED"];

/// Display label for a transaction type; unknown codes render verbatim.
#[must_use]
pub fn transaction_type_label(kind: &str) -> &str {
    TRANSACTION_TYPES.iter().find(|(code, _)| *code == kind).map_or(kind, |(_, label)| label)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount_minor: i64,
    pub amount_naira: Option<f64>,
    pub created_at: Option<String>,
    pub user: Option<PartyUser>,
    pub mechanic: Option<PartyMechanic>,
}

impl Transaction {
    /// Email of the paying user, else the mechanic's company name.
    #[must_use]
    pub fn party(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .or_else(|| self.mechanic.as_ref().and_then(|m| m.company_name.as_deref()))
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// `PATCH /admin/mechanics/:id/verify` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub is_verified: bool,
}

/// Change applied through `PATCH /admin/bookings/:id/dispute`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisputeUpdate {
    /// Record (or clear, with `None`) the dispute reason.
    Reason(Option<String>),
    /// Mark the open dispute as resolved.
    Resolve,
}

impl DisputeUpdate {
    /// Build a reason update, treating blank input as "no reason".
    #[must_use]
    pub fn reason(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::Reason((!trimmed.is_empty()).then(|| trimmed.to_owned()))
    }
}

impl Serialize for DisputeUpdate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            dispute_reason: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            resolve: Option<bool>,
        }

        let wire = match self {
            Self::Reason(reason) => Wire { dispute_reason: reason.as_deref(), resolve: None },
            Self::Resolve => Wire { dispute_reason: None, resolve: Some(true) },
        };
        wire.serialize(serializer)
    }
}

/// `POST /admin/payouts` body. Only constructible through [`PayoutRequest::new`],
/// so non-positive amounts never reach the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    mechanic_id: String,
    amount_minor: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

impl PayoutRequest {
    /// Validate and build a payout. A blank reference is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank mechanic id or a
    /// non-positive amount.
    pub fn new(mechanic_id: &str, amount_minor: i64, reference: Option<&str>) -> Result<Self, ApiError> {
        let mechanic_id = mechanic_id.trim();
        if mechanic_id.is_empty() {
            return Err(ApiError::Validation("mechanic id is required".into()));
        }
        if amount_minor <= 0 {
            return Err(ApiError::Validation("Enter a valid amount".into()));
        }
        let reference = reference.map(str::trim).filter(|r| !r.is_empty()).map(ToOwned::to_owned);
        Ok(Self { mechanic_id: mechanic_id.to_owned(), amount_minor, reference })
    }

    #[must_use]
    pub fn mechanic_id(&self) -> &str {
        &self.mechanic_id
    }

    #[must_use]
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Response of a mutation endpoint. The backend owns the exact shape, so it
/// is passed through as JSON.
pub type MutationResult = Value;
