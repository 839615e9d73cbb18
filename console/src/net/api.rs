//! Typed admin endpoints. One method per backend operation; each is a thin
//! wrapper over a single verb + path on [`GatewayClient`].

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use super::error::ApiError;
use super::filters::{BookingFilter, MechanicFilter, TransactionFilter, UserFilter};
use super::gateway::GatewayClient;
use super::types::{
    BookingDetail, BookingSummary, DisputeUpdate, LoginRequest, LoginResponse, MechanicDetail, MechanicSummary,
    MutationResult, Paged, PayoutMechanic, PayoutRequest, Stats, Transaction, UserDetail, UserSummary,
    VerifyRequest,
};

#[derive(Clone, Debug)]
pub struct AdminApi {
    gateway: GatewayClient,
}

impl AdminApi {
    #[must_use]
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// `POST /auth/login/admin`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation("email and password are required".into()));
        }
        self.gateway.post("/auth/login/admin", &LoginRequest { email: email.trim(), password }).await
    }

    /// `GET /admin/stats`
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.gateway.get("/admin/stats").await
    }

    /// `GET /admin/users`
    pub async fn users(&self, filter: Option<&UserFilter>) -> Result<Paged<UserSummary>, ApiError> {
        self.gateway.get_with_query("/admin/users", filter).await
    }

    /// `GET /admin/users/:id`
    pub async fn user(&self, id: &str) -> Result<UserDetail, ApiError> {
        self.gateway.get(&format!("/admin/users/{}", segment(id)?)).await
    }

    /// `GET /admin/mechanics`
    pub async fn mechanics(&self, filter: Option<&MechanicFilter>) -> Result<Paged<MechanicSummary>, ApiError> {
        self.gateway.get_with_query("/admin/mechanics", filter).await
    }

    /// `GET /admin/mechanics/:id`
    pub async fn mechanic(&self, id: &str) -> Result<MechanicDetail, ApiError> {
        self.gateway.get(&format!("/admin/mechanics/{}", segment(id)?)).await
    }

    /// `PATCH /admin/mechanics/:id/verify`
    pub async fn set_mechanic_verified(&self, id: &str, is_verified: bool) -> Result<MutationResult, ApiError> {
        let path = format!("/admin/mechanics/{}/verify", segment(id)?);
        self.gateway.patch(&path, &VerifyRequest { is_verified }).await
    }

    /// `GET /admin/bookings`
    pub async fn bookings(&self, filter: Option<&BookingFilter>) -> Result<Paged<BookingSummary>, ApiError> {
        self.gateway.get_with_query("/admin/bookings", filter).await
    }

    /// `GET /admin/bookings/:id`
    pub async fn booking(&self, id: &str) -> Result<BookingDetail, ApiError> {
        self.gateway.get(&format!("/admin/bookings/{}", segment(id)?)).await
    }

    /// `PATCH /admin/bookings/:id/dispute`
    pub async fn set_booking_dispute(&self, id: &str, update: &DisputeUpdate) -> Result<MutationResult, ApiError> {
        let path = format!("/admin/bookings/{}/dispute", segment(id)?);
        self.gateway.patch(&path, update).await
    }

    /// `GET /admin/transactions`
    pub async fn transactions(&self, filter: Option<&TransactionFilter>) -> Result<Paged<Transaction>, ApiError> {
        self.gateway.get_with_query("/admin/transactions", filter).await
    }

    /// `GET /admin/payouts/mechanics`. A `null` body is an empty list.
    pub async fn payout_mechanics(&self) -> Result<Vec<PayoutMechanic>, ApiError> {
        let list: Option<Vec<PayoutMechanic>> = self.gateway.get("/admin/payouts/mechanics").await?;
        Ok(list.unwrap_or_default())
    }

    /// `POST /admin/payouts`
    pub async fn record_payout(&self, payout: &PayoutRequest) -> Result<MutationResult, ApiError> {
        self.gateway.post("/admin/payouts", payout).await
    }
}

/// Percent-encode an id for use as one path segment.
fn segment(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation("id is required".into()));
    }
    Ok(urlencoding::encode(id).into_owned())
}
