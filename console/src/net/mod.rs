//! Backend access: wire types, list filters, the gateway client, and the
//! typed admin endpoint surface.
//!
//! DESIGN
//! ======
//! `GatewayClient` is the single choke point for HTTP. It injects the bearer
//! token, maps failures onto `ApiError`, and emits `GatewayEvent`s. It never
//! touches navigation itself. `AdminApi` is a thin typed wrapper, one method
//! per endpoint.

pub mod api;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod types;
