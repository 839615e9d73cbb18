//! # admin-console
//!
//! Client core for the mechanic marketplace admin console.
//!
//! This crate owns the admin session (token + identity, persisted across
//! restarts), the gateway client every backend call goes through, the route
//! table with its admin guard, and the small presentation rules (pagination,
//! money parsing) that the console surfaces share.
//!
//! The backend is external; only its REST contract is modeled here.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;

pub use app::{Console, ConsoleError};
pub use config::ConsoleConfig;
