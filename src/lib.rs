//! Bearer ID-token authentication for an HTTP gateway.
//!
//! `services::auth` holds the core: bearer stripping, the pluggable
//! `ClaimsVerifier`, the `IdentityResolver` and the per-request
//! `IdTokenCredentials` slot. The rest is the axum host around it.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
