//! # Entrata
//!
//! Session-based login and registration demo service.
//!
//! A small axum application wiring together cookie-backed sessions, Argon2id
//! password hashing, and an in-memory credential store behind a handful of
//! server-rendered routes. Route handlers depend on a `UserStore` trait and a
//! request-scoped authentication context, so neither the
//! storage container nor the session mechanics leak into routing logic.
//!
//! Modules:
//! - [`cli`]: clap command, dispatch, and telemetry bootstrap.
//! - [`entrata`]: router, handlers, and the auth/user domain.

pub mod cli;
pub mod entrata;
