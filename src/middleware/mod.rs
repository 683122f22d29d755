//! Request extractors for cross-cutting concerns.
//!
//! - [`auth`]: bearer-token authentication
//!
//! Handlers that need an authenticated caller take an [`auth::AuthUser`]
//! argument; a request without a valid `Authorization: Bearer <token>`
//! header is rejected with 401 before the handler runs.

pub mod auth;
