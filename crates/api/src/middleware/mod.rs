//! Request middleware and extractors.

pub mod auth;

pub use auth::{AUTH_TOKEN_HEADER, RequireAccount, RequireAdmin, RequireUser};
