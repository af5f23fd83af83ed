//! Row types returned by `sqlx` queries.
//!
//! Enumerated columns are stored as text; each row converts into its
//! `trainhub_core` domain type with `into_domain`.

pub mod notification;
pub mod push_token;
pub mod session;
pub mod settings;

/// Wrap a domain parse failure as a column decode error.
pub(crate) fn decode_err(e: trainhub_core::error::CoreError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}
