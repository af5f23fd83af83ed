//! Authentication primitives.
//!
//! Tokens are issued elsewhere; this service only validates them.

pub mod jwt;
