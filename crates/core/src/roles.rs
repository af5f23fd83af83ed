//! Well-known role names carried in the `role` JWT claim.

/// Operators allowed to trigger scheduler jobs by hand.
pub const ROLE_ADMIN: &str = "admin";
