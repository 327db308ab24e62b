//! Well-known role name constants.
//!
//! The backend emits upper-case role names; the session normalizer
//! upper-cases anything else before these are compared.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_COMPRADOR: &str = "COMPRADOR";
pub const ROLE_VENDEDOR: &str = "VENDEDOR";
