//! Request extractors: session-cookie resolution and page gates.

pub mod auth;
pub mod rbac;
