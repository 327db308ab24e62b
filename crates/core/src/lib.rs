//! Domain logic for the MKT Lab ops console.
//!
//! Everything HTTP-agnostic lives here: the canonical session record and
//! the normalization of backend login responses, the login/admin gates,
//! and the test-suite subprocess runner. The web layer in `mktlab-console`
//! builds on these.

pub mod error;
pub mod gate;
pub mod roles;
pub mod session;
pub mod testrun;
