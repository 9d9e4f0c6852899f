//! Request-pipeline middleware.
//!
//! - [`session::require_session`] -- Rejects requests whose session did not log in.

pub mod session;
