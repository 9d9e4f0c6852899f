//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- The authenticated-user record kept in the session store.

pub mod password;
pub mod session;
