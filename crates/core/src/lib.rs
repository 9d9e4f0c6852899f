//! Shared types, domain errors, and pure rules for the personagens backend.
//!
//! Nothing in here touches the network, the database, or the filesystem, so
//! every rule can be unit tested in isolation.

pub mod character;
pub mod error;
pub mod types;
pub mod upload;
