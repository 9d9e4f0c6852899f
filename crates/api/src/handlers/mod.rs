pub mod auth;
pub mod character;
