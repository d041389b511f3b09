pub mod auth;
pub mod blocked;
