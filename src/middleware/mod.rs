pub mod auth;
pub mod role_auth;
pub mod session;
