// Provider adapter: gateway operations over the hosted auth service

pub mod classify;
pub mod errors;
pub mod persistence;
pub mod service;

pub use errors::{AuthError, AuthResult};
pub use persistence::ProfilePersistence;
pub use service::AuthService;
