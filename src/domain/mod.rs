// Domain layer module exports
// Following Hexagonal Architecture
// Domain is independent of the provider's wire format

pub mod errors;
pub mod identity;
pub mod repositories;
pub mod user;
