// Adapters for the hosted backend: auth REST API and table REST API

pub mod client;
mod error;
pub mod gotrue;
pub mod postgrest;

pub use client::{SupabaseClient, SupabaseSettings};
pub use gotrue::SupabaseIdentityProvider;
pub use postgrest::SupabaseProfileRepository;
