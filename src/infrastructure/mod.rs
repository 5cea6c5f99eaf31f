// Infrastructure layer module
// Contains the hosted provider adapters and an in-memory stand-in
// Follows Hexagonal Architecture

pub mod mock;
pub mod supabase;
