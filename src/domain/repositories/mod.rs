// Repository ports implemented by infrastructure adapters

pub mod profile_repository;

pub use profile_repository::{ProfileRepository, ProfileRow, UserProfile};
