use crate::domain::errors::ProviderError;

/// Where the display name ended up after signup
///
/// Produced by the best-effort write that follows a successful signup.
/// Logged, never turned into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePersistence {
    /// Provider returned no user, nothing to persist
    Skipped,
    /// Profile row inserted
    ProfileRow,
    /// Row insert failed, name stored in the auth user's metadata instead
    UserMetadata { profile_error: ProviderError },
    /// Both writes failed
    Lost {
        profile_error: ProviderError,
        metadata_error: ProviderError,
    },
}

impl ProfilePersistence {
    /// True when the display name was stored somewhere
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::ProfileRow | Self::UserMetadata { .. })
    }
}
