use std::sync::Arc;

use crate::auth::AuthService;

/// Provider facts safe to show on status endpoints
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// First 30 characters of the project URL followed by `...`
    pub supabase_url: String,
    pub supabase_key_set: bool,
}

impl ServiceInfo {
    pub fn new(supabase_url: &str, supabase_key_set: bool) -> Self {
        let preview: String = supabase_url.chars().take(30).collect();
        Self {
            supabase_url: format!("{}...", preview),
            supabase_key_set,
        }
    }

    pub fn key_status(&self) -> &'static str {
        if self.supabase_key_set {
            "Set"
        } else {
            "Not set"
        }
    }
}

/// Shared, immutable request context
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub info: Arc<ServiceInfo>,
    /// Mount the provider-bypassing development routes
    pub dev_endpoints_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_truncated() {
        let info = ServiceInfo::new("https://abcdefghijklmnop.supabase.co", true);
        assert_eq!(info.supabase_url, "https://abcdefghijklmnop.supab...");
        assert_eq!(info.key_status(), "Set");
    }

    #[test]
    fn short_url_still_gets_ellipsis() {
        let info = ServiceInfo::new("http://localhost", false);
        assert_eq!(info.supabase_url, "http://localhost...");
        assert_eq!(info.key_status(), "Not set");
    }
}
