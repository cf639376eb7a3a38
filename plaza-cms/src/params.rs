use std::collections::HashMap;

use crate::access::User;

/// Server-side calls (the seed, lookups made from inside hooks).
/// Access-control hooks let these through, like the host framework's
/// own local API would.
pub const PROVIDER_INTERNAL: &str = "internal";

/// Calls arriving on behalf of an (optionally authenticated) caller.
pub const PROVIDER_EXTERNAL: &str = "external";

/// Params carried with every service call: who is calling, through
/// which provider, and any query options.
#[derive(Debug, Clone, Default)]
pub struct CmsParams {
    pub provider: String,
    pub user: Option<User>,
    pub query: HashMap<String, String>,
}

impl CmsParams {
    pub fn internal() -> Self {
        Self {
            provider: PROVIDER_INTERNAL.to_string(),
            user: None,
            query: HashMap::new(),
        }
    }

    pub fn external(user: Option<User>) -> Self {
        Self {
            provider: PROVIDER_EXTERNAL.to_string(),
            user,
            query: HashMap::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::external(None)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn is_internal(&self) -> bool {
        self.provider == PROVIDER_INTERNAL
    }
}
