use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

use plaza_core::TenantContext;

/// Scope key under which registry-wide collections (tenants, users)
/// are stored.
pub const REGISTRY_SCOPE: &str = "registry";

/// Context for operations on registry-wide collections.
pub fn registry_ctx() -> TenantContext {
    TenantContext::new(REGISTRY_SCOPE)
}

/// In-memory store backing every collection:
/// store -> scope key -> record id -> document.
///
/// Tenants and users live under [`REGISTRY_SCOPE`]; pages and media
/// are partitioned by the tenant context of the call.
#[derive(Default)]
pub struct CmsState {
    pub tenants: RwLock<HashMap<String, HashMap<String, Value>>>,
    pub users: RwLock<HashMap<String, HashMap<String, Value>>>,
    pub pages: RwLock<HashMap<String, HashMap<String, Value>>>,
    pub media: RwLock<HashMap<String, HashMap<String, Value>>>,
}
