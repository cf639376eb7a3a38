use std::sync::Arc;

use crate::services::adapters::cms_adapter::{CmsAdapter, StoreKind, StoreScope};
use crate::services::types::CmsState;

use super::media_shared;

/// Media needs no behavior beyond the tenant-scoped store, so the
/// adapter itself is the service (via `plaza_adapter!`).
pub fn media_service(state: Arc<CmsState>) -> CmsAdapter {
    CmsAdapter {
        state,
        store: StoreKind::Media,
        scope: StoreScope::PerTenant,
        id_prefix: "media",
        not_found_prefix: "Media not found",
        capabilities: media_shared::crud_capabilities(),
    }
}
