use std::sync::Arc;

use plaza_core::{PlazaApp, SchemaHooksExt, ServiceCapabilities, ServiceMethodKind};
use serde_json::Value;

use crate::params::CmsParams;
use crate::services::scoped::{
    EnsureTenantExists, RequireTenantAdminWrite, RequireTenantReadAccess, ResolveTenantRef,
};

use super::media_hooks::validate_media_fields;

pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethodKind::Create,
        ServiceMethodKind::Find,
        ServiceMethodKind::Get,
        ServiceMethodKind::Patch,
        ServiceMethodKind::Remove,
    ])
}

pub fn register_hooks(app: &PlazaApp<Value, CmsParams>) -> anyhow::Result<()> {
    app.service("media")?.hooks(|h| {
        h.before_find(Arc::new(RequireTenantReadAccess { entity: "Media" }));
        h.before_get(Arc::new(RequireTenantReadAccess { entity: "Media" }));

        let write_access = Arc::new(RequireTenantAdminWrite { entity: "media" });
        h.before_create(write_access.clone());
        h.before_patch(write_access.clone());
        h.before_remove(write_access);

        let tenant_ref = Arc::new(ResolveTenantRef);
        h.before_create(tenant_ref.clone());
        h.before_patch(tenant_ref);

        h.before_create(Arc::new(EnsureTenantExists { entity: "Media" }));

        h.schema(|s| {
            s.on_writes().validate(validate_media_fields);
        });
    });
    Ok(())
}
