use std::sync::Arc;

use plaza_core::{PlazaApp, SchemaHooksExt, ServiceCapabilities, ServiceMethodKind};
use serde_json::Value;

use crate::params::CmsParams;
use crate::services::scoped::{RequireTenantAdminWrite, RequireTenantReadAccess, ResolveTenantRef};

use super::pages_hooks::{validate_page_fields, ValidatePageLayout};

pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethodKind::Create,
        ServiceMethodKind::Find,
        ServiceMethodKind::Get,
        ServiceMethodKind::Update,
        ServiceMethodKind::Patch,
        ServiceMethodKind::Remove,
    ])
}

pub fn register_hooks(app: &PlazaApp<Value, CmsParams>) -> anyhow::Result<()> {
    app.service("pages")?.hooks(|h| {
        h.before_find(Arc::new(RequireTenantReadAccess { entity: "Pages" }));
        h.before_get(Arc::new(RequireTenantReadAccess { entity: "Pages" }));

        let write_access = Arc::new(RequireTenantAdminWrite { entity: "pages" });
        h.before_create(write_access.clone());
        h.before_update(write_access.clone());
        h.before_patch(write_access.clone());
        h.before_remove(write_access);

        let tenant_ref = Arc::new(ResolveTenantRef);
        h.before_create(tenant_ref.clone());
        h.before_update(tenant_ref.clone());
        h.before_patch(tenant_ref);

        h.schema(|s| {
            s.on_writes().validate(validate_page_fields);
        });

        let layout = Arc::new(ValidatePageLayout);
        h.before_create(layout.clone());
        h.before_update(layout.clone());
        h.before_patch(layout);
    });
    Ok(())
}
