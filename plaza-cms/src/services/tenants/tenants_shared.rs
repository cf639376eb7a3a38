use std::sync::Arc;

use plaza_core::{PlazaApp, SchemaHooksExt, ServiceCapabilities, ServiceMethodKind};
use serde_json::Value;

use crate::hooks::RequireAuthenticated;
use crate::params::CmsParams;

use super::tenants_hooks::{
    resolve_tenant_defaults, validate_tenant_fields, EnsureUniqueSlug, RequireSuperAdminCreate,
    RequireTenantModifyAccess,
};

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
    app.service("tenants")?.hooks(|h| {
        // access first, then schema, then the uniqueness check
        h.before_find(Arc::new(RequireAuthenticated { entity: "Tenants" }));
        h.before_get(Arc::new(RequireAuthenticated { entity: "Tenants" }));
        h.before_create(Arc::new(RequireSuperAdminCreate));
        h.before_update(Arc::new(RequireTenantModifyAccess));
        h.before_patch(Arc::new(RequireTenantModifyAccess));
        h.before_remove(Arc::new(RequireTenantModifyAccess));

        h.schema(|s| {
            s.on_create().resolve(resolve_tenant_defaults);
            s.on_writes().validate(validate_tenant_fields);
        });

        h.before_create(Arc::new(EnsureUniqueSlug));
        h.before_update(Arc::new(EnsureUniqueSlug));
        h.before_patch(Arc::new(EnsureUniqueSlug));
    });
    Ok(())
}
