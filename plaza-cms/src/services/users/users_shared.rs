use std::sync::Arc;

use plaza_core::{PlazaApp, SchemaHooksExt, ServiceCapabilities, ServiceMethodKind};
use serde_json::Value;

use crate::hooks::RequireAuthenticated;
use crate::params::CmsParams;

use super::users_hooks::{
    validate_user_fields, HashPassword, LimitUserVisibility, RequireSelfOrSuperAdmin,
    RequireSuperAdminWrite, StripPassword, ValidateMembershipTenants,
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
    app.service("users")?.hooks(|h| {
        h.before_find(Arc::new(RequireAuthenticated { entity: "Accounts" }));
        h.before_get(Arc::new(RequireAuthenticated { entity: "Accounts" }));
        h.before_create(Arc::new(RequireSuperAdminWrite));
        h.before_remove(Arc::new(RequireSuperAdminWrite));
        h.before_update(Arc::new(RequireSelfOrSuperAdmin));
        h.before_patch(Arc::new(RequireSelfOrSuperAdmin));

        h.schema(|s| {
            s.on_writes().validate(validate_user_fields);
        });

        let membership_check = Arc::new(ValidateMembershipTenants);
        h.before_create(membership_check.clone());
        h.before_update(membership_check.clone());
        h.before_patch(membership_check);

        let hash = Arc::new(HashPassword);
        h.before_create(hash.clone());
        h.before_update(hash.clone());
        h.before_patch(hash);

        // after hooks run in reverse registration order, so the
        // visibility filter sees results before the password strip
        h.after_all(Arc::new(StripPassword));
        h.after_find(Arc::new(LimitUserVisibility));
        h.after_get(Arc::new(LimitUserVisibility));
    });
    Ok(())
}
