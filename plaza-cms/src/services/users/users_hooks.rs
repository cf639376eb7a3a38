use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use validator::ValidateEmail;

use plaza_core::{
    HookContext, HookMeta, HookResult, PlazaAfterHook, PlazaBeforeHook, PlazaError,
    ServiceMethodKind,
};

use crate::access::{is_super_admin, User};
use crate::params::CmsParams;
use crate::services::types::registry_ctx;

/// Creating and removing accounts stays with super-admins.
pub struct RequireSuperAdminWrite;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireSuperAdminWrite {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() || is_super_admin(ctx.params.user.as_ref()) {
            return Ok(());
        }

        match ctx.params.user.as_ref() {
            Some(_) => {
                Err(PlazaError::forbidden("Only super-admins may manage accounts").into_anyhow())
            }
            None => Err(
                PlazaError::not_authenticated("Managing accounts requires authentication")
                    .into_anyhow(),
            ),
        }
    }
}

/// Users update themselves; super-admins update anyone.
pub struct RequireSelfOrSuperAdmin;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireSelfOrSuperAdmin {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() || is_super_admin(ctx.params.user.as_ref()) {
            return Ok(());
        }

        let Some(caller) = ctx.params.user.as_ref() else {
            return Err(
                PlazaError::not_authenticated("Updating accounts requires authentication")
                    .into_anyhow(),
            );
        };

        let is_self = match (&caller.id, ctx.id.as_deref()) {
            (Some(own), Some(target)) => own == target,
            _ => false,
        };

        if is_self {
            return Ok(());
        }

        Err(PlazaError::forbidden("This user may only update their own account").into_anyhow())
    }
}

/// Memberships must point at existing tenants.
pub struct ValidateMembershipTenants;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for ValidateMembershipTenants {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let tenant_ids: Vec<String> = match ctx.data.as_ref().and_then(|d| d.get("tenants")) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|m| m.get("tenant"))
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            _ => return Ok(()),
        };

        let tenants = ctx.services.service::<Value, CmsParams>("tenants")?;
        for tenant_id in tenant_ids {
            if tenants
                .get(&registry_ctx(), &tenant_id, CmsParams::internal())
                .await
                .is_err()
            {
                return Err(PlazaError::unprocessable("Users schema validation failed")
                    .with_errors(json!({"tenants": [format!("tenant not found: {tenant_id}")]}))
                    .into_anyhow());
            }
        }

        Ok(())
    }
}

/// Replace a plaintext `password` with its bcrypt hash before the
/// document reaches the store.
pub struct HashPassword;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for HashPassword {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let Some(obj) = ctx.data.as_mut().and_then(|d| d.as_object_mut()) else {
            return Ok(());
        };

        let Some(plain) = obj.get("password").and_then(|v| v.as_str()) else {
            return Ok(());
        };

        if plain.trim().is_empty() {
            return Ok(());
        }

        let hashed = bcrypt::hash(plain, bcrypt::DEFAULT_COST)
            .map_err(|e| PlazaError::general_error(format!("Password hashing failed: {e}")).into_anyhow())?;
        obj.insert("password".to_string(), Value::String(hashed));

        Ok(())
    }
}

/// Strip `password` (anywhere in the tree) from every result.
pub struct StripPassword;

fn remove_deep(v: &mut Value, field: &str) {
    match v {
        Value::Object(map) => {
            map.remove(field);
            for (_, child) in map.iter_mut() {
                remove_deep(child, field);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                remove_deep(child, field);
            }
        }
        _ => {}
    }
}

#[async_trait]
impl PlazaAfterHook<Value, CmsParams> for StripPassword {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let Some(res) = ctx.result.as_mut() else {
            return Ok(());
        };

        match res {
            HookResult::One(v) => remove_deep(v, "password"),
            HookResult::Many(vs) => {
                for v in vs.iter_mut() {
                    remove_deep(v, "password");
                }
            }
        }

        Ok(())
    }
}

/// Non-super-admins see themselves plus accounts sharing a tenant.
pub struct LimitUserVisibility;

fn caller_can_see(caller: &User, record: &Value) -> bool {
    if let (Some(own), Some(id)) = (&caller.id, record.get("id").and_then(|v| v.as_str())) {
        if own == id {
            return true;
        }
    }

    let Some(view) = User::from_value(record) else {
        return false;
    };

    view.tenants
        .iter()
        .any(|m| caller.tenants.iter().any(|c| c.tenant == m.tenant))
}

#[async_trait]
impl PlazaAfterHook<Value, CmsParams> for LimitUserVisibility {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() || is_super_admin(ctx.params.user.as_ref()) {
            return Ok(());
        }

        // the read-access hook already rejected anonymous callers
        let Some(caller) = ctx.params.user.as_ref() else {
            ctx.result = None;
            return Err(
                PlazaError::not_authenticated("Reading accounts requires authentication")
                    .into_anyhow(),
            );
        };

        match ctx.result.take() {
            Some(HookResult::Many(vs)) => {
                let visible = vs
                    .into_iter()
                    .filter(|v| caller_can_see(caller, v))
                    .collect();
                ctx.result = Some(HookResult::Many(visible));
                Ok(())
            }
            Some(HookResult::One(v)) => {
                if caller_can_see(caller, &v) {
                    ctx.result = Some(HookResult::One(v));
                    Ok(())
                } else {
                    Err(
                        PlazaError::forbidden("This account is not visible to this user")
                            .into_anyhow(),
                    )
                }
            }
            None => Ok(()),
        }
    }
}

const GLOBAL_ROLES: &[&str] = &["super-admin", "user"];
const TENANT_ROLES: &[&str] = &["tenant-admin", "tenant-viewer"];

pub(super) fn validate_user_fields(
    data: &Value,
    meta: &HookMeta<Value, CmsParams>,
) -> Result<()> {
    let obj = data
        .as_object()
        .ok_or_else(|| PlazaError::unprocessable("User must be an object").into_anyhow())?;

    let full_write = matches!(
        meta.method,
        ServiceMethodKind::Create | ServiceMethodKind::Update
    );

    match obj.get("email").and_then(|v| v.as_str()) {
        Some(email) => {
            if !email.validate_email() {
                return Err(PlazaError::unprocessable("Users schema validation failed")
                    .with_errors(json!({"email": ["must be a valid email"]}))
                    .into_anyhow());
            }
        }
        None if full_write => {
            return Err(PlazaError::unprocessable("Users schema validation failed")
                .with_errors(json!({"email": ["is required"]}))
                .into_anyhow());
        }
        None => {}
    }

    if let Some(roles) = obj.get("roles") {
        let roles = roles.as_array().ok_or_else(|| {
            PlazaError::unprocessable("'roles' must be an array").into_anyhow()
        })?;
        for role in roles {
            let role = role.as_str().unwrap_or("");
            if !GLOBAL_ROLES.contains(&role) {
                return Err(PlazaError::unprocessable("Users schema validation failed")
                    .with_errors(json!({"roles": [format!("unknown role: {role}")]}))
                    .into_anyhow());
            }
        }
    }

    if let Some(memberships) = obj.get("tenants") {
        let memberships = memberships.as_array().ok_or_else(|| {
            PlazaError::unprocessable("'tenants' must be an array").into_anyhow()
        })?;

        for membership in memberships {
            if membership.get("tenant").and_then(|v| v.as_str()).is_none() {
                return Err(PlazaError::unprocessable("Users schema validation failed")
                    .with_errors(json!({"tenants": ["each entry requires a tenant id"]}))
                    .into_anyhow());
            }

            if let Some(roles) = membership.get("roles").and_then(|v| v.as_array()) {
                for role in roles {
                    let role = role.as_str().unwrap_or("");
                    if !TENANT_ROLES.contains(&role) {
                        return Err(PlazaError::unprocessable("Users schema validation failed")
                            .with_errors(
                                json!({"tenants": [format!("unknown tenant role: {role}")]}),
                            )
                            .into_anyhow());
                    }
                }
            }
        }
    }

    Ok(())
}
