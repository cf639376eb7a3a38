//! Hooks shared by the tenant-partitioned collections (pages, media).
//!
//! These collections key their records by the tenant context of the
//! call, so access checks reduce to: what may the caller do within
//! `ctx.tenant`?

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use plaza_core::{HookContext, PlazaBeforeHook, PlazaError};

use crate::access::{is_super_admin, user_tenant_ids, user_tenant_ids_with_role, TenantRole};
use crate::params::CmsParams;
use crate::services::types::registry_ctx;

/// Load a tenant record through the raw tenants service (no hook
/// pipeline, trusted params).
pub(crate) async fn load_tenant(
    ctx: &HookContext<Value, CmsParams>,
    tenant_id: &str,
) -> Result<Value> {
    let tenants = ctx.services.service::<Value, CmsParams>("tenants")?;
    tenants
        .get(&registry_ctx(), tenant_id, CmsParams::internal())
        .await
}

/// Reads within a tenant scope: members and super-admins always;
/// everyone else only when the tenant allows public reads.
pub struct RequireTenantReadAccess {
    pub entity: &'static str,
}

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireTenantReadAccess {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() {
            return Ok(());
        }

        let user = ctx.params.user.as_ref();
        if is_super_admin(user) {
            return Ok(());
        }

        let tenant_id = ctx.tenant.tenant_id.as_str().to_string();
        if user_tenant_ids(user).iter().any(|id| *id == tenant_id) {
            return Ok(());
        }

        let public = match load_tenant(ctx, &tenant_id).await {
            Ok(tenant) => tenant
                .get("allowPublicRead")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(_) => false,
        };
        if public {
            return Ok(());
        }

        match user {
            Some(_) => Err(PlazaError::forbidden(format!(
                "{} of this tenant are not readable by this user",
                self.entity
            ))
            .into_anyhow()),
            None => Err(PlazaError::not_authenticated(format!(
                "{} of this tenant require an authenticated read",
                self.entity
            ))
            .into_anyhow()),
        }
    }
}

/// Writes within a tenant scope: super-admins, or tenant-admins of
/// that tenant. Internal calls (the seed) pass through.
pub struct RequireTenantAdminWrite {
    pub entity: &'static str,
}

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireTenantAdminWrite {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() {
            return Ok(());
        }

        let user = ctx.params.user.as_ref();
        if is_super_admin(user) {
            return Ok(());
        }

        let tenant_id = ctx.tenant.tenant_id.as_str();
        if user_tenant_ids_with_role(user, TenantRole::TenantAdmin)
            .iter()
            .any(|id| id == tenant_id)
        {
            return Ok(());
        }

        match user {
            Some(_) => Err(PlazaError::forbidden(format!(
                "Only tenant admins may write {} of this tenant",
                self.entity
            ))
            .into_anyhow()),
            None => Err(PlazaError::not_authenticated(format!(
                "Writing {} requires authentication",
                self.entity
            ))
            .into_anyhow()),
        }
    }
}

/// Keep the document's `tenant` field in line with the call's tenant
/// scope: fill it in when absent, reject a mismatch.
pub struct ResolveTenantRef;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for ResolveTenantRef {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let tenant_id = ctx.tenant.tenant_id.as_str().to_string();

        let Some(obj) = ctx.data.as_mut().and_then(|d| d.as_object_mut()) else {
            return Ok(());
        };

        match obj.get("tenant").and_then(|v| v.as_str()) {
            None => {
                obj.insert("tenant".to_string(), Value::String(tenant_id));
                Ok(())
            }
            Some(t) if t == tenant_id => Ok(()),
            Some(t) => Err(PlazaError::bad_request(format!(
                "Document tenant '{t}' does not match the call scope '{tenant_id}'"
            ))
            .into_anyhow()),
        }
    }
}

/// Creates must target an existing tenant.
pub struct EnsureTenantExists {
    pub entity: &'static str,
}

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for EnsureTenantExists {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let tenant_id = ctx.tenant.tenant_id.as_str().to_string();
        if load_tenant(ctx, &tenant_id).await.is_err() {
            return Err(PlazaError::unprocessable(format!(
                "{} tenant does not exist: {tenant_id}",
                self.entity
            ))
            .into_anyhow());
        }
        Ok(())
    }
}
