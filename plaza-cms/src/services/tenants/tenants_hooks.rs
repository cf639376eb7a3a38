use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use plaza_core::{HookContext, HookMeta, PlazaBeforeHook, PlazaError, Rules, ServiceMethodKind};

use crate::access::{can_modify_tenant, is_super_admin};
use crate::locales::{self, DEFAULT_LOCALE};
use crate::params::CmsParams;
use crate::services::types::registry_ctx;

/// Only super-admins create tenants.
pub struct RequireSuperAdminCreate;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireSuperAdminCreate {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() {
            return Ok(());
        }

        if is_super_admin(ctx.params.user.as_ref()) {
            return Ok(());
        }

        match ctx.params.user.as_ref() {
            Some(_) => {
                Err(PlazaError::forbidden("Only super-admins may create tenants").into_anyhow())
            }
            None => Err(
                PlazaError::not_authenticated("Creating tenants requires authentication")
                    .into_anyhow(),
            ),
        }
    }
}

/// Update/patch/remove need the tenant-modify predicate against the
/// target tenant id.
pub struct RequireTenantModifyAccess;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireTenantModifyAccess {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() {
            return Ok(());
        }

        let user = ctx.params.user.as_ref();

        // Multi-record writes (no id) stay super-admin only.
        let Some(id) = ctx.id.as_deref() else {
            if is_super_admin(user) {
                return Ok(());
            }
            return Err(
                PlazaError::forbidden("Only super-admins may modify tenants in bulk").into_anyhow(),
            );
        };

        if can_modify_tenant(user, id) {
            return Ok(());
        }

        match user {
            Some(_) => Err(PlazaError::forbidden(format!(
                "This user may not modify tenant {id}"
            ))
            .into_anyhow()),
            None => Err(
                PlazaError::not_authenticated("Modifying tenants requires authentication")
                    .into_anyhow(),
            ),
        }
    }
}

/// Slugs route URLs, so they stay unique across the registry.
pub struct EnsureUniqueSlug;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for EnsureUniqueSlug {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let Some(slug) = ctx
            .data
            .as_ref()
            .and_then(|d| d.get("slug"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
        else {
            return Ok(());
        };

        let tenants = ctx.services.service::<Value, CmsParams>("tenants")?;
        let existing = tenants.find(&registry_ctx(), CmsParams::internal()).await?;

        let taken = existing.iter().any(|t| {
            t.get("slug").and_then(|v| v.as_str()) == Some(slug.as_str())
                && t.get("id").and_then(|v| v.as_str()) != ctx.id.as_deref()
        });

        if taken {
            return Err(PlazaError::conflict(format!(
                "Tenant slug already in use: {slug}"
            ))
            .into_anyhow());
        }

        Ok(())
    }
}

/// Field defaults on create: allowPublicRead=false, and the app's
/// configured default locale for supportedLocales/defaultLocale.
pub(super) fn resolve_tenant_defaults(
    data: &mut Value,
    meta: &HookMeta<Value, CmsParams>,
) -> Result<()> {
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    let default_locale = meta
        .config
        .get_string("locales.default")
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

    if !obj.contains_key("allowPublicRead") {
        obj.insert("allowPublicRead".to_string(), Value::Bool(false));
    }
    if !obj.contains_key("supportedLocales") {
        obj.insert(
            "supportedLocales".to_string(),
            json!([default_locale.clone()]),
        );
    }
    if !obj.contains_key("defaultLocale") {
        // follow the tenant's own locale set when it names one
        let first_supported = obj
            .get("supportedLocales")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|v| v.as_str())
            .map(str::to_string);

        obj.insert(
            "defaultLocale".to_string(),
            Value::String(first_supported.unwrap_or(default_locale)),
        );
    }

    Ok(())
}

pub(super) fn validate_tenant_fields(
    data: &Value,
    meta: &HookMeta<Value, CmsParams>,
) -> Result<()> {
    let obj = data
        .as_object()
        .ok_or_else(|| PlazaError::unprocessable("Tenant must be an object").into_anyhow())?;

    let full_write = matches!(
        meta.method,
        ServiceMethodKind::Create | ServiceMethodKind::Update
    );

    if full_write {
        let name = obj.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let slug = obj.get("slug").and_then(|v| v.as_str()).unwrap_or("");
        Rules::new()
            .non_empty("name", name)
            .non_empty("slug", slug)
            .check()?;
    } else {
        for field in ["name", "slug"] {
            if let Some(v) = obj.get(field) {
                let s = v.as_str().unwrap_or("");
                Rules::new().non_empty(field, s).check()?;
            }
        }
    }

    let supported = match obj.get("supportedLocales") {
        Some(v) => {
            let codes = v.as_array().ok_or_else(|| {
                PlazaError::unprocessable("'supportedLocales' must be an array").into_anyhow()
            })?;

            let mut out = Vec::with_capacity(codes.len());
            for code in codes {
                let code = code.as_str().unwrap_or("");
                if !locales::is_known(code) {
                    return Err(PlazaError::unprocessable("Tenant locales are invalid")
                        .with_errors(json!({
                            "supportedLocales": [format!("unknown locale code: {code}")]
                        }))
                        .into_anyhow());
                }
                out.push(code.to_string());
            }
            Some(out)
        }
        None => None,
    };

    if let Some(default_locale) = obj.get("defaultLocale").and_then(|v| v.as_str()) {
        if !locales::is_known(default_locale) {
            return Err(PlazaError::unprocessable("Tenant locales are invalid")
                .with_errors(json!({
                    "defaultLocale": [format!("unknown locale code: {default_locale}")]
                }))
                .into_anyhow());
        }

        // an empty set means "unconfigured" and does not constrain
        if let Some(supported) = supported.as_ref().filter(|s| !s.is_empty()) {
            if !supported.iter().any(|c| c == default_locale) {
                return Err(PlazaError::unprocessable("Tenant locales are invalid")
                    .with_errors(json!({
                        "defaultLocale": ["must be one of supportedLocales"]
                    }))
                    .into_anyhow());
            }
        }
    }

    Ok(())
}
