//! App-wide hooks and the audit event listener.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use plaza_core::{
    EventListener, HookContext, HookResult, Next, PlazaApp, PlazaAroundHook, PlazaBeforeHook,
    PlazaError, PlazaErrorHook, SchemaHooksExt, ServiceEventPattern, ServiceMethodKind,
};

use crate::params::CmsParams;

/// Log every service call with its provider, method and tenant scope.
pub struct LogAround;

#[async_trait]
impl PlazaAroundHook<Value, CmsParams> for LogAround {
    async fn run(
        &self,
        ctx: &mut HookContext<Value, CmsParams>,
        next: Next<Value, CmsParams>,
    ) -> Result<()> {
        tracing::debug!(
            provider = %ctx.params.provider,
            method = ?ctx.method,
            tenant = %ctx.tenant.tenant_id.as_str(),
            "service call"
        );

        next.run(ctx).await
    }
}

/// Log pipeline failures without swallowing them.
pub struct LogFailures;

#[async_trait]
impl PlazaErrorHook<Value, CmsParams> for LogFailures {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if let Some(err) = &ctx.error {
            tracing::warn!(
                method = ?ctx.method,
                tenant = %ctx.tenant.tenant_id.as_str(),
                error = %err,
                "service call failed"
            );
        }
        Ok(())
    }
}

/// Require an authenticated caller (or an internal call) before reads
/// of registry-wide collections.
pub struct RequireAuthenticated {
    pub entity: &'static str,
}

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for RequireAuthenticated {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        if ctx.params.is_internal() || ctx.params.user.is_some() {
            return Ok(());
        }

        Err(
            PlazaError::not_authenticated(format!("{} require an authenticated read", self.entity))
                .into_anyhow(),
        )
    }
}

/// Stamp createdAt/updatedAt on written documents.
fn stamp_timestamps(
    data: &mut Value,
    meta: &plaza_core::HookMeta<Value, CmsParams>,
) -> Result<()> {
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    let now = Utc::now().to_rfc3339();
    if meta.method == ServiceMethodKind::Create && !obj.contains_key("createdAt") {
        obj.insert("createdAt".to_string(), Value::String(now.clone()));
    }
    obj.insert("updatedAt".to_string(), Value::String(now));
    Ok(())
}

pub fn global_hooks(app: &PlazaApp<Value, CmsParams>) {
    app.hooks(|h| {
        h.around_all(Arc::new(LogAround));
        h.error_all(Arc::new(LogFailures));
        h.schema(|s| {
            s.on_writes().resolve(stamp_timestamps);
        });
    });
}

/// Log every successful mutation: service, event, record id, scope.
pub fn register_audit_log(app: &PlazaApp<Value, CmsParams>) {
    let listener: EventListener<Value, CmsParams> = Arc::new(|path, event, result, ctx| {
        // capture owned values so the logged future is detached from
        // the call context
        let service = path.to_string();
        let event = format!("{event:?}");
        let id = match result {
            HookResult::One(v) => v.get("id").and_then(|v| v.as_str()).unwrap_or("-"),
            HookResult::Many(_) => "-",
        }
        .to_string();
        let tenant = ctx.tenant.tenant_id.as_str().to_string();

        Box::pin(async move {
            tracing::info!(
                service = %service,
                event = %event,
                id = %id,
                tenant = %tenant,
                "mutation"
            );
            Ok(())
        })
    });

    app.on_pattern(ServiceEventPattern::any(), listener);
}
