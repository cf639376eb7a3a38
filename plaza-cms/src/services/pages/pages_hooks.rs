use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use plaza_core::{HookContext, HookMeta, PlazaBeforeHook, PlazaError, Rules, ServiceMethodKind};

use crate::blocks::{locale_keys, parse_layout, validate_layout};
use crate::locales::supported_locales_of;
use crate::params::CmsParams;
use crate::services::scoped::load_tenant;

/// The layout must deserialize into known block shapes, its links must
/// be complete, and its localized rich text may only use locales the
/// owning tenant supports.
pub struct ValidatePageLayout;

#[async_trait]
impl PlazaBeforeHook<Value, CmsParams> for ValidatePageLayout {
    async fn run(&self, ctx: &mut HookContext<Value, CmsParams>) -> Result<()> {
        let tenant_id = ctx.tenant.tenant_id.as_str().to_string();
        let tenant = load_tenant(ctx, &tenant_id).await.map_err(|_| {
            PlazaError::unprocessable(format!("Page tenant does not exist: {tenant_id}"))
                .into_anyhow()
        })?;

        let Some(layout) = ctx.data.as_ref().and_then(|d| d.get("layout")) else {
            return Ok(());
        };

        let blocks = parse_layout(layout)?;
        validate_layout(&blocks)?;

        if let Some(supported) = supported_locales_of(&tenant) {
            let offending: Vec<String> = locale_keys(&blocks)
                .into_iter()
                .filter(|code| !supported.iter().any(|s| s == code))
                .collect();

            if !offending.is_empty() {
                return Err(PlazaError::unprocessable(
                    "Page layout uses locales the tenant does not support",
                )
                .with_errors(json!({ "layout": offending }))
                .into_anyhow());
            }
        }

        Ok(())
    }
}

pub(super) fn validate_page_fields(
    data: &Value,
    meta: &HookMeta<Value, CmsParams>,
) -> Result<()> {
    let obj = data
        .as_object()
        .ok_or_else(|| PlazaError::unprocessable("Page must be an object").into_anyhow())?;

    let full_write = matches!(
        meta.method,
        ServiceMethodKind::Create | ServiceMethodKind::Update
    );

    if full_write {
        let slug = obj.get("slug").and_then(|v| v.as_str()).unwrap_or("");
        let title = obj.get("title").and_then(|v| v.as_str()).unwrap_or("");
        Rules::new()
            .non_empty("slug", slug)
            .non_empty("title", title)
            .check()?;
    } else {
        for field in ["slug", "title"] {
            if let Some(v) = obj.get(field) {
                let s = v.as_str().unwrap_or("");
                Rules::new().non_empty(field, s).check()?;
            }
        }
    }

    Ok(())
}
