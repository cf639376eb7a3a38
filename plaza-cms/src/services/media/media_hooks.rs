use anyhow::Result;
use serde_json::Value;

use plaza_core::{HookMeta, PlazaError, Rules, ServiceMethodKind};

use crate::params::CmsParams;

pub(super) fn validate_media_fields(
    data: &Value,
    meta: &HookMeta<Value, CmsParams>,
) -> Result<()> {
    let obj = data
        .as_object()
        .ok_or_else(|| PlazaError::unprocessable("Media must be an object").into_anyhow())?;

    let full_write = matches!(
        meta.method,
        ServiceMethodKind::Create | ServiceMethodKind::Update
    );

    if full_write {
        let filename = obj.get("filename").and_then(|v| v.as_str()).unwrap_or("");
        Rules::new().non_empty("filename", filename).check()?;
    } else if let Some(v) = obj.get("filename") {
        let s = v.as_str().unwrap_or("");
        Rules::new().non_empty("filename", s).check()?;
    }

    Ok(())
}
