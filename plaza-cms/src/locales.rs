//! Locale registry and the per-tenant locale availability rule.

use serde_json::Value;

use plaza_core::ServiceCaller;

use crate::access::{is_super_admin, user_tenant_ids, User};
use crate::params::CmsParams;
use crate::services::types::registry_ctx;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleDef {
    pub code: &'static str,
    pub label: &'static str,
    pub rtl: bool,
}

const fn locale(code: &'static str, label: &'static str) -> LocaleDef {
    LocaleDef {
        code,
        label,
        rtl: false,
    }
}

/// Every locale the backend knows about, in display order.
pub fn default_locales() -> Vec<LocaleDef> {
    vec![
        locale("en", "English"),
        locale("es", "Spanish"),
        locale("fr", "French"),
        locale("de", "German"),
        LocaleDef {
            code: "ar",
            label: "Arabic",
            rtl: true,
        },
        locale("vi", "Vietnamese"),
    ]
}

pub fn is_known(code: &str) -> bool {
    default_locales().iter().any(|l| l.code == code)
}

/// Keep the locales whose code appears in `supported`, preserving the
/// order of `all`.
pub fn filter_locales(supported: &[String], all: &[LocaleDef]) -> Vec<LocaleDef> {
    all.iter()
        .filter(|l| supported.iter().any(|s| s == l.code))
        .copied()
        .collect()
}

/// Narrow a locale list to what the caller's tenant supports.
///
/// - super-admins see the full list, order preserved
/// - otherwise the FIRST tenant membership decides: its tenant's
///   `supportedLocales` filters the list
/// - no memberships, no configured set, or a tenant that cannot be
///   loaded all fall back to the full list
pub async fn available_locales(
    services: &ServiceCaller<Value, CmsParams>,
    user: Option<&User>,
    all: &[LocaleDef],
) -> Vec<LocaleDef> {
    if is_super_admin(user) {
        return all.to_vec();
    }

    let tenant_ids = user_tenant_ids(user);
    let Some(first) = tenant_ids.first() else {
        return all.to_vec();
    };

    let Ok(tenants) = services.service::<Value, CmsParams>("tenants") else {
        return all.to_vec();
    };

    let Ok(tenant) = tenants
        .get(&registry_ctx(), first, CmsParams::internal())
        .await
    else {
        return all.to_vec();
    };

    supported_locales_of(&tenant)
        .map(|supported| filter_locales(&supported, all))
        .unwrap_or_else(|| all.to_vec())
}

/// A tenant's configured locale set, if it has a non-empty one.
pub fn supported_locales_of(tenant: &Value) -> Option<Vec<String>> {
    let codes: Vec<String> = tenant
        .get("supportedLocales")?
        .as_array()?
        .iter()
        .filter_map(|c| c.as_str().map(str::to_string))
        .collect();

    if codes.is_empty() {
        None
    } else {
        Some(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_preserves_input_order() {
        let all = default_locales();
        let supported = vec!["es".to_string(), "en".to_string()];

        let filtered = filter_locales(&supported, &all);
        let codes: Vec<&str> = filtered.iter().map(|l| l.code).collect();

        // order of `all`, not of `supported`
        assert_eq!(codes, vec!["en", "es"]);
    }

    #[test]
    fn filter_drops_unknown_codes() {
        let all = default_locales();
        let supported = vec!["xx".to_string(), "vi".to_string()];

        let filtered = filter_locales(&supported, &all);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].code, "vi");
    }

    #[test]
    fn registry_shape() {
        let all = default_locales();
        assert_eq!(all.len(), 6);
        assert!(all.iter().any(|l| l.code == "ar" && l.rtl));
        assert!(all.iter().filter(|l| l.rtl).count() == 1);
        assert!(is_known(DEFAULT_LOCALE));
        assert!(!is_known("xx"));
    }

    #[test]
    fn supported_locales_of_requires_non_empty_list() {
        use serde_json::json;

        assert_eq!(
            supported_locales_of(&json!({"supportedLocales": ["en", "es"]})),
            Some(vec!["en".to_string(), "es".to_string()])
        );
        assert_eq!(supported_locales_of(&json!({"supportedLocales": []})), None);
        assert_eq!(supported_locales_of(&json!({"name": "Tenant 1"})), None);
    }
}
