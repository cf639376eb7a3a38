use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use plaza_core::errors::PlazaError;
use plaza_core::tenant::TenantContext;
use plaza_core::ServiceCapabilities;

use crate::params::CmsParams;
use crate::services::types::{CmsState, REGISTRY_SCOPE};

#[derive(Clone, Copy)]
pub enum StoreKind {
    Tenants,
    Users,
    Pages,
    Media,
}

/// How records of a store are keyed.
#[derive(Clone, Copy)]
pub enum StoreScope {
    /// One shared partition for the whole registry (tenants, users).
    Registry,
    /// Partitioned by the tenant context of the call (pages, media).
    PerTenant,
}

pub struct CmsAdapter {
    pub state: Arc<CmsState>,
    pub store: StoreKind,
    pub scope: StoreScope,
    pub id_prefix: &'static str,
    pub not_found_prefix: &'static str,
    pub capabilities: ServiceCapabilities,
}

impl CmsAdapter {
    fn map_for(&self) -> &RwLock<HashMap<String, HashMap<String, Value>>> {
        match self.store {
            StoreKind::Tenants => &self.state.tenants,
            StoreKind::Users => &self.state.users,
            StoreKind::Pages => &self.state.pages,
            StoreKind::Media => &self.state.media,
        }
    }

    fn scope_key(&self, ctx: &TenantContext) -> String {
        match self.scope {
            StoreScope::Registry => REGISTRY_SCOPE.to_string(),
            StoreScope::PerTenant => ctx.tenant_id.0.clone(),
        }
    }

    fn not_found(&self, id: &str) -> anyhow::Error {
        PlazaError::not_found(format!("{}: {id}", self.not_found_prefix)).into_anyhow()
    }

    fn require_id<'a>(&self, id: Option<&'a str>, msg: &'static str) -> Result<&'a str> {
        id.ok_or_else(|| PlazaError::bad_request(msg).into_anyhow())
    }

    pub async fn _create(
        &self,
        ctx: &TenantContext,
        data: Value,
        _params: CmsParams,
    ) -> Result<Value> {
        let mut obj = data.as_object().cloned().unwrap_or_default();

        let id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.id_prefix, Uuid::new_v4()));

        obj.insert("id".to_string(), Value::String(id.clone()));
        let value = Value::Object(obj);

        let scope = self.scope_key(ctx);
        let mut by_scope = self.map_for().write().await;
        by_scope.entry(scope).or_default().insert(id, value.clone());

        Ok(value)
    }

    pub async fn _find(&self, ctx: &TenantContext, _params: CmsParams) -> Result<Vec<Value>> {
        let scope = self.scope_key(ctx);
        let by_scope = self.map_for().read().await;
        let map = by_scope.get(&scope);
        Ok(map.into_iter().flat_map(|m| m.values()).cloned().collect())
    }

    pub async fn _get(&self, ctx: &TenantContext, id: &str, _params: CmsParams) -> Result<Value> {
        let scope = self.scope_key(ctx);
        let by_scope = self.map_for().read().await;
        let map = by_scope.get(&scope);
        map.and_then(|m| m.get(id))
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn _update(
        &self,
        ctx: &TenantContext,
        id: &str,
        data: Value,
        _params: CmsParams,
    ) -> Result<Value> {
        let scope = self.scope_key(ctx);
        let mut by_scope = self.map_for().write().await;
        let map = by_scope.entry(scope).or_default();
        if !map.contains_key(id) {
            return Err(self.not_found(id));
        }

        let mut obj = data.as_object().cloned().unwrap_or_default();
        obj.insert("id".to_string(), Value::String(id.to_string()));
        let value = Value::Object(obj);
        map.insert(id.to_string(), value.clone());
        Ok(value)
    }

    pub async fn _patch(
        &self,
        ctx: &TenantContext,
        id: Option<&str>,
        data: Value,
        _params: CmsParams,
    ) -> Result<Value> {
        let id = self.require_id(id, "Patch requires an id")?;

        let scope = self.scope_key(ctx);
        let mut by_scope = self.map_for().write().await;
        let map = by_scope.entry(scope).or_default();

        let existing = map.get(id).cloned().ok_or_else(|| self.not_found(id))?;

        let mut record = existing.as_object().cloned().unwrap_or_default();
        if let Some(patch) = data.as_object() {
            for (k, v) in patch {
                if k == "id" {
                    continue;
                }
                record.insert(k.clone(), v.clone());
            }
        }

        record.insert("id".to_string(), Value::String(id.to_string()));
        let value = Value::Object(record);
        map.insert(id.to_string(), value.clone());
        Ok(value)
    }

    pub async fn _remove(
        &self,
        ctx: &TenantContext,
        id: Option<&str>,
        _params: CmsParams,
    ) -> Result<Value> {
        let id = self.require_id(id, "Remove requires an id")?;

        let scope = self.scope_key(ctx);
        let mut by_scope = self.map_for().write().await;
        let map = by_scope.entry(scope).or_default();
        map.remove(id).ok_or_else(|| self.not_found(id))
    }
}

plaza_core::plaza_adapter!(CmsAdapter, serde_json::Value, crate::params::CmsParams);
