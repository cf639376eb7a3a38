use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use plaza_core::tenant::TenantContext;
use plaza_core::{PlazaService, ServiceCapabilities};

use crate::params::CmsParams;
use crate::services::adapters::cms_adapter::{CmsAdapter, StoreKind, StoreScope};
use crate::services::types::CmsState;

use super::tenants_shared;

pub struct TenantsService {
    pub adapter: CmsAdapter,
}

#[async_trait]
impl PlazaService<Value, CmsParams> for TenantsService {
    fn capabilities(&self) -> ServiceCapabilities {
        tenants_shared::crud_capabilities()
    }

    async fn create(&self, ctx: &TenantContext, data: Value, params: CmsParams) -> Result<Value> {
        self.adapter._create(ctx, data, params).await
    }

    /// Supports a `slug` query filter, the lookup used for
    /// slug-based routing (`/tenant-slug/page-slug`).
    async fn find(&self, ctx: &TenantContext, params: CmsParams) -> Result<Vec<Value>> {
        let all = self.adapter._find(ctx, params.clone()).await?;
        Ok(match params.query.get("slug") {
            Some(slug) => all
                .into_iter()
                .filter(|t| t.get("slug").and_then(|v| v.as_str()) == Some(slug.as_str()))
                .collect(),
            None => all,
        })
    }

    async fn get(&self, ctx: &TenantContext, id: &str, params: CmsParams) -> Result<Value> {
        self.adapter._get(ctx, id, params).await
    }

    async fn update(
        &self,
        ctx: &TenantContext,
        id: &str,
        data: Value,
        params: CmsParams,
    ) -> Result<Value> {
        self.adapter._update(ctx, id, data, params).await
    }

    async fn patch(
        &self,
        ctx: &TenantContext,
        id: Option<&str>,
        data: Value,
        params: CmsParams,
    ) -> Result<Value> {
        self.adapter._patch(ctx, id, data, params).await
    }

    async fn remove(
        &self,
        ctx: &TenantContext,
        id: Option<&str>,
        params: CmsParams,
    ) -> Result<Value> {
        self.adapter._remove(ctx, id, params).await
    }
}

impl TenantsService {
    pub fn new(state: Arc<CmsState>) -> Self {
        Self {
            adapter: CmsAdapter {
                state,
                store: StoreKind::Tenants,
                scope: StoreScope::Registry,
                id_prefix: "tenant",
                not_found_prefix: "Tenant not found",
                capabilities: tenants_shared::crud_capabilities(),
            },
        }
    }
}
