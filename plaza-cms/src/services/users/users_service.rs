use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use plaza_core::tenant::TenantContext;
use plaza_core::{PlazaService, ServiceCapabilities};

use crate::params::CmsParams;
use crate::services::adapters::cms_adapter::{CmsAdapter, StoreKind, StoreScope};
use crate::services::types::CmsState;

use super::users_shared;

pub struct UsersService {
    pub adapter: CmsAdapter,
}

#[async_trait]
impl PlazaService<Value, CmsParams> for UsersService {
    fn capabilities(&self) -> ServiceCapabilities {
        users_shared::crud_capabilities()
    }

    async fn create(&self, ctx: &TenantContext, data: Value, params: CmsParams) -> Result<Value> {
        self.adapter._create(ctx, data, params).await
    }

    /// Supports an `email` query filter (account lookups).
    async fn find(&self, ctx: &TenantContext, params: CmsParams) -> Result<Vec<Value>> {
        let all = self.adapter._find(ctx, params.clone()).await?;
        Ok(match params.query.get("email") {
            Some(email) => all
                .into_iter()
                .filter(|u| u.get("email").and_then(|v| v.as_str()) == Some(email.as_str()))
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

impl UsersService {
    pub fn new(state: Arc<CmsState>) -> Self {
        Self {
            adapter: CmsAdapter {
                state,
                store: StoreKind::Users,
                scope: StoreScope::Registry,
                id_prefix: "user",
                not_found_prefix: "User not found",
                capabilities: users_shared::crud_capabilities(),
            },
        }
    }
}
