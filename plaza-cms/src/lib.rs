//! plaza-cms: a multi-tenant content backend on plaza-core.
//!
//! Four collections (tenants, users, pages, media) over a
//! tenant-scoped in-memory store, with access control, per-tenant
//! locale availability, and a seed bootstrap.

mod app;

pub mod access;
pub mod blocks;
pub mod hooks;
pub mod locales;
pub mod params;
pub mod seed;
pub mod services;

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use plaza_core::PlazaApp;

pub use params::CmsParams;
pub use services::{registry_ctx, CmsState, REGISTRY_SCOPE};

pub struct Cms {
    pub app: PlazaApp<Value, CmsParams>,
    pub state: Arc<CmsState>,
}

pub fn build() -> Result<Cms> {
    let app = app::cms_app();
    let state = Arc::new(CmsState::default());

    hooks::global_hooks(&app);
    hooks::register_audit_log(&app);
    services::configure(&app, Arc::clone(&state))?;

    Ok(Cms { app, state })
}
