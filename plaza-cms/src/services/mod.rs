use std::sync::Arc;

use serde_json::Value;

use plaza_core::{PlazaApp, PlazaService};

pub mod adapters;
pub mod scoped;
pub mod types;

pub mod media;
pub mod pages;
pub mod tenants;
pub mod users;

pub use types::{registry_ctx, CmsState, REGISTRY_SCOPE};

use crate::params::CmsParams;

/// Register the four collections and their hooks.
pub fn configure(app: &PlazaApp<Value, CmsParams>, state: Arc<CmsState>) -> anyhow::Result<()> {
    let tenants: Arc<dyn PlazaService<Value, CmsParams>> =
        Arc::new(tenants::TenantsService::new(state.clone()));
    app.register_service("tenants", tenants);
    tenants::tenants_shared::register_hooks(app)?;

    let users: Arc<dyn PlazaService<Value, CmsParams>> =
        Arc::new(users::UsersService::new(state.clone()));
    app.register_service("users", users);
    users::users_shared::register_hooks(app)?;

    let pages: Arc<dyn PlazaService<Value, CmsParams>> =
        Arc::new(pages::PagesService::new(state.clone()));
    app.register_service("pages", pages);
    pages::pages_shared::register_hooks(app)?;

    let media: Arc<dyn PlazaService<Value, CmsParams>> = Arc::new(media::media_service(state));
    app.register_service("media", media);
    media::media_shared::register_hooks(app)?;

    Ok(())
}
