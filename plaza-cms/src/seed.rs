//! One-time bootstrap dataset: three tenants (gold, silver, bronze),
//! a super admin, three tenant admins, a multi-tenant admin, and one
//! home page per tenant.
//!
//! Error policy: tenant and super-admin creation failures abort the
//! seed; individual tenant-user and page failures are logged and
//! skipped, leaving partial seed data.

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use plaza_core::{PlazaApp, PlazaError, TenantContext};

use crate::blocks::welcome_layout;
use crate::locales::DEFAULT_LOCALE;
use crate::params::CmsParams;
use crate::services::registry_ctx;

pub async fn seed(app: &PlazaApp<Value, CmsParams>) -> Result<()> {
    info!("starting seed");

    let tenants = app.service("tenants")?;
    let users = app.service("users")?;
    let pages = app.service("pages")?;

    info!("creating tenants");
    let mut tenant_ids = Vec::with_capacity(3);
    for (name, slug, domain) in [
        ("Tenant 1", "gold", "gold.localhost"),
        ("Tenant 2", "silver", "silver.localhost"),
        ("Tenant 3", "bronze", "bronze.localhost"),
    ] {
        let tenant = tenants
            .create(
                registry_ctx(),
                json!({"name": name, "slug": slug, "domain": domain}),
                CmsParams::internal(),
            )
            .await
            .map_err(|e| {
                error!(slug, error = %e, "failed to create tenant");
                e
            })?;

        let id = tenant
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                PlazaError::general_error(format!("created tenant '{slug}' has no id"))
                    .into_anyhow()
            })?;

        info!(slug, id = %id, "created tenant");
        tenant_ids.push(id);
    }

    info!("creating super admin user");
    users
        .create(
            registry_ctx(),
            json!({
                "email": "admin@example.com",
                "password": "demo",
                "roles": ["super-admin"],
                "username": "super-admin",
            }),
            CmsParams::internal(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "failed to create super admin user");
            e
        })?;
    info!("created super admin user");

    info!("creating tenant users");
    for (i, tenant_id) in tenant_ids.iter().enumerate() {
        let n = i + 1;
        let email = format!("tenant{n}@example.com");
        let result = users
            .create(
                registry_ctx(),
                json!({
                    "email": email,
                    "password": "demo",
                    "username": format!("tenant{n}"),
                    "tenants": [{"tenant": tenant_id, "roles": ["tenant-admin"]}],
                }),
                CmsParams::internal(),
            )
            .await;

        match result {
            Ok(_) => info!(email, "created tenant admin"),
            // keep going; a partial seed beats no seed
            Err(e) => warn!(email, error = %e, "failed to create tenant admin"),
        }
    }

    info!("creating multi-tenant admin");
    let memberships: Vec<Value> = tenant_ids
        .iter()
        .map(|id| json!({"tenant": id, "roles": ["tenant-admin"]}))
        .collect();
    let result = users
        .create(
            registry_ctx(),
            json!({
                "email": "multi@example.com",
                "password": "demo",
                "username": "multi-admin",
                "tenants": memberships,
            }),
            CmsParams::internal(),
        )
        .await;
    match result {
        Ok(_) => info!("created multi-tenant admin"),
        Err(e) => warn!(error = %e, "failed to create multi-tenant admin"),
    }

    info!("creating pages");
    for (i, tenant_id) in tenant_ids.iter().enumerate() {
        let n = i + 1;
        let result = pages
            .create(
                TenantContext::new(tenant_id.clone()),
                json!({
                    "slug": "home",
                    "title": format!("Page for Tenant {n}"),
                    "layout": welcome_layout(
                        DEFAULT_LOCALE,
                        &format!("Welcome to Tenant {n}"),
                        &format!("This is a sample page for Tenant {n}."),
                    ),
                }),
                CmsParams::internal(),
            )
            .await;

        match result {
            Ok(_) => info!(tenant = %tenant_id, "created home page"),
            Err(e) => warn!(tenant = %tenant_id, error = %e, "failed to create home page"),
        }
    }

    info!("seed data created");
    Ok(())
}
