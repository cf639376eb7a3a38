use anyhow::Result;
use tracing::info;

use plaza_cms::{registry_ctx, CmsParams};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cms = plaza_cms::build()?;

    let seed_enabled = cms
        .app
        .get("seed.enabled")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    if seed_enabled {
        plaza_cms::seed::seed(&cms.app).await?;
    } else {
        info!("seed disabled (set PLAZA__SEED__ENABLED=true to bootstrap)");
    }

    let tenants = cms
        .app
        .service("tenants")?
        .find(registry_ctx(), CmsParams::internal())
        .await?;
    let users = cms
        .app
        .service("users")?
        .find(registry_ctx(), CmsParams::internal())
        .await?;

    info!(tenants = tenants.len(), users = users.len(), "store summary");
    for tenant in &tenants {
        let slug = tenant.get("slug").and_then(|v| v.as_str()).unwrap_or("-");
        let domain = tenant.get("domain").and_then(|v| v.as_str()).unwrap_or("-");
        info!(slug, domain, "tenant");
    }

    Ok(())
}
