#![allow(dead_code)]

use serde_json::Value;

use plaza_cms::access::User;
use plaza_cms::{registry_ctx, Cms, CmsParams};

/// Fresh app with the seed dataset loaded.
pub async fn seeded() -> Cms {
    let cms = plaza_cms::build().unwrap();
    plaza_cms::seed::seed(&cms.app).await.unwrap();
    cms
}

pub async fn find_user(cms: &Cms, email: &str) -> User {
    let users = cms
        .app
        .service("users")
        .unwrap()
        .find(
            registry_ctx(),
            CmsParams::internal().with_query("email", email),
        )
        .await
        .unwrap();

    assert_eq!(users.len(), 1, "expected exactly one user for {email}");
    User::from_value(&users[0]).unwrap()
}

pub async fn tenant_by_slug(cms: &Cms, slug: &str) -> Value {
    let tenants = cms
        .app
        .service("tenants")
        .unwrap()
        .find(
            registry_ctx(),
            CmsParams::internal().with_query("slug", slug),
        )
        .await
        .unwrap();

    assert_eq!(tenants.len(), 1, "expected exactly one tenant for {slug}");
    tenants.into_iter().next().unwrap()
}

pub fn id_of(record: &Value) -> String {
    record
        .get("id")
        .and_then(|v| v.as_str())
        .expect("record has an id")
        .to_string()
}

pub fn error_code(err: &anyhow::Error) -> u16 {
    plaza_core::PlazaError::from_anyhow(err)
        .map(|e| e.code())
        .unwrap_or(0)
}
