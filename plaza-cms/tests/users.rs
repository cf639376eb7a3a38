mod common;

use std::collections::BTreeSet;

use serde_json::json;

use plaza_cms::{registry_ctx, CmsParams};

use common::{error_code, find_user};

#[tokio::test]
async fn results_never_contain_passwords() {
    let cms = common::seeded().await;

    let users = cms
        .app
        .service("users")
        .unwrap()
        .find(registry_ctx(), CmsParams::internal())
        .await
        .unwrap();

    assert_eq!(users.len(), 5);
    for user in &users {
        assert!(user.get("password").is_none(), "password leaked: {user}");
    }
}

#[tokio::test]
async fn stored_passwords_are_bcrypt_hashed() {
    let cms = common::seeded().await;

    let store = cms.state.users.read().await;
    let registry = store
        .get(plaza_cms::REGISTRY_SCOPE)
        .expect("registry scope exists");

    let mut checked = 0;
    for record in registry.values() {
        let hash = record
            .get("password")
            .and_then(|v| v.as_str())
            .expect("stored user has a password");
        assert!(hash.starts_with("$2"), "not a bcrypt hash: {hash}");
        assert_ne!(hash, "demo");
        checked += 1;
    }
    assert_eq!(checked, 5);
}

#[tokio::test]
async fn visibility_is_scoped_to_shared_tenants() {
    let cms = common::seeded().await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;

    let visible = cms
        .app
        .service("users")
        .unwrap()
        .find(registry_ctx(), CmsParams::external(Some(tenant1)))
        .await
        .unwrap();

    let emails: BTreeSet<&str> = visible
        .iter()
        .filter_map(|u| u.get("email").and_then(|v| v.as_str()))
        .collect();

    // self, plus the multi-admin who shares the gold tenant
    assert_eq!(
        emails,
        BTreeSet::from(["tenant1@example.com", "multi@example.com"])
    );
}

#[tokio::test]
async fn super_admin_sees_every_account() {
    let cms = common::seeded().await;
    let admin = find_user(&cms, "admin@example.com").await;

    let visible = cms
        .app
        .service("users")
        .unwrap()
        .find(registry_ctx(), CmsParams::external(Some(admin)))
        .await
        .unwrap();

    assert_eq!(visible.len(), 5);
}

#[tokio::test]
async fn users_update_only_themselves() {
    let cms = common::seeded().await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let tenant2 = find_user(&cms, "tenant2@example.com").await;

    let users = cms.app.service("users").unwrap();

    let own_id = tenant1.id.clone().unwrap();
    let patched = users
        .patch(
            registry_ctx(),
            Some(&own_id),
            json!({"username": "tenant-one"}),
            CmsParams::external(Some(tenant1.clone())),
        )
        .await
        .unwrap();
    assert_eq!(patched["username"], json!("tenant-one"));

    let other_id = tenant2.id.clone().unwrap();
    let err = users
        .patch(
            registry_ctx(),
            Some(&other_id),
            json!({"username": "hijack"}),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 403);
}

#[tokio::test]
async fn account_creation_is_super_admin_only() {
    let cms = common::seeded().await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let admin = find_user(&cms, "admin@example.com").await;

    let users = cms.app.service("users").unwrap();

    let err = users
        .create(
            registry_ctx(),
            json!({"email": "new@example.com"}),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 403);

    users
        .create(
            registry_ctx(),
            json!({"email": "new@example.com", "password": "demo"}),
            CmsParams::external(Some(admin)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn invalid_emails_are_unprocessable() {
    let cms = common::seeded().await;

    let err = cms
        .app
        .service("users")
        .unwrap()
        .create(
            registry_ctx(),
            json!({"email": "not-an-email"}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 422);
}

#[tokio::test]
async fn memberships_must_reference_existing_tenants() {
    let cms = common::seeded().await;

    let err = cms
        .app
        .service("users")
        .unwrap()
        .create(
            registry_ctx(),
            json!({
                "email": "orphan@example.com",
                "tenants": [{"tenant": "tenant:missing", "roles": ["tenant-admin"]}],
            }),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 422);
}

#[tokio::test]
async fn unknown_roles_are_unprocessable() {
    let cms = common::seeded().await;

    let err = cms
        .app
        .service("users")
        .unwrap()
        .create(
            registry_ctx(),
            json!({"email": "odd@example.com", "roles": ["owner"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 422);
}
