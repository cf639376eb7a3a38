mod common;

use serde_json::json;

use plaza_core::TenantContext;

use plaza_cms::CmsParams;

use common::{error_code, find_user, id_of, tenant_by_slug};

#[tokio::test]
async fn tenant_admins_manage_their_media() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;

    let media = cms.app.service("media").unwrap();

    let created = media
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"filename": "hero.png", "alt": "Hero image", "mimeType": "image/png"}),
            CmsParams::external(Some(tenant1.clone())),
        )
        .await
        .unwrap();
    assert_eq!(created["tenant"], json!(id_of(&gold)));

    let found = media
        .find(
            TenantContext::new(id_of(&gold)),
            CmsParams::external(Some(tenant1.clone())),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let removed = media
        .remove(
            TenantContext::new(id_of(&gold)),
            Some(&common::id_of(&created)),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap();
    assert_eq!(removed["filename"], json!("hero.png"));
}

#[tokio::test]
async fn media_does_not_expose_full_replace() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    let media = cms.app.service("media").unwrap();
    let created = media
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"filename": "logo.svg"}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let err = media
        .update(
            TenantContext::new(id_of(&gold)),
            &id_of(&created),
            json!({"filename": "logo-2.svg"}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 405);

    // partial updates are the supported write
    let patched = media
        .patch(
            TenantContext::new(id_of(&gold)),
            Some(&id_of(&created)),
            json!({"alt": "Logo"}),
            CmsParams::internal(),
        )
        .await
        .unwrap();
    assert_eq!(patched["alt"], json!("Logo"));
    assert_eq!(patched["filename"], json!("logo.svg"));
}

#[tokio::test]
async fn media_writes_by_non_members_are_forbidden() {
    let cms = common::seeded().await;
    let silver = tenant_by_slug(&cms, "silver").await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;

    let err = cms
        .app
        .service("media")
        .unwrap()
        .create(
            TenantContext::new(id_of(&silver)),
            json!({"filename": "sneaky.png"}),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 403);
}

#[tokio::test]
async fn media_requires_a_filename_and_an_existing_tenant() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    let media = cms.app.service("media").unwrap();

    let err = media
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"alt": "no filename"}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 422);

    let err = media
        .create(
            TenantContext::new("tenant:missing"),
            json!({"filename": "ghost.png"}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 422);
}

#[tokio::test]
async fn public_tenants_expose_media_to_anonymous_readers() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let gold_id = id_of(&gold);

    let media = cms.app.service("media").unwrap();
    media
        .create(
            TenantContext::new(gold_id.clone()),
            json!({"filename": "press-kit.zip"}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let err = media
        .find(TenantContext::new(gold_id.clone()), CmsParams::anonymous())
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 401);

    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            plaza_cms::registry_ctx(),
            Some(&gold_id),
            json!({"allowPublicRead": true}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let found = media
        .find(TenantContext::new(gold_id), CmsParams::anonymous())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}
