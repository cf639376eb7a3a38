mod common;

use serde_json::json;

use plaza_core::TenantContext;

use plaza_cms::{registry_ctx, CmsParams};

use common::{error_code, find_user, id_of, tenant_by_slug};

#[tokio::test]
async fn seeded_pages_are_isolated_per_tenant() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let silver = tenant_by_slug(&cms, "silver").await;

    let pages = cms.app.service("pages").unwrap();

    let gold_pages = pages
        .find(TenantContext::new(id_of(&gold)), CmsParams::internal())
        .await
        .unwrap();
    assert_eq!(gold_pages.len(), 1);
    assert_eq!(gold_pages[0]["slug"], json!("home"));
    assert_eq!(gold_pages[0]["title"], json!("Page for Tenant 1"));
    // the tenant ref was resolved from the call scope
    assert_eq!(gold_pages[0]["tenant"], json!(id_of(&gold)));

    let silver_pages = pages
        .find(TenantContext::new(id_of(&silver)), CmsParams::internal())
        .await
        .unwrap();
    assert_eq!(silver_pages.len(), 1);
    assert_eq!(silver_pages[0]["title"], json!("Page for Tenant 2"));
}

#[tokio::test]
async fn anonymous_reads_require_a_public_tenant() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let gold_id = id_of(&gold);

    let pages = cms.app.service("pages").unwrap();

    // not public: fail closed
    let err = pages
        .find(TenantContext::new(gold_id.clone()), CmsParams::anonymous())
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 401);

    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            registry_ctx(),
            Some(&gold_id),
            json!({"allowPublicRead": true}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let found = pages
        .find(TenantContext::new(gold_id), CmsParams::anonymous())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn members_read_non_member_users_do_not() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let tenant2 = find_user(&cms, "tenant2@example.com").await;

    let pages = cms.app.service("pages").unwrap();

    let found = pages
        .find(
            TenantContext::new(id_of(&gold)),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let err = pages
        .find(
            TenantContext::new(id_of(&gold)),
            CmsParams::external(Some(tenant2)),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 403);
}

#[tokio::test]
async fn only_tenant_admins_write_pages() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let silver = tenant_by_slug(&cms, "silver").await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;

    let pages = cms.app.service("pages").unwrap();

    let created = pages
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"slug": "about", "title": "About"}),
            CmsParams::external(Some(tenant1.clone())),
        )
        .await
        .unwrap();
    assert_eq!(created["tenant"], json!(id_of(&gold)));

    let err = pages
        .create(
            TenantContext::new(id_of(&silver)),
            json!({"slug": "about", "title": "About"}),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 403);

    let err = pages
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"slug": "spam", "title": "Spam"}),
            CmsParams::anonymous(),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 401);
}

#[tokio::test]
async fn layout_locales_are_bounded_by_the_tenant_locale_set() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let tenant1 = find_user(&cms, "tenant1@example.com").await;

    // seeded tenants support only "en"
    let err = cms
        .app
        .service("pages")
        .unwrap()
        .create(
            TenantContext::new(id_of(&gold)),
            json!({
                "slug": "bienvenue",
                "title": "Bienvenue",
                "layout": plaza_cms::blocks::welcome_layout("fr", "Bienvenue", "Page d'accueil."),
            }),
            CmsParams::external(Some(tenant1.clone())),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), 422);

    // widen the set and the same write passes
    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            registry_ctx(),
            Some(&id_of(&gold)),
            json!({"supportedLocales": ["en", "fr"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    cms.app
        .service("pages")
        .unwrap()
        .create(
            TenantContext::new(id_of(&gold)),
            json!({
                "slug": "bienvenue",
                "title": "Bienvenue",
                "layout": plaza_cms::blocks::welcome_layout("fr", "Bienvenue", "Page d'accueil."),
            }),
            CmsParams::external(Some(tenant1)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn document_tenant_must_match_the_call_scope() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let silver = tenant_by_slug(&cms, "silver").await;

    let err = cms
        .app
        .service("pages")
        .unwrap()
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"slug": "x", "title": "X", "tenant": id_of(&silver)}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 400);
}

#[tokio::test]
async fn pages_of_unknown_tenants_are_unprocessable() {
    let cms = common::seeded().await;

    let err = cms
        .app
        .service("pages")
        .unwrap()
        .create(
            TenantContext::new("tenant:missing"),
            json!({"slug": "x", "title": "X", "layout": []}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 422);
}

#[tokio::test]
async fn find_supports_slug_lookup() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let gold_ctx = TenantContext::new(id_of(&gold));

    let pages = cms.app.service("pages").unwrap();
    pages
        .create(
            gold_ctx.clone(),
            json!({"slug": "pricing", "title": "Pricing"}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let found = pages
        .find(
            gold_ctx,
            CmsParams::internal().with_query("slug", "pricing"),
        )
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], json!("Pricing"));
}

#[tokio::test]
async fn empty_titles_are_rejected() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    let err = cms
        .app
        .service("pages")
        .unwrap()
        .create(
            TenantContext::new(id_of(&gold)),
            json!({"slug": "x", "title": "  "}),
            CmsParams::internal(),
        )
        .await
        .unwrap_err();

    assert_eq!(error_code(&err), 422);
}
