mod common;

use serde_json::json;

use plaza_core::ServiceCaller;

use plaza_cms::locales::{available_locales, default_locales, LocaleDef};
use plaza_cms::{registry_ctx, CmsParams};

use common::{find_user, id_of, tenant_by_slug};

fn codes(locales: &[LocaleDef]) -> Vec<&'static str> {
    locales.iter().map(|l| l.code).collect()
}

#[tokio::test]
async fn super_admin_sees_the_full_list_unchanged() {
    let cms = common::seeded().await;
    let admin = find_user(&cms, "admin@example.com").await;

    let services = ServiceCaller::new(cms.app.clone());
    let all = default_locales();

    let available = available_locales(&services, Some(&admin), &all).await;
    assert_eq!(available, all);
}

#[tokio::test]
async fn anonymous_callers_see_the_full_list() {
    let cms = common::seeded().await;
    let services = ServiceCaller::new(cms.app.clone());
    let all = default_locales();

    let available = available_locales(&services, None, &all).await;
    assert_eq!(available, all);
}

#[tokio::test]
async fn member_is_narrowed_to_the_tenant_locale_set() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            registry_ctx(),
            Some(&id_of(&gold)),
            json!({"supportedLocales": ["en", "es"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let services = ServiceCaller::new(cms.app.clone());

    let available = available_locales(&services, Some(&tenant1), &default_locales()).await;
    assert_eq!(codes(&available), vec!["en", "es"]);
}

#[tokio::test]
async fn filtering_preserves_the_order_of_the_requested_list() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            registry_ctx(),
            Some(&id_of(&gold)),
            json!({"supportedLocales": ["en", "es"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let services = ServiceCaller::new(cms.app.clone());

    // request list in a custom order; the result keeps it
    let all = default_locales();
    let requested: Vec<LocaleDef> = all.iter().rev().copied().collect();

    let available = available_locales(&services, Some(&tenant1), &requested).await;
    assert_eq!(codes(&available), vec!["es", "en"]);
}

#[tokio::test]
async fn tenant_without_a_locale_set_does_not_filter() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;

    cms.app
        .service("tenants")
        .unwrap()
        .patch(
            registry_ctx(),
            Some(&id_of(&gold)),
            json!({"supportedLocales": []}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    let tenant1 = find_user(&cms, "tenant1@example.com").await;
    let services = ServiceCaller::new(cms.app.clone());

    let available = available_locales(&services, Some(&tenant1), &default_locales()).await;
    assert_eq!(available, default_locales());
}

#[tokio::test]
async fn first_membership_decides_for_multi_tenant_users() {
    let cms = common::seeded().await;
    let gold = tenant_by_slug(&cms, "gold").await;
    let silver = tenant_by_slug(&cms, "silver").await;

    let tenants = cms.app.service("tenants").unwrap();
    tenants
        .patch(
            registry_ctx(),
            Some(&id_of(&gold)),
            json!({"supportedLocales": ["en", "es"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap();
    tenants
        .patch(
            registry_ctx(),
            Some(&id_of(&silver)),
            json!({"supportedLocales": ["fr"]}),
            CmsParams::internal(),
        )
        .await
        .unwrap();

    // multi-admin's memberships are gold, silver, bronze in seed order
    let multi = find_user(&cms, "multi@example.com").await;
    let services = ServiceCaller::new(cms.app.clone());

    let available = available_locales(&services, Some(&multi), &default_locales()).await;
    assert_eq!(codes(&available), vec!["en", "es"]);
}
