use super::{TenantRole, User};

/// Does the caller hold the registry-wide super-admin role?
///
/// Absent user means no.
pub fn is_super_admin(user: Option<&User>) -> bool {
    user.map(User::is_super_admin).unwrap_or(false)
}

/// Tenant ids from the user's membership list, in membership order.
pub fn user_tenant_ids(user: Option<&User>) -> Vec<String> {
    user.map(|u| u.tenants.iter().map(|m| m.tenant.clone()).collect())
        .unwrap_or_default()
}

/// Tenant ids where the user holds a specific role, in membership order.
pub fn user_tenant_ids_with_role(user: Option<&User>, role: TenantRole) -> Vec<String> {
    user.map(|u| {
        u.tenants
            .iter()
            .filter(|m| m.roles.contains(&role))
            .map(|m| m.tenant.clone())
            .collect()
    })
    .unwrap_or_default()
}

/// May the caller update or delete the given tenant?
///
/// Super-admins may modify every tenant. Everyone else needs a
/// membership for that tenant carrying the tenant-admin role.
/// Fails closed on an absent user.
pub fn can_modify_tenant(user: Option<&User>, tenant_id: &str) -> bool {
    if is_super_admin(user) {
        return true;
    }

    user_tenant_ids_with_role(user, TenantRole::TenantAdmin)
        .iter()
        .any(|id| id == tenant_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{GlobalRole, TenantMembership};

    fn member(tenant: &str, roles: Vec<TenantRole>) -> TenantMembership {
        TenantMembership {
            tenant: tenant.to_string(),
            roles,
        }
    }

    fn user_with(tenants: Vec<TenantMembership>) -> User {
        User {
            id: Some("user:1".to_string()),
            email: "user@example.com".to_string(),
            username: None,
            roles: vec![GlobalRole::User],
            tenants,
        }
    }

    #[test]
    fn super_admin_modifies_every_tenant() {
        let admin = User {
            id: Some("user:admin".to_string()),
            email: "admin@example.com".to_string(),
            username: None,
            roles: vec![GlobalRole::SuperAdmin],
            tenants: vec![],
        };

        for tenant in ["tenant:gold", "tenant:silver", "tenant:bronze"] {
            assert!(can_modify_tenant(Some(&admin), tenant));
        }
    }

    #[test]
    fn non_member_cannot_modify_foreign_tenant() {
        let user = user_with(vec![member("tenant:gold", vec![TenantRole::TenantAdmin])]);

        assert!(can_modify_tenant(Some(&user), "tenant:gold"));
        assert!(!can_modify_tenant(Some(&user), "tenant:silver"));
    }

    #[test]
    fn viewer_membership_does_not_grant_modify() {
        let user = user_with(vec![member("tenant:gold", vec![TenantRole::TenantViewer])]);

        assert!(!can_modify_tenant(Some(&user), "tenant:gold"));
    }

    #[test]
    fn absent_user_fails_closed() {
        assert!(!can_modify_tenant(None, "tenant:gold"));
        assert!(!is_super_admin(None));
        assert!(user_tenant_ids(None).is_empty());
    }

    #[test]
    fn tenant_ids_preserve_membership_order() {
        let user = user_with(vec![
            member("tenant:silver", vec![TenantRole::TenantViewer]),
            member("tenant:gold", vec![TenantRole::TenantAdmin]),
        ]);

        assert_eq!(
            user_tenant_ids(Some(&user)),
            vec!["tenant:silver".to_string(), "tenant:gold".to_string()]
        );
        assert_eq!(
            user_tenant_ids_with_role(Some(&user), TenantRole::TenantAdmin),
            vec!["tenant:gold".to_string()]
        );
    }
}
