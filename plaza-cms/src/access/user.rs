use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registry-wide roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalRole {
    SuperAdmin,
    User,
}

/// Roles scoped to a single tenant membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TenantRole {
    TenantAdmin,
    TenantViewer,
}

/// One entry of a user's tenant list: which tenant, with which roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantMembership {
    pub tenant: String,
    #[serde(default)]
    pub roles: Vec<TenantRole>,
}

/// Typed view over a user document.
///
/// User records flow through services as JSON; access logic
/// deserializes into this shape. Unknown role strings make the whole
/// deserialization fail, which the predicates treat as "no user"
/// (fail closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Vec<GlobalRole>,
    #[serde(default)]
    pub tenants: Vec<TenantMembership>,
}

impl User {
    pub fn from_value(v: &Value) -> Option<User> {
        serde_json::from_value(v.clone()).ok()
    }

    pub fn is_super_admin(&self) -> bool {
        self.roles.contains(&GlobalRole::SuperAdmin)
    }
}
