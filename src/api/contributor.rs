use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::api::error::RequiredError;

/// Grants a user a role inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub user: Subject,
    #[serde(rename = "referredNamespace")]
    pub referred_namespace: String,
    #[serde(rename = "RoleRef")]
    pub role_ref: RoleRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub kind: String,
    pub name: String,
    #[serde(rename = "apiGroup", default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
}

impl Binding {
    /// The permission this binding grants, if its role is a known one.
    pub fn permission(&self) -> Option<Permission> {
        self.role_ref.name.parse().ok()
    }

    /// Owner bindings are managed by the platform, not listed as contributors.
    pub fn is_owner(&self) -> bool {
        self.permission() == Some(Permission::Admin)
    }
}

/// ClusterRole granted to a contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Admin,
    Edit,
    View,
}

impl Default for Permission {
    fn default() -> Self {
        Permission::View
    }
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Edit => "edit",
            Permission::View => "view",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission {0:?}, expected admin, edit or view")]
pub struct UnknownPermission(String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Permission::Admin),
            "edit" => Ok(Permission::Edit),
            "view" => Ok(Permission::View),
            _ => Err(UnknownPermission(s.to_owned())),
        }
    }
}

/// Builder for the binding that adds a contributor to a namespace.
#[derive(Debug, Clone, Default)]
pub struct NewContributor {
    user: String,
    namespace: String,
    permission: Permission,
}

impl NewContributor {
    pub fn new(namespace: impl Into<String>) -> Self {
        NewContributor {
            namespace: namespace.into(),
            ..NewContributor::default()
        }
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn build(self) -> Result<Binding, RequiredError> {
        if self.user.trim().is_empty() {
            return Err(RequiredError::new("user", "AddContributor"));
        }
        if self.namespace.trim().is_empty() {
            return Err(RequiredError::new("referredNamespace", "AddContributor"));
        }
        Ok(Binding {
            user: Subject {
                kind: "User".to_owned(),
                name: self.user,
            },
            referred_namespace: self.namespace,
            role_ref: RoleRef {
                kind: "ClusterRole".to_owned(),
                name: self.permission.as_str().to_owned(),
                api_group: None,
            },
            status: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contributor_defaults_to_view() {
        let binding = NewContributor::new("alice").user("bob@example.com").build().unwrap();
        assert_eq!(binding.permission(), Some(Permission::View));
        assert_eq!(binding.user.kind, "User");
        assert_eq!(binding.role_ref.kind, "ClusterRole");
        assert!(!binding.is_owner());
    }

    #[test]
    fn new_contributor_requires_user() {
        let err = NewContributor::new("alice").permission(Permission::Edit).build().unwrap_err();
        assert_eq!(err.field(), "user");
    }

    #[test]
    fn binding_wire_format() {
        let binding = NewContributor::new("alice")
            .user("bob@example.com")
            .permission(Permission::Edit)
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&binding).unwrap(),
            serde_json::json!({
                "user": { "kind": "User", "name": "bob@example.com" },
                "referredNamespace": "alice",
                "RoleRef": { "kind": "ClusterRole", "name": "edit" }
            })
        );
    }

    #[test]
    fn parse_owner_binding() {
        let body = r#"{
            "user": { "kind": "User", "name": "alice@example.com" },
            "referredNamespace": "alice",
            "RoleRef": { "apiGroup": "rbac.authorization.k8s.io", "kind": "ClusterRole", "name": "admin" },
            "status": "Succeeded"
        }"#;
        let binding = serde_json::from_str::<Binding>(body).unwrap();
        assert!(binding.is_owner());
        assert_eq!(binding.role_ref.api_group.as_deref(), Some("rbac.authorization.k8s.io"));
    }
}
