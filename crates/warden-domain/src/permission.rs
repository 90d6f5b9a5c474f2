//! Roles, permissions and the role → permission registry.

use std::borrow::{Borrow, Cow};
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Atomic capability identifier (e.g. `"get all users"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role name, unique across the system (e.g. `"admin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(Cow<'static, str>);

impl RoleName {
    pub const ADMIN: RoleName = RoleName::from_static("admin");
    pub const USER: RoleName = RoleName::from_static("user");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A grant list contributed by one domain: `[(role, [permission, ...]), ...]`.
pub type Grants = Vec<(RoleName, Vec<Permission>)>;

/// Immutable role → permission-set mapping.
///
/// Built once at startup through [`PermissionRegistryBuilder`] and shared read-only
/// (`Arc<PermissionRegistry>`) across requests.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    grants: HashMap<RoleName, HashSet<Permission>>,
}

impl PermissionRegistry {
    pub fn builder() -> PermissionRegistryBuilder {
        PermissionRegistryBuilder::default()
    }

    /// Permissions granted to `role`. Unknown roles get the empty set.
    pub fn permissions_for(&self, role: &str) -> HashSet<Permission> {
        self.grants
            .get(role)
            .cloned()
            .unwrap_or_default()
    }

    /// `true` if `role` holds at least one of `required`.
    pub fn allows_any(&self, role: &str, required: &[Permission]) -> bool {
        match self.grants.get(role) {
            Some(granted) => required.iter().any(|p| granted.contains(p)),
            None => false,
        }
    }

    /// Registered roles, sorted by name.
    pub fn roles(&self) -> Vec<RoleName> {
        let mut roles: Vec<RoleName> = self.grants.keys().cloned().collect();
        roles.sort();
        roles
    }

    /// Every permission granted to any role, sorted and de-duplicated.
    pub fn all_permissions(&self) -> Vec<Permission> {
        let mut all: Vec<Permission> = self
            .grants
            .values()
            .flat_map(|set| set.iter().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        all.sort();
        all
    }
}

/// Accumulates grants from every domain before freezing them into a registry.
#[derive(Debug, Default)]
pub struct PermissionRegistryBuilder {
    grants: HashMap<RoleName, HashSet<Permission>>,
}

impl PermissionRegistryBuilder {
    /// Add `permissions` to `role`. Repeated calls for the same role union.
    pub fn register(
        mut self,
        role: RoleName,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    pub fn register_all(self, grants: Grants) -> Self {
        grants
            .into_iter()
            .fold(self, |builder, (role, perms)| builder.register(role, perms))
    }

    pub fn build(self) -> PermissionRegistry {
        PermissionRegistry {
            grants: self.grants,
        }
    }
}
