//! Per-domain permission declarations and the operation → access table.
//!
//! Each domain contributes its own grant list; [`build_registry`] unions them into
//! the immutable [`PermissionRegistry`], and [`RoutePolicy::standard`] states what each
//! HTTP operation requires.

use std::collections::HashMap;

use warden_domain::permission::{Grants, Permission, PermissionRegistry, RoleName};

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAccess {
    GetAllUsers,
    GetUserProfile,
    GetUserById,
    UpdateProfile,
    DeleteUser,
}

impl UserAccess {
    pub const ALL: [UserAccess; 5] = [
        Self::GetAllUsers,
        Self::GetUserProfile,
        Self::GetUserById,
        Self::UpdateProfile,
        Self::DeleteUser,
    ];

    pub const fn permission(self) -> Permission {
        Permission::from_static(match self {
            Self::GetAllUsers => "get all users",
            Self::GetUserProfile => "get user profile",
            Self::GetUserById => "get user by id",
            Self::UpdateProfile => "update profile",
            Self::DeleteUser => "delete user",
        })
    }

    pub fn grants() -> Grants {
        vec![
            (RoleName::ADMIN, Self::ALL.map(Self::permission).to_vec()),
            (
                RoleName::USER,
                vec![
                    Self::GetUserProfile.permission(),
                    Self::UpdateProfile.permission(),
                ],
            ),
        ]
    }
}

// ── Roles ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleAccess {
    CreateRole,
    GetAllRoles,
    GetRoleById,
    UpdateRole,
    DeleteRole,
}

impl RoleAccess {
    pub const ALL: [RoleAccess; 5] = [
        Self::CreateRole,
        Self::GetAllRoles,
        Self::GetRoleById,
        Self::UpdateRole,
        Self::DeleteRole,
    ];

    pub const fn permission(self) -> Permission {
        Permission::from_static(match self {
            Self::CreateRole => "create role",
            Self::GetAllRoles => "get all roles",
            Self::GetRoleById => "get role by id",
            Self::UpdateRole => "update role",
            Self::DeleteRole => "delete role",
        })
    }

    pub fn grants() -> Grants {
        vec![(RoleName::ADMIN, Self::ALL.map(Self::permission).to_vec())]
    }
}

// ── Permissions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionAccess {
    GetAllPermissions,
    GetPermissionById,
}

impl PermissionAccess {
    pub const ALL: [PermissionAccess; 2] = [Self::GetAllPermissions, Self::GetPermissionById];

    pub const fn permission(self) -> Permission {
        Permission::from_static(match self {
            Self::GetAllPermissions => "get all permissions",
            Self::GetPermissionById => "get permission by id",
        })
    }

    pub fn grants() -> Grants {
        vec![(RoleName::ADMIN, Self::ALL.map(Self::permission).to_vec())]
    }
}

/// Registry populated from every domain's grant list.
pub fn build_registry() -> PermissionRegistry {
    PermissionRegistry::builder()
        .register_all(UserAccess::grants())
        .register_all(RoleAccess::grants())
        .register_all(PermissionAccess::grants())
        .build()
}

// ── Route policy ─────────────────────────────────────────────────────────────

/// Every HTTP operation the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Health,
    Register,
    Login,
    RefreshToken,
    ForgetPassword,
    ResetPassword,
    VerifyEmail,
    ResendEmail,
    GoogleLogin,
    ListUsers,
    GetProfile,
    GetUser,
    UpdateProfile,
    DeleteUser,
    CreateRole,
    ListRoles,
    GetRole,
    UpdateRole,
    DeleteRole,
    ListPermissions,
    GetPermission,
}

/// What a caller must present to invoke an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Caller's role must hold at least one of these.
    AnyOf(Vec<Permission>),
}

/// Operation → access table, consulted by the guard on every request.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: HashMap<Operation, Access>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, op: Operation, access: Access) -> Self {
        self.rules.insert(op, access);
        self
    }

    pub fn require(self, op: Operation, permission: Permission) -> Self {
        self.with(op, Access::AnyOf(vec![permission]))
    }

    /// Operations missing from the table require an authenticated caller.
    pub fn access_for(&self, op: Operation) -> Access {
        self.rules
            .get(&op)
            .cloned()
            .unwrap_or(Access::Authenticated)
    }

    pub fn standard() -> Self {
        use Operation as Op;

        [
            Op::Health,
            Op::Register,
            Op::Login,
            Op::RefreshToken,
            Op::ForgetPassword,
            Op::ResetPassword,
            Op::VerifyEmail,
            Op::ResendEmail,
            Op::GoogleLogin,
        ]
        .into_iter()
        .fold(Self::new(), |policy, op| policy.with(op, Access::Public))
        .require(Op::ListUsers, UserAccess::GetAllUsers.permission())
        .require(Op::GetProfile, UserAccess::GetUserProfile.permission())
        .require(Op::GetUser, UserAccess::GetUserById.permission())
        .require(Op::UpdateProfile, UserAccess::UpdateProfile.permission())
        .require(Op::DeleteUser, UserAccess::DeleteUser.permission())
        .require(Op::CreateRole, RoleAccess::CreateRole.permission())
        .require(Op::ListRoles, RoleAccess::GetAllRoles.permission())
        .require(Op::GetRole, RoleAccess::GetRoleById.permission())
        .require(Op::UpdateRole, RoleAccess::UpdateRole.permission())
        .require(Op::DeleteRole, RoleAccess::DeleteRole.permission())
        .require(
            Op::ListPermissions,
            PermissionAccess::GetAllPermissions.permission(),
        )
        .require(
            Op::GetPermission,
            PermissionAccess::GetPermissionById.permission(),
        )
    }
}
