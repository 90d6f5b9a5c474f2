use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_api::domain::repository::{
    MailSender, PermissionRepository, RoleRepository, SocialProfilePort, UserRepository,
};
use warden_api::domain::types::{PermissionRecord, Role, SocialProfile, User};
use warden_api::error::ApiError;
use warden_auth_types::token::TokenService;
use warden_core::password::hash_password;
use warden_domain::pagination::{Page, PageRequest};
use warden_domain::user::SocialProvider;

pub const TEST_PASSWORD: &str = "password123";

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let data = items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    Page::new(data, page, items.len() as u64)
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// Soft-deleted users are removed from the list, matching the live-only lookups.
#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Drop the target user right before a password write lands.
    pub delete_before_write: bool,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            delete_before_write: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn deleting_before_write(mut self) -> Self {
        self.delete_before_write = true;
        self
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.get(id))
    }

    async fn find_by_social_id(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.social_type == Some(provider) && u.social_id.as_deref() == Some(social_id))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailAlreadyRegistered);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        if self.delete_before_write {
            users.retain(|u| u.id != id);
        }
        match users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password = Some(password_hash.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_email_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        if let Some(u) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            u.email_verified_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, username: &str) -> Result<bool, ApiError> {
        match self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.username = username.to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, ApiError> {
        Ok(paginate(&self.users.lock().unwrap(), page))
    }
}

// ── MockRoleRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRoleRepo {
    pub roles: Arc<Mutex<Vec<Role>>>,
    pub links: Arc<Mutex<Vec<(Uuid, Uuid)>>>,
}

impl MockRoleRepo {
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles: Arc::new(Mutex::new(roles)),
            links: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.roles
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }
}

impl RoleRepository for MockRoleRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, ApiError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, ApiError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn create(&self, role: &Role) -> Result<(), ApiError> {
        let mut roles = self.roles.lock().unwrap();
        if roles.iter().any(|r| r.name == role.name) {
            return Err(ApiError::RoleAlreadyExists);
        }
        roles.push(role.clone());
        Ok(())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<bool, ApiError> {
        match self.roles.lock().unwrap().iter_mut().find(|r| r.id == id) {
            Some(r) => {
                r.name = name.to_owned();
                r.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut roles = self.roles.lock().unwrap();
        let before = roles.len();
        roles.retain(|r| r.id != id);
        Ok(roles.len() < before)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Role>, ApiError> {
        Ok(paginate(&self.roles.lock().unwrap(), page))
    }

    async fn link_permission(&self, role_id: Uuid, permission_id: Uuid) -> Result<bool, ApiError> {
        let mut links = self.links.lock().unwrap();
        if links.contains(&(role_id, permission_id)) {
            return Ok(false);
        }
        links.push((role_id, permission_id));
        Ok(true)
    }
}

// ── MockPermissionRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPermissionRepo {
    pub permissions: Arc<Mutex<Vec<PermissionRecord>>>,
}

impl MockPermissionRepo {
    pub fn new(permissions: Vec<PermissionRecord>) -> Self {
        Self {
            permissions: Arc::new(Mutex::new(permissions)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl PermissionRepository for MockPermissionRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PermissionRecord>, ApiError> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PermissionRecord>, ApiError> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn create(&self, permission: &PermissionRecord) -> Result<(), ApiError> {
        self.permissions.lock().unwrap().push(permission.clone());
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<PermissionRecord>, ApiError> {
        Ok(paginate(&self.permissions.lock().unwrap(), page))
    }
}

// ── MockMailSender ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailKind {
    Register,
    ForgetPassword,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub kind: MailKind,
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Clone, Default)]
pub struct MockMailSender {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<SentMail>>> {
        Arc::clone(&self.sent)
    }

    fn record(&self, kind: MailKind, user: &User, token: &str) -> Result<(), ApiError> {
        if self.fail {
            return Err(anyhow::anyhow!("smtp unavailable").into());
        }
        self.sent.lock().unwrap().push(SentMail {
            kind,
            user_id: user.id,
            email: user.email.clone(),
            token: token.to_owned(),
        });
        Ok(())
    }
}

impl MailSender for MockMailSender {
    async fn send_register_mail(&self, user: &User, token: &str) -> Result<(), ApiError> {
        self.record(MailKind::Register, user, token)
    }

    async fn send_forget_password_mail(&self, user: &User, token: &str) -> Result<(), ApiError> {
        self.record(MailKind::ForgetPassword, user, token)
    }
}

// ── MockSocialPort ───────────────────────────────────────────────────────────

/// Resolves any access token to `profile`; `None` behaves like a rejected token.
pub struct MockSocialPort {
    pub profile: Option<SocialProfile>,
}

impl SocialProfilePort for MockSocialPort {
    async fn fetch_profile(
        &self,
        _provider: SocialProvider,
        _access_token: &str,
    ) -> Result<SocialProfile, ApiError> {
        self.profile.clone().ok_or(ApiError::Unauthorized)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn tokens() -> Arc<TokenService> {
    Arc::new(warden_testing::auth::test_token_service())
}

pub fn test_role(name: &str) -> Role {
    let now = Utc::now();
    Role {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        created_at: now,
        updated_at: now,
    }
}

/// Verified local user with [`TEST_PASSWORD`].
pub fn test_user(email: &str, role: Option<Role>) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: email.split('@').next().unwrap_or_default().to_owned(),
        email: email.to_owned(),
        password: Some(hash_password(TEST_PASSWORD).unwrap()),
        email_verified_at: Some(now),
        social_id: None,
        social_type: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn unverified(mut user: User) -> User {
    user.email_verified_at = None;
    user
}
