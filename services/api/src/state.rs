use std::sync::Arc;

use sea_orm::DatabaseConnection;

use warden_auth_types::token::TokenService;
use warden_domain::permission::PermissionRegistry;

use crate::config::AppConfig;
use crate::domain::access::{RoutePolicy, build_registry};
use crate::infra::db::{DbPermissionRepository, DbRoleRepository, DbUserRepository};
use crate::infra::mail::{MailLinks, OutboxMailSender};
use crate::infra::social::HttpSocialProfileClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub registry: Arc<PermissionRegistry>,
    pub policy: Arc<RoutePolicy>,
    pub social: HttpSocialProfileClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            tokens: Arc::new(TokenService::new(config.tokens.clone())),
            registry: Arc::new(build_registry()),
            policy: Arc::new(RoutePolicy::standard()),
            social: HttpSocialProfileClient::new(config.google_userinfo_url.clone()),
            config: Arc::new(config),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn permission_repo(&self) -> DbPermissionRepository {
        DbPermissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn mail_sender(&self) -> OutboxMailSender {
        OutboxMailSender {
            db: self.db.clone(),
            links: MailLinks {
                web_url: self.config.web_url.clone(),
                verify_route: self.config.web_verify_route.clone(),
                forget_password_route: self.config.web_forget_password_route.clone(),
            },
        }
    }
}
