use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use warden_auth_types::token::{AuthTokens, TokenError, TokenKind, TokenService};
use warden_core::password::{hash_password, verify_password};
use warden_domain::user::{SocialProvider, normalize_email};

use crate::domain::repository::{MailSender, RoleRepository, SocialProfilePort, UserRepository};
use crate::domain::types::{Role, User};
use crate::error::ApiError;

/// Resolve the role new accounts receive. A missing role is logged and left unassigned.
async fn default_role<R: RoleRepository>(
    roles: &R,
    name: &str,
) -> Result<Option<Role>, ApiError> {
    let role = roles.find_by_name(name).await?;
    if role.is_none() {
        tracing::warn!(role = name, "default role not found, creating user without role");
    }
    Ok(role)
}

fn log_mail_failure(result: Result<(), ApiError>, user: &User, kind: &'static str) {
    if let Err(e) = result {
        tracing::warn!(user_id = %user.id, mail = kind, error = %e, "failed to queue mail");
    }
}

fn invalid_token(kind: TokenKind) -> impl FnOnce(TokenError) -> ApiError {
    move |e| {
        tracing::debug!(kind = kind.as_str(), reason = %e, "token rejected");
        ApiError::InvalidToken
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U: UserRepository, R: RoleRepository, M: MailSender> {
    pub users: U,
    pub roles: R,
    pub mail: M,
    pub tokens: Arc<TokenService>,
    pub default_role: String,
}

impl<U: UserRepository, R: RoleRepository, M: MailSender> RegisterUseCase<U, R, M> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailAlreadyRegistered);
        }

        let password = hash_password(&input.password).context("hash password")?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username.trim().to_owned(),
            email,
            password: Some(password),
            email_verified_at: None,
            social_id: None,
            social_type: None,
            role: default_role(&self.roles, &self.default_role).await?,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        let token = self
            .tokens
            .issue_register_token(&user.identity())
            .context("issue register token")?;
        log_mail_failure(
            self.mail.send_register_mail(&user, &token).await,
            &user,
            "register",
        );
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthTokens, ApiError> {
        let user = self
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // Social-only accounts have no password to match.
        let matches = user
            .password
            .as_deref()
            .is_some_and(|hash| verify_password(&input.password, hash));
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(self
            .tokens
            .issue_login_token(&user.identity())
            .context("issue login token")?)
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    pub async fn execute(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let identity = self
            .tokens
            .verify_refresh_token(refresh_token)
            .map_err(invalid_token(TokenKind::Refresh))?;

        // Deleted users cannot renew.
        let user = self
            .users
            .find_by_id(identity.id)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        Ok(self
            .tokens
            .issue_login_token(&user.identity())
            .context("issue login token")?)
    }
}

// ── ForgetPassword ───────────────────────────────────────────────────────────

pub struct ForgetPasswordUseCase<U: UserRepository, M: MailSender> {
    pub users: U,
    pub mail: M,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository, M: MailSender> ForgetPasswordUseCase<U, M> {
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(ApiError::EmailNotRegistered)?;

        let token = self
            .tokens
            .issue_forget_password_token(&user.identity())
            .context("issue forget password token")?;
        log_mail_failure(
            self.mail.send_forget_password_mail(&user, &token).await,
            &user,
            "forget_password",
        );
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository> ResetPasswordUseCase<U> {
    pub async fn execute(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let identity = self
            .tokens
            .verify(token, TokenKind::ForgetPassword)
            .map_err(invalid_token(TokenKind::ForgetPassword))?;

        let user = self
            .users
            .find_by_id(identity.id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let hash = hash_password(new_password).context("hash password")?;
        // Deleted between the lookup and the write.
        if !self.users.update_password(user.id, &hash).await? {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

// ── VerifyEmail ──────────────────────────────────────────────────────────────

pub struct VerifyEmailUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository> VerifyEmailUseCase<U> {
    /// Mark the address verified and log the user in.
    pub async fn execute(&self, token: &str) -> Result<AuthTokens, ApiError> {
        let identity = self
            .tokens
            .verify(token, TokenKind::Register)
            .map_err(invalid_token(TokenKind::Register))?;

        let user = self
            .users
            .find_by_id(identity.id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if !user.is_verified() {
            self.users.mark_email_verified(user.id, Utc::now()).await?;
        }

        Ok(self
            .tokens
            .issue_login_token(&user.identity())
            .context("issue login token")?)
    }
}

// ── ResendEmail ──────────────────────────────────────────────────────────────

pub struct ResendEmailUseCase<U: UserRepository, M: MailSender> {
    pub users: U,
    pub mail: M,
    pub tokens: Arc<TokenService>,
}

impl<U: UserRepository, M: MailSender> ResendEmailUseCase<U, M> {
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .filter(|u| !u.is_verified())
            .ok_or(ApiError::UserNotFound)?;

        let token = self
            .tokens
            .issue_register_token(&user.identity())
            .context("issue register token")?;
        log_mail_failure(
            self.mail.send_register_mail(&user, &token).await,
            &user,
            "register",
        );
        Ok(())
    }
}

// ── SocialLogin ──────────────────────────────────────────────────────────────

pub struct SocialLoginUseCase<U: UserRepository, R: RoleRepository, S: SocialProfilePort> {
    pub users: U,
    pub roles: R,
    pub social: S,
    pub tokens: Arc<TokenService>,
    pub default_role: String,
}

impl<U, R, S> SocialLoginUseCase<U, R, S>
where
    U: UserRepository,
    R: RoleRepository,
    S: SocialProfilePort,
{
    pub async fn execute(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let profile = self.social.fetch_profile(provider, access_token).await?;

        let user = match self.users.find_by_social_id(provider, &profile.id).await? {
            Some(user) => user,
            None => {
                let email = normalize_email(&profile.email);
                // Never attach a provider identity to an existing local account.
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(ApiError::EmailAlreadyRegistered);
                }
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    username: profile.username,
                    email,
                    password: None,
                    email_verified_at: Some(now),
                    social_id: Some(profile.id),
                    social_type: Some(provider),
                    role: default_role(&self.roles, &self.default_role).await?,
                    created_at: now,
                    updated_at: now,
                };
                self.users.create(&user).await?;
                tracing::info!(user_id = %user.id, provider = provider.as_str(), "created social user");
                user
            }
        };

        Ok(self
            .tokens
            .issue_login_token(&user.identity())
            .context("issue login token")?)
    }
}
