use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use warden_auth_types::token::{AuthTokens, has_jwt_shape};
use warden_core::validation::{FieldErrors, Validate};
use warden_domain::user::SocialProvider;

use crate::domain::types::USERNAME_MAX_LEN;
use crate::error::ApiError;
use crate::handlers::extract::ValidatedJson;
use crate::state::AppState;
use crate::usecase::auth::{
    ForgetPasswordUseCase, LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterInput,
    RegisterUseCase, ResendEmailUseCase, ResetPasswordUseCase, SocialLoginUseCase,
    VerifyEmailUseCase,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .length("username", &self.username, 1, USERNAME_MAX_LEN)
            .email("email", &self.email)
            .password("password", &self.password)
            .matches(
                "confirmPassword",
                &self.confirm_password,
                "password",
                &self.password,
            );
        errors.into_result()
    }
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        mail: state.mail_sender(),
        tokens: state.tokens.clone(),
        default_role: state.config.default_role.clone(),
    };
    usecase
        .execute(RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, MessageResponse::new("Registration Success")))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .email("email", &self.email)
            .password("password", &self.password);
        errors.into_result()
    }
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, Json<AuthTokens>), ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let tokens = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

// ── POST /auth/refresh-token ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !has_jwt_shape(&self.refresh_token) {
            errors.add("refreshToken", "refreshToken must be a jwt string");
        }
        errors.into_result()
    }
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshTokenRequest>,
) -> Result<(StatusCode, Json<AuthTokens>), ApiError> {
    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let tokens = usecase.execute(&body.refresh_token).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

// ── POST /auth/forget-password, POST /auth/resend-email ──────────────────────

#[derive(Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

impl Validate for EmailRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.email("email", &self.email);
        errors.into_result()
    }
}

pub async fn forget_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<EmailRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let usecase = ForgetPasswordUseCase {
        users: state.user_repo(),
        mail: state.mail_sender(),
        tokens: state.tokens.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok((StatusCode::CREATED, MessageResponse::new("Email sent successfully")))
}

pub async fn resend_email(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<EmailRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let usecase = ResendEmailUseCase {
        users: state.user_repo(),
        mail: state.mail_sender(),
        tokens: state.tokens.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok((StatusCode::CREATED, MessageResponse::new("Resend email success")))
}

// ── PUT /auth/reset-password/{token} ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.password("password", &self.password).matches(
            "confirmPassword",
            &self.confirm_password,
            "password",
            &self.password,
        );
        errors.into_result()
    }
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(body): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    usecase.execute(&token, &body.password).await?;
    Ok(MessageResponse::new("Password has been updated"))
}

// ── POST /auth/verify-email/{token} ──────────────────────────────────────────

pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<AuthTokens>), ApiError> {
    let usecase = VerifyEmailUseCase {
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let tokens = usecase.execute(&token).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

// ── POST /auth/google/login ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SocialLoginRequest {
    pub token: String,
}

impl Validate for SocialLoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.token.trim().is_empty() {
            errors.add("token", "token should not be empty");
        }
        errors.into_result()
    }
}

pub async fn google_login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SocialLoginRequest>,
) -> Result<(StatusCode, Json<AuthTokens>), ApiError> {
    let usecase = SocialLoginUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        social: state.social.clone(),
        tokens: state.tokens.clone(),
        default_role: state.config.default_role.clone(),
    };
    let tokens = usecase
        .execute(SocialProvider::Google, body.token.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}
