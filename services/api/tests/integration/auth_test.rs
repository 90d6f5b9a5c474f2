use warden_api::domain::types::SocialProfile;
use warden_api::error::ApiError;
use warden_api::usecase::auth::{
    ForgetPasswordUseCase, LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterInput,
    RegisterUseCase, ResendEmailUseCase, ResetPasswordUseCase, SocialLoginUseCase,
    VerifyEmailUseCase,
};
use warden_auth_types::token::TokenKind;
use warden_core::password::verify_password;
use warden_domain::user::SocialProvider;
use warden_testing::auth::MockAuth;

use crate::helpers::{
    MailKind, MockMailSender, MockRoleRepo, MockSocialPort, MockUserRepo, TEST_PASSWORD,
    test_role, test_user, tokens, unverified,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        username: "alice".to_owned(),
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_unverified_user_with_default_role_and_send_mail() {
    let users = MockUserRepo::empty();
    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let tokens = tokens();

    let uc = RegisterUseCase {
        users: users.clone(),
        roles: MockRoleRepo::new(vec![test_role("user")]),
        mail,
        tokens: tokens.clone(),
        default_role: "user".to_owned(),
    };
    let user = uc.execute(register_input("Alice@Example.com")).await.unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert!(!user.is_verified());
    assert_eq!(user.role_name(), Some("user"));
    let stored = users.get(user.id).unwrap();
    assert_ne!(stored.password.as_deref(), Some(TEST_PASSWORD));
    assert!(verify_password(TEST_PASSWORD, stored.password.as_deref().unwrap()));

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, MailKind::Register);
    let identity = tokens.verify(&sent[0].token, TokenKind::Register).unwrap();
    assert_eq!(identity.id, user.id);
}

#[tokio::test]
async fn should_reject_register_with_taken_email() {
    let existing = test_user("alice@example.com", None);
    let uc = RegisterUseCase {
        users: MockUserRepo::new(vec![existing]),
        roles: MockRoleRepo::empty(),
        mail: MockMailSender::new(),
        tokens: tokens(),
        default_role: "user".to_owned(),
    };

    let result = uc.execute(register_input("ALICE@example.com")).await;
    assert!(
        matches!(result, Err(ApiError::EmailAlreadyRegistered)),
        "expected EmailAlreadyRegistered, got {result:?}"
    );
}

#[tokio::test]
async fn should_register_even_when_mail_fails() {
    let users = MockUserRepo::empty();
    let uc = RegisterUseCase {
        users: users.clone(),
        roles: MockRoleRepo::empty(),
        mail: MockMailSender::failing(),
        tokens: tokens(),
        default_role: "user".to_owned(),
    };

    let user = uc.execute(register_input("bob@example.com")).await.unwrap();
    assert!(users.get(user.id).is_some());
    // Default role missing from the store: user is created without one.
    assert!(user.role.is_none());
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_after_register() {
    let users = MockUserRepo::empty();
    let tokens = tokens();
    let register = RegisterUseCase {
        users: users.clone(),
        roles: MockRoleRepo::empty(),
        mail: MockMailSender::new(),
        tokens: tokens.clone(),
        default_role: "user".to_owned(),
    };
    let user = register.execute(register_input("carol@example.com")).await.unwrap();

    let login = LoginUseCase {
        users,
        tokens: tokens.clone(),
    };
    let pair = login
        .execute(LoginInput {
            email: " Carol@Example.com ".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let access = tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
    let refresh = tokens.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
    assert_eq!(access.id, user.id);
    assert_eq!(refresh.id, user.id);
    assert_eq!(access.email, "carol@example.com");
}

#[tokio::test]
async fn should_reject_login_with_wrong_password() {
    let user = test_user("dave@example.com", None);
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        tokens: tokens(),
    };

    let result = uc
        .execute(LoginInput {
            email: "dave@example.com".to_owned(),
            password: "wrong-password".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_login_for_unknown_email() {
    let uc = LoginUseCase {
        users: MockUserRepo::empty(),
        tokens: tokens(),
    };

    let result = uc
        .execute(LoginInput {
            email: "ghost@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_reject_password_login_for_social_account() {
    let mut user = test_user("erin@example.com", None);
    user.password = None;
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        tokens: tokens(),
    };

    let result = uc
        .execute(LoginInput {
            email: "erin@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_with_refresh_token() {
    let user = test_user("frank@example.com", None);
    let tokens = tokens();
    let refresh = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Refresh);

    let uc = RefreshTokenUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        tokens: tokens.clone(),
    };
    let pair = uc.execute(&refresh).await.unwrap();
    let access = tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
    assert_eq!(access.id, user.id);
}

#[tokio::test]
async fn should_reject_access_token_as_refresh_token() {
    let user = test_user("grace@example.com", None);
    let tokens = tokens();
    let access = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Access);

    let uc = RefreshTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        tokens,
    };
    let result = uc.execute(&access).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_refresh_for_deleted_user() {
    let user = test_user("heidi@example.com", None);
    let tokens = tokens();
    let refresh = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Refresh);

    let uc = RefreshTokenUseCase {
        users: MockUserRepo::empty(),
        tokens,
    };
    assert!(matches!(
        uc.execute(&refresh).await,
        Err(ApiError::InvalidToken)
    ));
}

// ── ForgetPassword / ResetPassword ───────────────────────────────────────────

#[tokio::test]
async fn should_reject_forget_password_for_unknown_email() {
    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let uc = ForgetPasswordUseCase {
        users: MockUserRepo::empty(),
        mail,
        tokens: tokens(),
    };

    let result = uc.execute("ghost@example.com").await;
    assert!(matches!(result, Err(ApiError::EmailNotRegistered)));
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_send_exactly_one_reset_mail_carrying_identity() {
    let user = test_user("ivan@example.com", None);
    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let tokens = tokens();
    let uc = ForgetPasswordUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        mail,
        tokens: tokens.clone(),
    };

    uc.execute("IVAN@example.com").await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, MailKind::ForgetPassword);
    assert_eq!(sent[0].email, user.email);
    let identity = tokens
        .verify(&sent[0].token, TokenKind::ForgetPassword)
        .unwrap();
    assert_eq!(identity.id, user.id);
    assert_eq!(identity.username, user.username);
}

#[tokio::test]
async fn should_reset_password_with_forget_password_token() {
    let user = test_user("judy@example.com", None);
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = tokens();
    let token = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::ForgetPassword);

    let uc = ResetPasswordUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
    };
    uc.execute(&token, "brand-new-password").await.unwrap();

    let stored = users.get(user.id).unwrap();
    assert!(verify_password(
        "brand-new-password",
        stored.password.as_deref().unwrap()
    ));

    let login = LoginUseCase { users, tokens };
    let old = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(old, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_reset_with_register_token() {
    let user = test_user("ken@example.com", None);
    let tokens = tokens();
    let token = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Register);

    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        tokens,
    };
    assert!(matches!(
        uc.execute(&token, "brand-new-password").await,
        Err(ApiError::InvalidToken)
    ));
}

#[tokio::test]
async fn should_report_missing_user_when_deleted_during_reset() {
    let user = test_user("leo@example.com", None);
    let users = MockUserRepo::new(vec![user.clone()]).deleting_before_write();
    let tokens = tokens();
    let token = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::ForgetPassword);

    let uc = ResetPasswordUseCase { users, tokens };
    let result = uc.execute(&token, "brand-new-password").await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

// ── VerifyEmail / ResendEmail ────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_email_and_issue_login_tokens() {
    let user = unverified(test_user("liam@example.com", None));
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = tokens();
    let token = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Register);

    let uc = VerifyEmailUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
    };
    let pair = uc.execute(&token).await.unwrap();

    assert!(users.get(user.id).unwrap().is_verified());
    assert_eq!(
        tokens
            .verify(&pair.access_token, TokenKind::Access)
            .unwrap()
            .id,
        user.id
    );
}

#[tokio::test]
async fn should_keep_first_verification_time_on_second_verify() {
    let user = test_user("mia@example.com", None);
    let verified_at = user.email_verified_at;
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = tokens();
    let token = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Register);

    let uc = VerifyEmailUseCase {
        users: users.clone(),
        tokens,
    };
    uc.execute(&token).await.unwrap();
    assert_eq!(users.get(user.id).unwrap().email_verified_at, verified_at);
}

#[tokio::test]
async fn should_reject_verify_with_garbage_token() {
    let uc = VerifyEmailUseCase {
        users: MockUserRepo::empty(),
        tokens: tokens(),
    };
    assert!(matches!(
        uc.execute("not-a-jwt").await,
        Err(ApiError::InvalidToken)
    ));
}

#[tokio::test]
async fn should_resend_register_mail_to_unverified_user() {
    let user = unverified(test_user("noah@example.com", None));
    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let uc = ResendEmailUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        mail,
        tokens: tokens(),
    };

    uc.execute("noah@example.com").await.unwrap();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_id, user.id);
    assert_eq!(sent[0].kind, MailKind::Register);
}

#[tokio::test]
async fn should_not_resend_to_verified_user() {
    let user = test_user("olivia@example.com", None);
    let mail = MockMailSender::new();
    let sent = mail.sent_handle();
    let uc = ResendEmailUseCase {
        users: MockUserRepo::new(vec![user]),
        mail,
        tokens: tokens(),
    };

    assert!(matches!(
        uc.execute("olivia@example.com").await,
        Err(ApiError::UserNotFound)
    ));
    assert!(sent.lock().unwrap().is_empty());
}

// ── SocialLogin ──────────────────────────────────────────────────────────────

fn google_profile(email: &str) -> SocialProfile {
    SocialProfile {
        id: "google-123".to_owned(),
        email: email.to_owned(),
        username: "Peggy".to_owned(),
    }
}

#[tokio::test]
async fn should_create_verified_user_on_first_social_login() {
    let users = MockUserRepo::empty();
    let tokens = tokens();
    let uc = SocialLoginUseCase {
        users: users.clone(),
        roles: MockRoleRepo::new(vec![test_role("user")]),
        social: MockSocialPort {
            profile: Some(google_profile("Peggy@Example.com")),
        },
        tokens: tokens.clone(),
        default_role: "user".to_owned(),
    };

    let pair = uc.execute(SocialProvider::Google, "google-access").await.unwrap();
    let identity = tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
    let stored = users.get(identity.id).unwrap();
    assert_eq!(stored.email, "peggy@example.com");
    assert!(stored.is_verified());
    assert!(stored.password.is_none());
    assert_eq!(stored.social_type, Some(SocialProvider::Google));
    assert_eq!(stored.social_id.as_deref(), Some("google-123"));
    assert_eq!(stored.role_name(), Some("user"));
}

#[tokio::test]
async fn should_reuse_account_on_repeat_social_login() {
    let users = MockUserRepo::empty();
    let uc = SocialLoginUseCase {
        users: users.clone(),
        roles: MockRoleRepo::empty(),
        social: MockSocialPort {
            profile: Some(google_profile("quinn@example.com")),
        },
        tokens: tokens(),
        default_role: "user".to_owned(),
    };

    uc.execute(SocialProvider::Google, "t1").await.unwrap();
    uc.execute(SocialProvider::Google, "t2").await.unwrap();
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_social_login_when_email_belongs_to_local_account() {
    let local = test_user("rita@example.com", None);
    let uc = SocialLoginUseCase {
        users: MockUserRepo::new(vec![local]),
        roles: MockRoleRepo::empty(),
        social: MockSocialPort {
            profile: Some(google_profile("rita@example.com")),
        },
        tokens: tokens(),
        default_role: "user".to_owned(),
    };

    assert!(matches!(
        uc.execute(SocialProvider::Google, "token").await,
        Err(ApiError::EmailAlreadyRegistered)
    ));
}

#[tokio::test]
async fn should_reject_social_login_with_rejected_provider_token() {
    let uc = SocialLoginUseCase {
        users: MockUserRepo::empty(),
        roles: MockRoleRepo::empty(),
        social: MockSocialPort { profile: None },
        tokens: tokens(),
        default_role: "user".to_owned(),
    };

    assert!(matches!(
        uc.execute(SocialProvider::Google, "bad").await,
        Err(ApiError::Unauthorized)
    ));
}
