use std::sync::Arc;

use warden_api::domain::access::{Operation, RoutePolicy, build_registry};
use warden_api::error::ApiError;
use warden_api::usecase::authorize::AuthorizeUseCase;
use warden_auth_types::token::{TokenKind, TokenService, now_secs};
use warden_testing::auth::MockAuth;

use crate::helpers::{MockUserRepo, test_role, test_user, tokens};

fn guard(users: MockUserRepo, tokens: Arc<TokenService>) -> AuthorizeUseCase<MockUserRepo> {
    AuthorizeUseCase {
        users,
        tokens,
        registry: Arc::new(build_registry()),
        policy: Arc::new(RoutePolicy::standard()),
    }
}

fn access_token(tokens: &TokenService, user: &warden_api::domain::types::User) -> String {
    MockAuth::new(user.id, &user.username, &user.email).token(tokens, TokenKind::Access)
}

#[tokio::test]
async fn should_pass_public_operation_without_token() {
    let uc = guard(MockUserRepo::empty(), tokens());
    let result = uc.execute(None, Operation::Login).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn should_reject_protected_operation_without_token() {
    let uc = guard(MockUserRepo::empty(), tokens());
    assert!(matches!(
        uc.execute(None, Operation::GetProfile).await,
        Err(ApiError::Unauthorized)
    ));
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let uc = guard(MockUserRepo::empty(), tokens());
    assert!(matches!(
        uc.execute(Some("garbage"), Operation::GetProfile).await,
        Err(ApiError::InvalidToken)
    ));
}

#[tokio::test]
async fn should_reject_refresh_token_as_access_token() {
    let user = test_user("a@example.com", Some(test_role("user")));
    let tokens = tokens();
    let refresh = MockAuth::new(user.id, &user.username, &user.email)
        .token(&tokens, TokenKind::Refresh);

    let uc = guard(MockUserRepo::new(vec![user]), tokens);
    assert!(matches!(
        uc.execute(Some(&refresh), Operation::GetProfile).await,
        Err(ApiError::InvalidToken)
    ));
}

#[tokio::test]
async fn should_reject_expired_access_token() {
    let user = test_user("b@example.com", Some(test_role("user")));
    let tokens = tokens();
    let issued_at = now_secs() - tokens.ttl(TokenKind::Access) - 1;
    let expired = tokens
        .issue(TokenKind::Access, &user.identity(), issued_at)
        .unwrap();

    let uc = guard(MockUserRepo::new(vec![user]), tokens);
    assert!(matches!(
        uc.execute(Some(&expired), Operation::GetProfile).await,
        Err(ApiError::InvalidToken)
    ));
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() {
    let user = test_user("c@example.com", Some(test_role("admin")));
    let tokens = tokens();
    let token = access_token(&tokens, &user);

    let uc = guard(MockUserRepo::empty(), tokens);
    assert!(matches!(
        uc.execute(Some(&token), Operation::GetProfile).await,
        Err(ApiError::Unauthorized)
    ));
}

#[tokio::test]
async fn should_forbid_user_role_from_admin_operation() {
    let user = test_user("d@example.com", Some(test_role("user")));
    let tokens = tokens();
    let token = access_token(&tokens, &user);

    let uc = guard(MockUserRepo::new(vec![user]), tokens);
    assert!(matches!(
        uc.execute(Some(&token), Operation::ListUsers).await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn should_forbid_user_without_role() {
    let user = test_user("e@example.com", None);
    let tokens = tokens();
    let token = access_token(&tokens, &user);

    let uc = guard(MockUserRepo::new(vec![user]), tokens);
    assert!(matches!(
        uc.execute(Some(&token), Operation::GetProfile).await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn should_allow_user_role_to_read_own_profile() {
    let user = test_user("f@example.com", Some(test_role("user")));
    let tokens = tokens();
    let token = access_token(&tokens, &user);

    let uc = guard(MockUserRepo::new(vec![user.clone()]), tokens);
    let resolved = uc
        .execute(Some(&token), Operation::GetProfile)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn should_allow_admin_every_protected_operation() {
    let admin = test_user("admin@example.com", Some(test_role("admin")));
    let tokens = tokens();
    let token = access_token(&tokens, &admin);
    let uc = guard(MockUserRepo::new(vec![admin]), tokens);

    for op in [
        Operation::ListUsers,
        Operation::GetUser,
        Operation::DeleteUser,
        Operation::CreateRole,
        Operation::UpdateRole,
        Operation::DeleteRole,
        Operation::ListPermissions,
        Operation::GetPermission,
    ] {
        assert!(
            uc.execute(Some(&token), op).await.unwrap().is_some(),
            "admin denied {op:?}"
        );
    }
}

#[tokio::test]
async fn should_apply_role_change_to_existing_token() {
    let user = test_user("g@example.com", Some(test_role("user")));
    let users = MockUserRepo::new(vec![user.clone()]);
    let tokens = tokens();
    let token = access_token(&tokens, &user);
    let uc = guard(users.clone(), tokens);

    assert!(matches!(
        uc.execute(Some(&token), Operation::ListUsers).await,
        Err(ApiError::Forbidden)
    ));

    users
        .users_handle()
        .lock()
        .unwrap()
        .iter_mut()
        .for_each(|u| u.role = Some(test_role("admin")));

    assert!(uc
        .execute(Some(&token), Operation::ListUsers)
        .await
        .unwrap()
        .is_some());
}
