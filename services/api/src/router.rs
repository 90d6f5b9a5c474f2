use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};

use warden_core::health::{healthz, readiness};
use warden_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::domain::access::Operation;
use crate::handlers::{
    auth::{
        forget_password, google_login, login, refresh_token, register, resend_email,
        reset_password, verify_email,
    },
    guard::{GuardState, authorize},
    permission::{get_permission, list_permissions},
    role::{create_role, delete_role, get_role, list_roles, update_role},
    user::{delete_user, get_profile, get_user, list_users, update_profile},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    let app = state.clone();
    let guarded = move |op: Operation| {
        from_fn_with_state(
            GuardState {
                app: app.clone(),
                op,
            },
            authorize,
        )
    };

    let api = Router::new()
        // Auth
        .route(
            "/auth/register",
            post(register).route_layer(guarded(Operation::Register)),
        )
        .route(
            "/auth/login",
            post(login).route_layer(guarded(Operation::Login)),
        )
        .route(
            "/auth/refresh-token",
            post(refresh_token).route_layer(guarded(Operation::RefreshToken)),
        )
        .route(
            "/auth/forget-password",
            post(forget_password).route_layer(guarded(Operation::ForgetPassword)),
        )
        .route(
            "/auth/reset-password/{token}",
            put(reset_password).route_layer(guarded(Operation::ResetPassword)),
        )
        .route(
            "/auth/verify-email/{token}",
            post(verify_email).route_layer(guarded(Operation::VerifyEmail)),
        )
        .route(
            "/auth/resend-email",
            post(resend_email).route_layer(guarded(Operation::ResendEmail)),
        )
        .route(
            "/auth/google/login",
            post(google_login).route_layer(guarded(Operation::GoogleLogin)),
        )
        // Users
        .route(
            "/users",
            get(list_users).route_layer(guarded(Operation::ListUsers)),
        )
        .route(
            "/users/profile",
            get(get_profile).route_layer(guarded(Operation::GetProfile)),
        )
        .route(
            "/users/update-profile",
            patch(update_profile).route_layer(guarded(Operation::UpdateProfile)),
        )
        .route(
            "/users/{id}",
            get(get_user).route_layer(guarded(Operation::GetUser)),
        )
        .route(
            "/users/{id}",
            delete(delete_user).route_layer(guarded(Operation::DeleteUser)),
        )
        // Roles
        .route(
            "/roles",
            get(list_roles).route_layer(guarded(Operation::ListRoles)),
        )
        .route(
            "/roles",
            post(create_role).route_layer(guarded(Operation::CreateRole)),
        )
        .route(
            "/roles/{id}",
            get(get_role).route_layer(guarded(Operation::GetRole)),
        )
        .route(
            "/roles/{id}",
            patch(update_role).route_layer(guarded(Operation::UpdateRole)),
        )
        .route(
            "/roles/{id}",
            delete(delete_role).route_layer(guarded(Operation::DeleteRole)),
        )
        // Permissions
        .route(
            "/permissions",
            get(list_permissions).route_layer(guarded(Operation::ListPermissions)),
        )
        .route(
            "/permissions/{id}",
            get(get_permission).route_layer(guarded(Operation::GetPermission)),
        );

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
