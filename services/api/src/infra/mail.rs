use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::MailSender;
use crate::domain::types::{FORGET_PASSWORD_MAIL_EVENT, OutboxEvent, REGISTER_MAIL_EVENT, User};
use crate::error::ApiError;
use crate::infra::db::insert_outbox_event;

/// Frontend routes embedded in outgoing mail.
#[derive(Debug, Clone)]
pub struct MailLinks {
    pub web_url: String,
    pub verify_route: String,
    pub forget_password_route: String,
}

impl MailLinks {
    pub fn verify_link(&self, token: &str) -> String {
        join_link(&self.web_url, &self.verify_route, token)
    }

    pub fn forget_password_link(&self, token: &str) -> String {
        join_link(&self.web_url, &self.forget_password_route, token)
    }
}

fn join_link(base: &str, route: &str, token: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        route.trim_matches('/'),
        token
    )
}

/// Build the outbox event for a mail of `kind` addressed to `user`.
pub fn mail_event(kind: &str, user: &User, link: String) -> OutboxEvent {
    let id = Uuid::new_v4();
    OutboxEvent {
        id,
        kind: kind.to_owned(),
        payload: json!({
            "email": user.email,
            "username": user.username,
            "link": link,
        }),
        idempotency_key: format!("{kind}:{id}"),
    }
}

/// Mail sender that queues delivery requests in `outbox_events`.
/// An external worker renders and sends them.
#[derive(Clone)]
pub struct OutboxMailSender {
    pub db: DatabaseConnection,
    pub links: MailLinks,
}

impl MailSender for OutboxMailSender {
    async fn send_register_mail(&self, user: &User, token: &str) -> Result<(), ApiError> {
        let event = mail_event(REGISTER_MAIL_EVENT, user, self.links.verify_link(token));
        insert_outbox_event(&self.db, &event).await
    }

    async fn send_forget_password_mail(&self, user: &User, token: &str) -> Result<(), ApiError> {
        let event = mail_event(
            FORGET_PASSWORD_MAIL_EVENT,
            user,
            self.links.forget_password_link(token),
        );
        insert_outbox_event(&self.db, &event).await
    }
}
