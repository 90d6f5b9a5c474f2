use anyhow::Context as _;
use serde::Deserialize;

use warden_domain::user::SocialProvider;

use crate::domain::repository::SocialProfilePort;
use crate::domain::types::{SocialProfile, USERNAME_MAX_LEN};
use crate::error::ApiError;

/// OpenID Connect userinfo response (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
}

impl GoogleUserInfo {
    pub fn into_profile(self) -> SocialProfile {
        let username = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_owned());
        SocialProfile {
            id: self.sub,
            email: self.email,
            username: username.trim().chars().take(USERNAME_MAX_LEN).collect(),
        }
    }
}

/// Resolves provider access tokens over HTTP.
#[derive(Clone)]
pub struct HttpSocialProfileClient {
    pub client: reqwest::Client,
    pub google_userinfo_url: String,
}

impl HttpSocialProfileClient {
    pub fn new(google_userinfo_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            google_userinfo_url,
        }
    }
}

impl SocialProfilePort for HttpSocialProfileClient {
    async fn fetch_profile(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> Result<SocialProfile, ApiError> {
        match provider {
            SocialProvider::Google => {
                let response = self
                    .client
                    .get(&self.google_userinfo_url)
                    .bearer_auth(access_token)
                    .send()
                    .await
                    .context("request google userinfo")?;
                if !response.status().is_success() {
                    tracing::debug!(status = %response.status(), "google rejected access token");
                    return Err(ApiError::Unauthorized);
                }
                let info: GoogleUserInfo = response
                    .json()
                    .await
                    .context("decode google userinfo")?;
                Ok(info.into_profile())
            }
        }
    }
}
