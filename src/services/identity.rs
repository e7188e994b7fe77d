// SPDX-License-Identifier: MIT

//! Google OAuth client for sign-in.
//!
//! Handles the authorization-code exchange and userinfo fetch. Session
//! management (JWT) lives in the auth middleware; this service only
//! talks to the identity provider.

use crate::error::AppError;
use serde::Deserialize;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth client.
#[derive(Clone)]
pub struct IdentityService {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

/// Verified identity returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Stable subject identifier
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl IdentityService {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
        }
    }

    /// Build the authorization URL the browser is redirected to.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            GOOGLE_AUTH_URL,
            self.client_id,
            urlencoding::encode(redirect_uri),
            state
        )
    }

    /// Exchange an authorization code for the user's identity.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("Token exchange failed: {}", e)))?;

        let token: TokenResponse = check_response_json(response).await?;

        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("Userinfo fetch failed: {}", e)))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::IdentityProvider(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::IdentityProvider(format!("Invalid response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_encodes_redirect() {
        let service = IdentityService::new("client-123".to_string(), "secret".to_string());
        let url = service.authorize_url("https://api.example.com/auth/google/callback", "st4te");

        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapi.example.com%2Fauth%2Fgoogle%2Fcallback"));
        assert!(url.contains("state=st4te"));
        assert!(url.contains("scope=openid%20email%20profile"));
    }
}
