// SPDX-License-Identifier: MIT

//! Bank aggregator client (Plaid-style API).
//!
//! Used only to populate the single `current_balance` field of the
//! projection parameters. The balance is an opaque input: never computed
//! or validated here.

use crate::error::AppError;
use crate::models::BankTokens;
use crate::time_utils::format_utc_rfc3339;
use serde::Deserialize;

/// Bank aggregator API client.
#[derive(Clone)]
pub struct BankService {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

#[derive(Deserialize)]
struct LinkTokenResponse {
    link_token: String,
}

#[derive(Deserialize)]
struct ExchangeResponse {
    access_token: String,
    item_id: String,
}

#[derive(Deserialize)]
struct BalanceResponse {
    accounts: Vec<BankAccount>,
}

#[derive(Deserialize)]
struct BankAccount {
    balances: AccountBalances,
}

#[derive(Deserialize)]
struct AccountBalances {
    current: Option<f64>,
    available: Option<f64>,
}

impl BankService {
    pub fn new(base_url: String, client_id: String, secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            client_id,
            secret,
        }
    }

    /// Create a link token to start the client-side linking flow.
    pub async fn create_link_token(&self, user_id: &str) -> Result<String, AppError> {
        let body = serde_json::json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "client_name": "HSA Ledger",
            "user": { "client_user_id": user_id },
            "products": ["auth"],
            "country_codes": ["US"],
            "language": "en",
        });

        let response: LinkTokenResponse = self.post_json("/link/token/create", &body).await?;
        Ok(response.link_token)
    }

    /// Exchange the public token from the client flow for an access token.
    pub async fn exchange_public_token(&self, public_token: &str) -> Result<BankTokens, AppError> {
        let body = serde_json::json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "public_token": public_token,
        });

        let response: ExchangeResponse =
            self.post_json("/item/public_token/exchange", &body).await?;

        Ok(BankTokens {
            access_token: response.access_token,
            item_id: response.item_id,
            linked_at: format_utc_rfc3339(chrono::Utc::now()),
        })
    }

    /// Fetch the current balance across the linked item's accounts.
    pub async fn fetch_balance(&self, access_token: &str) -> Result<f64, AppError> {
        let body = serde_json::json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "access_token": access_token,
        });

        let response: BalanceResponse = self.post_json("/accounts/balance/get", &body).await?;

        let balance = response
            .accounts
            .iter()
            .filter_map(|a| a.balances.current.or(a.balances.available))
            .sum();

        Ok(balance)
    }

    /// Generic POST with JSON request and response.
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::BankLink(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::BankLink(format!("HTTP {}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::BankLink(format!("Invalid response body: {}", e)))
    }
}
