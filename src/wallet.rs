//! Thin wallet endpoint wrappers over [`ApiSession`].

use serde::de::DeserializeOwned;
use serde_json::json;
use urlencoding::encode;

use crate::{ApiSession, errors::Error, types::ApiResponse};

pub struct WalletApi<'a> {
    session: &'a ApiSession,
}

impl<'a> WalletApi<'a> {
    pub fn new(session: &'a ApiSession) -> Self {
        Self { session }
    }

    pub async fn create_wallet<T: DeserializeOwned>(&self) -> Result<ApiResponse<T>, Error> {
        self.session.post("v1/wallet/new", &json!({})).await
    }

    pub async fn get_wallet_balance<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .get(&format!("v1/wallet/{}/balance", encode(wallet_id)))
            .await
    }

    pub async fn get_wallet_transactions<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .get(&format!("v1/wallet/{}/transactions", encode(wallet_id)))
            .await
    }

    pub async fn add_credits<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
        amount: u64,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .post(
                &format!("v1/wallet/{}/add_credits", encode(wallet_id)),
                &json!({ "amount": amount }),
            )
            .await
    }

    pub async fn use_tokens<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
        report_id: &str,
        tokens: u64,
        api_type: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .post(
                &format!("v1/{}/use_tokens", encode(wallet_id)),
                &json!({ "report_id": report_id, "tokens": tokens, "api_type": api_type }),
            )
            .await
    }

    pub async fn generate_wallet_bill<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .get(&format!("v1/wallet/{}/bill", encode(wallet_id)))
            .await
    }

    pub async fn relate_wallet_to_user<T: DeserializeOwned>(
        &self,
        wallet_id: &str,
        user_id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.session
            .post(
                &format!(
                    "v1/wallet/{}/relate_user/{}",
                    encode(wallet_id),
                    encode(user_id)
                ),
                &json!({}),
            )
            .await
    }
}
