// Wallet and profile endpoints

use tracing::debug;

use crate::client::LottoClient;
use crate::error::Error;
use crate::models::{UserInfo, WalletBalance, WalletHistoryPage, WalletTransferRequest};

impl LottoClient {
    /// `GET wallet/balance`
    pub async fn wallet_balance(&self) -> Result<WalletBalance, Error> {
        self.get("wallet/balance").await
    }

    /// `GET wallet/history?page=&pageSize=`
    pub async fn wallet_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<WalletHistoryPage, Error> {
        self.get_with_params(
            "wallet/history",
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }

    /// Ask an admin to credit a deposit. `POST wallet/deposit/request`
    pub async fn request_deposit(
        &self,
        req: &WalletTransferRequest,
    ) -> Result<serde_json::Value, Error> {
        debug!(amount = req.amount, trans_id = %req.trans_id, "requesting deposit");
        self.post("wallet/deposit/request", req).await
    }

    /// Record a winning paid out to a customer. `POST wallet/agent/win/settle-to-user`
    pub async fn settle_winning_to_user(
        &self,
        req: &WalletTransferRequest,
    ) -> Result<serde_json::Value, Error> {
        debug!(amount = req.amount, trans_id = %req.trans_id, "settling winning to user");
        self.post("wallet/agent/win/settle-to-user", req).await
    }

    /// The signed-in user's profile. `GET user/me`
    pub async fn my_profile(&self) -> Result<UserInfo, Error> {
        self.get("user/me").await
    }
}
