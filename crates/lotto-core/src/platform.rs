// ── Platform facade ──
//
// One signed-in connection to the lotto platform. Wraps the API client,
// owns the `Session`, and converts wire types into domain types. The
// cart never talks to the network directly; it goes through the
// `BidSink` impl here.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use lotto_api::models::{
    BidPage, BidRecord, CreateBidRequest, DeviceSession, UserInfo, WalletBalance,
    WalletHistoryPage, WalletTransferRequest,
};
use lotto_api::{LottoClient, TlsMode, TransportConfig};

use crate::config::{PlatformConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::DrawResult;
use crate::session::{Session, SessionUser};
use crate::slot_select::SlotBoard;
use crate::submit::BidSink;
use crate::timers::ResultSource;

/// Results for one local day, split by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DayResults {
    pub date: String,
    pub lucky_draw: Vec<DrawResult>,
    pub jackpot: Vec<DrawResult>,
}

pub struct Platform {
    config: PlatformConfig,
    client: LottoClient,
    session: Session,
}

impl Platform {
    pub fn new(config: PlatformConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: config.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar();
        let client = LottoClient::new(&config.url, &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (tests, custom transports).
    pub fn with_client(config: PlatformConfig, client: LottoClient) -> Self {
        Self {
            config,
            client,
            session: Session::default(),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn client(&self) -> &LottoClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Sign in and load the session.
    pub async fn connect(&mut self) -> Result<&SessionUser, CoreError> {
        info!(url = %self.config.url, phone = %self.config.phone, "signing in");
        let login = self
            .client
            .login(&self.config.phone, &self.config.password)
            .await?;
        self.session.load(login);
        self.session
            .user()
            .ok_or_else(|| CoreError::Internal("login returned no user".into()))
    }

    /// Sign out. The session is cleared even when the server call fails.
    pub async fn disconnect(&mut self) -> Result<(), CoreError> {
        let result = self.client.logout().await;
        self.session.clear();
        match result {
            Ok(()) => {
                info!("signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout call failed; local session cleared anyway");
                Err(e.into())
            }
        }
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Local calendar date of `at` on the platform clock.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.config.utc_offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    // ── Slots ────────────────────────────────────────────────────────

    pub async fn slot_board(&self) -> Result<SlotBoard, CoreError> {
        let grouped = self.client.slots_grouped_by_date().await?;
        debug!(dates = grouped.len(), "slot listing loaded");
        Ok(SlotBoard::from_grouped(grouped))
    }

    // ── Bids ─────────────────────────────────────────────────────────

    pub async fn my_bids(&self, page: u32, page_size: u32) -> Result<BidPage, CoreError> {
        Ok(self.client.my_bids(page, page_size).await?)
    }

    // ── Results ──────────────────────────────────────────────────────

    pub async fn results(&self) -> Result<Vec<DrawResult>, CoreError> {
        let results = self.client.list_results().await?;
        Ok(results.into_iter().map(DrawResult::from).collect())
    }

    pub async fn results_by_date(&self, date: Option<NaiveDate>) -> Result<DayResults, CoreError> {
        let key = date.map(|d| d.format("%Y-%m-%d").to_string());
        let day = self.client.results_by_date(key.as_deref()).await?;
        Ok(DayResults {
            date: day.date,
            lucky_draw: day.lucky_draw.into_iter().map(DrawResult::from).collect(),
            jackpot: day.jackpot.into_iter().map(DrawResult::from).collect(),
        })
    }

    pub async fn result_for_slot(&self, slot_id: &str) -> Result<DrawResult, CoreError> {
        match self.client.result_for_slot(slot_id).await {
            Ok(r) => Ok(r.into()),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity_type: "Result".into(),
                identifier: slot_id.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // ── Wallet & profile ─────────────────────────────────────────────

    pub async fn wallet_balance(&self) -> Result<WalletBalance, CoreError> {
        Ok(self.client.wallet_balance().await?)
    }

    pub async fn wallet_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<WalletHistoryPage, CoreError> {
        Ok(self.client.wallet_history(page, page_size).await?)
    }

    pub async fn request_deposit(&self, req: &WalletTransferRequest) -> Result<(), CoreError> {
        validate_transfer(req)?;
        self.client.request_deposit(req).await?;
        info!(amount = req.amount, trans_id = %req.trans_id, "deposit requested");
        Ok(())
    }

    pub async fn settle_winning(&self, req: &WalletTransferRequest) -> Result<(), CoreError> {
        validate_transfer(req)?;
        self.client.settle_winning_to_user(req).await?;
        info!(amount = req.amount, trans_id = %req.trans_id, "winning settled to user");
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserInfo, CoreError> {
        Ok(self.client.my_profile().await?)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn devices(&self) -> Result<Vec<DeviceSession>, CoreError> {
        Ok(self.client.list_devices().await?)
    }

    pub async fn revoke_device(&self, device_id: &str) -> Result<(), CoreError> {
        self.client.revoke_device(device_id).await?;
        info!(device_id, "device signed out");
        Ok(())
    }
}

fn validate_transfer(req: &WalletTransferRequest) -> Result<(), CoreError> {
    if !(req.amount.is_finite() && req.amount > 0.0) {
        return Err(CoreError::ValidationFailed {
            message: "amount must be greater than zero".into(),
        });
    }
    if req.trans_id.trim().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "transaction id is required".into(),
        });
    }
    Ok(())
}

impl BidSink for Platform {
    async fn create_bid(&self, req: &CreateBidRequest) -> Result<BidRecord, CoreError> {
        Ok(self.client.create_bid(req).await?)
    }
}

impl ResultSource for Platform {
    async fn fetch_results(&self) -> Result<Vec<DrawResult>, CoreError> {
        self.results().await
    }
}
