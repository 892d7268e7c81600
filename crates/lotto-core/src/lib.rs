//! Domain logic between `lotto-api` and the `lotto` CLI.
//!
//! - **[`BidCart`]**: session-local wager cart with two parallel entry
//!   lists (Lucky Draw, Jackpot) partitioned by date and slot time, a
//!   typed form model ([`FieldUpdate`]) and batch `#`-list parsing.
//!
//! - **[`submit_partition`]**: the submission reconciler, with one create-bid
//!   call per entry, strictly sequential, clearing the partition only on
//!   full success and marking accepted entries so retries never place
//!   the same bid twice.
//!
//! - **[`slot_select`]**: pure date and slot auto-selection over a
//!   [`SlotBoard`].
//!
//! - **[`timers`]**: countdown formatting and the [`ResultWatcher`]
//!   background poller.
//!
//! - **[`Platform`]**: facade over the API client owning the explicit
//!   [`Session`]; implements [`BidSink`] and [`ResultSource`].

pub mod cart;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod session;
pub mod slot_select;
pub mod submit;
pub mod timers;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cart::{BidCart, CartError, FieldUpdate, FormField, SlotTarget, ValidationError};
pub use config::{MYT_OFFSET_SECS, PlatformConfig, TlsVerification, myt};
pub use error::CoreError;
pub use model::{
    CartEntry, Customer, DrawResult, EntryId, EntryStatus, PartitionKey, ProductType, Slot,
    SlotStatus, Wager, winning_display,
};
pub use platform::{DayResults, Platform};
pub use session::{Session, SessionUser};
pub use slot_select::{SelectionState, SlotBoard, is_slot_disabled, select_slot};
pub use submit::{BidSink, EntryOutcome, SubmissionReport, submit_partition};
pub use timers::{ResultSource, ResultWatcher, countdown, minutes_until};

// Wire records surfaced unchanged by `Platform`.
pub use lotto_api::models::{
    BidPage, BidRecord, DeviceSession, UserInfo, WalletBalance, WalletHistoryPage,
    WalletTransaction, WalletTransferRequest,
};
