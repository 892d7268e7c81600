//! Async Rust client for the 2D lotto betting platform API.
//!
//! [`LottoClient`] is a thin, typed wrapper over the platform's JSON/HTTP
//! endpoints: auth, slots, bids, results, wallet and profile. Session
//! cookies live in the client's jar; a rejected access token is refreshed
//! once per request before the error is surfaced.

pub mod auth;
pub mod bids;
pub mod client;
pub mod error;
pub mod models;
pub mod results;
pub mod slots;
pub mod transport;
pub mod wallet;

pub use client::LottoClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
