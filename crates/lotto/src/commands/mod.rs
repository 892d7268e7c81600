//! Command dispatch: bridges CLI args -> platform calls -> output formatting.

pub mod auth;
pub mod bid;
pub mod bids;
pub mod config_cmd;
pub mod profile;
pub mod results;
pub mod slots;
pub mod util;
pub mod wallet;

use lotto_core::Platform;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a platform-bound command to its handler. `platform` is
/// already signed in.
pub async fn dispatch(
    cmd: Command,
    platform: Platform,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(platform, args, global).await,
        Command::Slots(args) => slots::handle(&platform, args, global).await,
        Command::Bid(args) => bid::handle(&platform, args, global).await,
        Command::Bids(args) => bids::handle(&platform, args, global).await,
        Command::Results(args) => results::handle(platform, args, global).await,
        Command::Wallet(args) => wallet::handle(&platform, args, global).await,
        Command::Profile(args) => profile::handle(&platform, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions run without a platform connection".into(),
        )),
    }
}
