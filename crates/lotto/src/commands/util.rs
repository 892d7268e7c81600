//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::NaiveDate;

use lotto_core::slot_select::{self, SelectionState};
use lotto_core::{Platform, ProductType, Slot, SlotBoard, is_slot_disabled};

use crate::cli::{ProductArg, TargetArgs};
use crate::error::CliError;

/// Sign in, naming the profile in auth failures.
pub async fn sign_in(platform: &mut Platform, profile_name: &str) -> Result<(), CliError> {
    match platform.connect().await {
        Ok(user) => {
            tracing::info!(user = %user.display_name(), role = %user.role, "signed in");
            Ok(())
        }
        Err(e) => Err(match CliError::from(e) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                profile: profile_name.into(),
                message,
            },
            other => other,
        }),
    }
}

pub fn product_type(arg: ProductArg) -> ProductType {
    match arg {
        ProductArg::Ld => ProductType::LuckyDraw,
        ProductArg::Jp => ProductType::Jackpot,
    }
}

/// Pick the draw a command targets.
///
/// An explicit `--slot` wins; otherwise the nearest bookable date and
/// its first open slot. With `bookable`, a closed slot is refused.
pub fn resolve_target(
    platform: &Platform,
    board: &SlotBoard,
    target: &TargetArgs,
    product: ProductType,
    bookable: bool,
) -> Result<(NaiveDate, Slot), CliError> {
    let now = platform.now();
    let today = platform.local_date(now);

    let mut date = target.date;
    if let Some(ref id) = target.slot {
        let Some((slot_date, slot)) = board.find(id) else {
            return Err(CliError::NotFound {
                resource_type: "Slot".into(),
                identifier: id.clone(),
                list_command: "slots list".into(),
            });
        };
        if slot.product != product {
            return Err(CliError::Validation {
                field: "slot".into(),
                reason: format!("slot {id} is a {} slot, not {product}", slot.product),
            });
        }
        date = Some(date.unwrap_or(slot_date));
    }

    let state =
        slot_select::evaluate(Some(board), date, target.slot.as_deref(), product, now, today);
    match state {
        SelectionState::SlotSelected { date, slot, .. } => {
            if target.slot.as_deref().is_some_and(|id| id != slot.id) {
                return Err(CliError::NoSlot {
                    what: format!("slot {} on {date}", target.slot.as_deref().unwrap_or_default()),
                });
            }
            if bookable && is_slot_disabled(slot, now) {
                return Err(CliError::Validation {
                    field: "slot".into(),
                    reason: format!("the {} draw on {date} is closed for betting", slot.display_time()),
                });
            }
            Ok((date, slot.clone()))
        }
        SelectionState::SlotsLoaded { date } => Err(CliError::NoSlot {
            what: format!("{product} on {date}"),
        }),
        SelectionState::NoDateSelected | SelectionState::DateSelected { .. } => {
            Err(CliError::NoSlot {
                what: format!("{product} in the next {} days", slot_select::BOOKING_WINDOW_DAYS),
            })
        }
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Fail early when a command needs a keyboard.
pub fn require_terminal(action: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "terminal".into(),
            reason: format!("{action} needs an interactive terminal"),
        })
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
