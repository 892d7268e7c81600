//! Slot command handlers.

use chrono::{DateTime, NaiveDate, Utc};
use tabled::Tabled;

use lotto_core::slot_select::{self, SelectionState};
use lotto_core::{Platform, ProductType, Slot, countdown, is_slot_disabled};

use crate::cli::{GlobalOpts, SlotsArgs, SlotsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "")]
    selected: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Draw")]
    time: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Closes in")]
    closes_in: String,
    #[tabled(rename = "Price")]
    price: String,
}

fn slot_row(slot: &Slot, selected: &str, now: DateTime<Utc>) -> SlotRow {
    let closed = is_slot_disabled(slot, now);
    SlotRow {
        selected: if slot.id == selected { ">".into() } else { String::new() },
        id: slot.id.clone(),
        code: slot.code.clone().unwrap_or_default(),
        time: slot.display_time(),
        status: output::status_text(if closed { "Closed" } else { "Open" }, !closed),
        closes_in: match slot.closes_at() {
            Some(at) if !closed => countdown(at, now),
            _ => output::muted("-"),
        },
        price: output::money(slot.bid_price),
    }
}

#[derive(Clone, Copy, Tabled, serde::Serialize)]
struct DateRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Lucky Draw")]
    lucky_draw: usize,
    #[tabled(rename = "Jackpot")]
    jackpot: usize,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    platform: &Platform,
    args: SlotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let board = platform.slot_board().await?;
    let now = platform.now();
    let today = platform.local_date(now);

    match args.command {
        SlotsCommand::List { date, product } => {
            let product = util::product_type(product);
            match slot_select::evaluate(Some(&board), date, None, product, now, today) {
                SelectionState::SlotSelected { date, slot, slots } => {
                    if !global.quiet {
                        eprintln!("{product} slots for {date}");
                    }
                    let out = output::render_list(
                        &global.output,
                        &slots,
                        |s| slot_row(s, &slot.id, now),
                        |s| s.id.clone(),
                    );
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                SelectionState::SlotsLoaded { date } => Err(CliError::NoSlot {
                    what: format!("{product} on {date}"),
                }),
                SelectionState::NoDateSelected | SelectionState::DateSelected { .. } => {
                    Err(CliError::NoSlot {
                        what: format!(
                            "{product} in the next {} days",
                            slot_select::BOOKING_WINDOW_DAYS
                        ),
                    })
                }
            }
        }

        SlotsCommand::Dates => {
            let rows: Vec<DateRow> = board
                .available_dates(today)
                .into_iter()
                .map(|date| DateRow {
                    date,
                    lucky_draw: board.slots_for(date, ProductType::LuckyDraw).len(),
                    jackpot: board.slots_for(date, ProductType::Jackpot).len(),
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                |r| *r,
                |r| r.date.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
