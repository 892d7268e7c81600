//! Bid history handler.

use tabled::Tabled;

use lotto_core::{BidRecord, Platform, winning_display};

use crate::cli::{BidsArgs, BidsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct BidRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Bid")]
    bid: String,
    #[tabled(rename = "Placed")]
    created: String,
}

/// `05 x20` for Lucky Draw, dashed combination for Jackpot.
fn bid_label(b: &BidRecord) -> String {
    match (&b.jp_numbers, b.number) {
        (Some(combo), _) if !combo.is_empty() => combo
            .iter()
            .map(|n| format!("{n:02}"))
            .collect::<Vec<_>>()
            .join("-"),
        (_, number) => format!("{} x{}", winning_display(number), b.count.unwrap_or_default()),
    }
}

impl From<&BidRecord> for BidRow {
    fn from(b: &BidRecord) -> Self {
        Self {
            id: b.id.clone(),
            customer: b.customer_name.clone(),
            phone: b.customer_phone.clone(),
            slot: b.slot_id.clone(),
            bid: bid_label(b),
            created: b.created_at.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    platform: &Platform,
    args: BidsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BidsCommand::History(page) => {
            let result = platform.my_bids(page.page, page.page_size).await?;
            if !global.quiet && matches!(global.output, OutputFormat::Table) {
                eprintln!(
                    "Page {} ({} bids in total)",
                    result.page.max(page.page),
                    result.total
                );
            }
            let out = output::render_list(
                &global.output,
                &result.items,
                |b| BidRow::from(b),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
