//! Wallet command handlers.

use tabled::Tabled;

use lotto_core::{Platform, WalletBalance, WalletTransaction, WalletTransferRequest};

use crate::cli::{GlobalOpts, TransferArgs, WalletArgs, WalletCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    tx_type: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Balance")]
    balance_after: String,
    #[tabled(rename = "Reference")]
    trans_id: String,
    #[tabled(rename = "Date")]
    created: String,
}

impl From<&WalletTransaction> for TransactionRow {
    fn from(t: &WalletTransaction) -> Self {
        Self {
            id: t.id.clone(),
            tx_type: t.tx_type.clone(),
            amount: output::status_text(&output::money(t.amount), t.amount >= 0.0),
            balance_after: t.balance_after.map(output::money).unwrap_or_default(),
            trans_id: t.trans_id.clone().unwrap_or_default(),
            created: t.created_at.clone().unwrap_or_default(),
        }
    }
}

fn balance_detail(b: &WalletBalance) -> String {
    output::detail_lines(&[
        ("Total", output::money(b.total_balance)),
        ("Available", output::emphasis(&output::money(b.available_balance))),
        ("Commission", output::money(b.commission_earned)),
        ("Reserved winnings", output::money(b.reserved_winning)),
    ])
}

fn transfer_request(t: TransferArgs, proof_url: Option<String>) -> Result<WalletTransferRequest, CliError> {
    if !t.amount.is_finite() || t.amount <= 0.0 {
        return Err(CliError::Validation {
            field: "amount".into(),
            reason: "must be a positive amount".into(),
        });
    }
    if t.trans_id.trim().is_empty() {
        return Err(CliError::Validation {
            field: "trans-id".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(WalletTransferRequest {
        amount: t.amount,
        trans_id: t.trans_id.trim().to_owned(),
        proof_url,
        note: t.note,
    })
}

pub async fn handle(
    platform: &Platform,
    args: WalletArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WalletCommand::Balance => {
            let balance = platform.wallet_balance().await?;
            let out = output::render_single(&global.output, &balance, balance_detail, |b| {
                output::money(b.available_balance)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WalletCommand::History(page) => {
            let history = platform.wallet_history(page.page, page.page_size).await?;
            let out = output::render_list(
                &global.output,
                &history.items,
                |t| TransactionRow::from(t),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WalletCommand::Deposit {
            transfer,
            proof_url,
        } => {
            let req = transfer_request(transfer, proof_url)?;
            platform.request_deposit(&req).await?;
            if !global.quiet {
                eprintln!(
                    "Deposit of {} requested (reference {})",
                    output::money(req.amount),
                    req.trans_id
                );
            }
            Ok(())
        }

        WalletCommand::SettleWin { transfer } => {
            let req = transfer_request(transfer, None)?;
            let prompt = format!(
                "Pay out {} in winnings (reference {})?",
                output::money(req.amount),
                req.trans_id
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            platform.settle_winning(&req).await?;
            if !global.quiet {
                eprintln!("Winnings settled");
            }
            Ok(())
        }
    }
}
