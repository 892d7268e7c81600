//! Result command handlers, including the live draw watch.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use lotto_core::{DayResults, DrawResult, Platform, ResultWatcher, Slot, countdown};

use crate::cli::{GlobalOpts, OutputFormat, ResultsArgs, ResultsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Type")]
    product: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Winner")]
    winner: String,
}

impl From<&DrawResult> for ResultRow {
    fn from(r: &DrawResult) -> Self {
        let winner = if r.is_announced() {
            output::emphasis(&r.display())
        } else {
            output::muted(&r.display())
        };
        Self {
            slot: r.code.clone().unwrap_or_else(|| r.slot_id.clone()),
            product: r.product.to_string(),
            date: r.date.clone(),
            time: r.time.clone(),
            winner,
        }
    }
}

fn result_detail(r: &DrawResult) -> String {
    output::detail_lines(&[
        ("Slot", r.slot_id.clone()),
        ("Code", r.code.clone().unwrap_or_default()),
        ("Type", r.product.to_string()),
        ("Draw", format!("{} {}", r.date, r.time)),
        ("Winner", output::emphasis(&r.display())),
    ])
}

fn day_tables(day: &DayResults) -> String {
    let section = |title: &str, results: &[DrawResult]| {
        let body = if results.is_empty() {
            output::muted("(no draws)")
        } else {
            output::render_table(&results.iter().map(ResultRow::from).collect::<Vec<_>>())
        };
        format!("{}\n{body}", output::emphasis(title))
    };
    format!(
        "Results for {}\n\n{}\n\n{}",
        day.date,
        section("Lucky Draw", &day.lucky_draw),
        section("Jackpot", &day.jackpot)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    platform: Platform,
    args: ResultsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResultsCommand::List { product } => {
            let mut results = platform.results().await?;
            if let Some(p) = product {
                let p = util::product_type(p);
                results.retain(|r| r.product == p);
            }
            let out = output::render_list(&global.output, &results, |r| ResultRow::from(r), |r| {
                format!("{} {}", r.slot_id, r.display())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResultsCommand::Date { date } => {
            let day = platform.results_by_date(date).await?;
            let out = output::render_single(&global.output, &day, day_tables, |d| {
                d.lucky_draw
                    .iter()
                    .chain(&d.jackpot)
                    .map(|r| format!("{} {}", r.slot_id, r.display()))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResultsCommand::Get { slot } => {
            let result = platform.result_for_slot(&slot).await?;
            let out = output::render_single(&global.output, &result, result_detail, DrawResult::display);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResultsCommand::Watch { target, product } => {
            let product = util::product_type(product);
            let board = platform.slot_board().await?;
            let (_, slot) = util::resolve_target(&platform, &board, &target, product, false)?;
            watch(Arc::new(platform), &slot, global).await
        }
    }
}

/// Count down to `slot`'s draw and print its result once announced.
async fn watch(
    platform: Arc<Platform>,
    slot: &Slot,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let shutdown = CancellationToken::new();
    let mut watcher = ResultWatcher::spawn(Arc::clone(&platform), slot, platform.now(), &shutdown);

    let spinner = if global.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar
    };
    let target_time = slot.draw_time.or_else(|| slot.closes_at());
    let label = format!("{} {}", slot.product, slot.display_time());

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let outcome = loop {
        tokio::select! {
            result = watcher.wait() => break result,
            _ = tick.tick() => {
                let now = platform.now();
                let msg = match target_time {
                    Some(at) if at > now => format!("{label}: draw in {}", countdown(at, now)),
                    _ => format!("{label}: waiting for the result"),
                };
                spinner.set_message(msg);
                spinner.tick();
            }
            _ = &mut ctrl_c => {
                shutdown.cancel();
                break None;
            }
        }
    };
    spinner.finish_and_clear();

    match outcome {
        Some(result) => {
            let out =
                output::render_single(&global.output, &result, result_detail, DrawResult::display);
            output::print_output(&out, global.quiet);
            Ok(())
        }
        None => {
            if !global.quiet && matches!(global.output, OutputFormat::Table) {
                eprintln!("Stopped watching {label}");
            }
            Ok(())
        }
    }
}
