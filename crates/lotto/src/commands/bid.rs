//! Bid command handlers: one-shot `ld` / `jp` and the interactive cart.

use std::time::Duration;

use chrono::NaiveDate;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use lotto_core::model::JACKPOT_LEN;
use lotto_core::{
    BidCart, CartEntry, CartError, EntryId, EntryOutcome, EntryStatus, FieldUpdate, Platform,
    ProductType, Slot, SlotBoard, SlotTarget, SubmissionReport, countdown, is_slot_disabled,
    submit_partition,
};

use crate::cli::{BidArgs, BidCommand, CustomerArgs, GlobalOpts, OutputFormat, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Entry")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Bid")]
    wager: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn entry_rows(entries: &[&CartEntry]) -> Vec<EntryRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| EntryRow {
            index: i + 1,
            id: e.id.short(),
            customer: e.customer.name.clone(),
            phone: e.customer.phone.clone(),
            wager: e.wager.to_string(),
            status: match &e.status {
                EntryStatus::Pending => output::muted("pending"),
                EntryStatus::Submitted { bid_id } => {
                    output::status_text(&format!("placed {bid_id}"), true)
                }
            },
        })
        .collect()
}

/// One resolved entry of a submission run.
#[derive(Serialize)]
struct OutcomeView {
    entry: EntryId,
    customer: String,
    bid: String,
    #[serde(flatten)]
    outcome: EntryOutcome,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Bid")]
    bid: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&OutcomeView> for OutcomeRow {
    fn from(v: &OutcomeView) -> Self {
        let result = match &v.outcome {
            EntryOutcome::Accepted { bid_id } => {
                output::status_text(&format!("placed {bid_id}"), true)
            }
            EntryOutcome::AlreadySubmitted { bid_id } => {
                output::muted(&format!("placed earlier {bid_id}"))
            }
            EntryOutcome::Failed { message } => output::status_text(message, false),
            EntryOutcome::NotAttempted => output::muted("not sent"),
        };
        Self {
            entry: v.entry.short(),
            customer: v.customer.clone(),
            bid: v.bid.clone(),
            result,
        }
    }
}

// ── Shared cart helpers ─────────────────────────────────────────────

/// Cart table for one partition plus its running total.
fn render_partition(cart: &BidCart, target: &SlotTarget) -> String {
    let entries = cart.partition(target.product, &target.partition);
    if entries.is_empty() {
        return output::muted("(no bids for this draw yet)");
    }
    let total = cart.total(target.product, &target.partition, target.price);
    format!(
        "{}\nTotal: {}",
        output::render_table(&entry_rows(&entries)),
        output::emphasis(&output::money(total))
    )
}

fn fill_customer(cart: &mut BidCart, customer: &CustomerArgs) -> Result<(), CliError> {
    cart.update(FieldUpdate::CustomerName(customer.name.clone()))?;
    cart.update(FieldUpdate::CustomerPhone(customer.phone.clone()))?;
    Ok(())
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template("{spinner} placing bids [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Submit `target`'s partition and report per-entry outcomes.
async fn submit(
    platform: &Platform,
    cart: &mut BidCart,
    target: &SlotTarget,
    global: &GlobalOpts,
) -> SubmissionReport {
    let snapshot: Vec<(EntryId, String, String)> = cart
        .partition(target.product, &target.partition)
        .iter()
        .map(|e| (e.id, e.customer.name.clone(), e.wager.to_string()))
        .collect();
    let pending = cart
        .partition(target.product, &target.partition)
        .iter()
        .filter(|e| !e.status.is_submitted())
        .count();

    let bar = progress_bar(pending, global.quiet);
    let report = submit_partition(
        cart,
        target.product,
        &target.partition,
        platform,
        |_, outcome| match outcome {
            EntryOutcome::Accepted { bid_id } => {
                bar.inc(1);
                bar.set_message(bid_id.clone());
            }
            EntryOutcome::Failed { message } => bar.abandon_with_message(message.clone()),
            EntryOutcome::AlreadySubmitted { .. } | EntryOutcome::NotAttempted => {}
        },
    )
    .await;
    if !bar.is_finished() {
        bar.finish_and_clear();
    }

    let views: Vec<OutcomeView> = report
        .outcomes
        .iter()
        .map(|(id, outcome)| {
            let (customer, bid) = snapshot
                .iter()
                .find(|(sid, ..)| sid == id)
                .map(|(_, c, b)| (c.clone(), b.clone()))
                .unwrap_or_default();
            OutcomeView {
                entry: *id,
                customer,
                bid,
                outcome: outcome.clone(),
            }
        })
        .collect();
    let out = output::render_list(&global.output, &views, |v| OutcomeRow::from(v), |v| {
        match &v.outcome {
            EntryOutcome::Accepted { bid_id } | EntryOutcome::AlreadySubmitted { bid_id } => {
                bid_id.clone()
            }
            _ => String::new(),
        }
    });
    output::print_output(&out, global.quiet);
    report
}

fn partial_error(report: &SubmissionReport) -> Option<CliError> {
    if report.is_complete() {
        return None;
    }
    let (_, message) = report.failure()?;
    let accepted = report
        .outcomes
        .iter()
        .filter(|(_, o)| {
            matches!(
                o,
                EntryOutcome::Accepted { .. } | EntryOutcome::AlreadySubmitted { .. }
            )
        })
        .count();
    Some(CliError::PartialSubmission {
        accepted,
        total: report.outcomes.len(),
        message: message.to_owned(),
    })
}

/// Show the cart, confirm, submit, and fail on a partial run.
async fn place(
    platform: &Platform,
    cart: &mut BidCart,
    target: &SlotTarget,
    slot: &Slot,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        eprintln!(
            "{} {} at {}",
            target.product,
            target.partition.date,
            slot.display_time()
        );
        eprintln!("{}", render_partition(cart, target));
    }

    let count = cart.partition(target.product, &target.partition).len();
    let total = cart.total(target.product, &target.partition, target.price);
    let prompt = format!("Place {count} bid(s) totalling {}?", output::money(total));
    if !util::confirm(&prompt, global.yes)? {
        return Ok(());
    }

    let report = submit(platform, cart, target, global).await;
    match partial_error(&report) {
        Some(err) => Err(err),
        None => {
            if !global.quiet {
                eprintln!("{} bid(s) placed", report.accepted());
            }
            Ok(())
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    platform: &Platform,
    args: BidArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BidCommand::Ld {
            target,
            customer,
            numbers,
            counts,
        } => {
            let board = platform.slot_board().await?;
            let (date, slot) =
                util::resolve_target(platform, &board, &target, ProductType::LuckyDraw, true)?;
            let slot_target = SlotTarget::new(&slot, date);

            let mut cart = BidCart::new();
            cart.set_product(ProductType::LuckyDraw);
            fill_customer(&mut cart, &customer)?;
            cart.update(FieldUpdate::Numbers(numbers))?;
            cart.update(FieldUpdate::Counts(counts))?;
            cart.add_entries(&slot_target)?;

            place(platform, &mut cart, &slot_target, &slot, global).await
        }

        BidCommand::Jp {
            target,
            customer,
            numbers,
        } => {
            let board = platform.slot_board().await?;
            let (date, slot) =
                util::resolve_target(platform, &board, &target, ProductType::Jackpot, true)?;
            let slot_target = SlotTarget::new(&slot, date);

            let mut cart = BidCart::new();
            cart.set_product(ProductType::Jackpot);
            for combo in numbers.chunks(JACKPOT_LEN) {
                fill_customer(&mut cart, &customer)?;
                for (index, value) in combo.iter().enumerate() {
                    cart.update(FieldUpdate::JackpotNumber {
                        index,
                        value: value.clone(),
                    })?;
                }
                cart.add_entries(&slot_target)?;
            }

            place(platform, &mut cart, &slot_target, &slot, global).await
        }

        BidCommand::Interactive { target, product } => {
            util::require_terminal("bid interactive")?;
            let board = platform.slot_board().await?;
            let mut session = CartSession::new(platform, board, target, util::product_type(product), global);
            session.run().await
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INTERACTIVE CART
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Edit,
    Delete,
    ClearDraw,
    SwitchProduct,
    ChangeDraw,
    Submit,
    Quit,
}

const MENU: &[(Action, &str)] = &[
    (Action::Add, "Add bids"),
    (Action::Edit, "Edit a bid"),
    (Action::Delete, "Delete a bid"),
    (Action::ClearDraw, "Clear all bids for this draw"),
    (Action::SwitchProduct, "Switch Lucky Draw / Jackpot"),
    (Action::ChangeDraw, "Change date or slot"),
    (Action::Submit, "Review and submit"),
    (Action::Quit, "Quit"),
];

struct CartSession<'a> {
    platform: &'a Platform,
    global: &'a GlobalOpts,
    board: SlotBoard,
    cart: BidCart,
    date: Option<NaiveDate>,
    slot_id: Option<String>,
}

impl<'a> CartSession<'a> {
    fn new(
        platform: &'a Platform,
        board: SlotBoard,
        target: TargetArgs,
        product: ProductType,
        global: &'a GlobalOpts,
    ) -> Self {
        let mut cart = BidCart::new();
        cart.set_product(product);
        Self {
            platform,
            global,
            board,
            cart,
            date: target.date,
            slot_id: target.slot,
        }
    }

    /// Current draw, re-derived from the requested date and slot.
    fn current(&self) -> Result<(NaiveDate, Slot), CliError> {
        let target = TargetArgs {
            date: self.date,
            slot: self.slot_id.clone(),
        };
        util::resolve_target(self.platform, &self.board, &target, self.cart.product(), false)
    }

    async fn run(&mut self) -> Result<(), CliError> {
        loop {
            let current = self.current();
            self.print_header(&current);

            let labels: Vec<&str> = MENU.iter().map(|(_, label)| *label).collect();
            let choice = Select::new()
                .with_prompt("Action")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(util::prompt_err)?;
            let action = MENU.get(choice).map_or(Action::Quit, |(a, _)| *a);

            match self.step(action, current).await {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) if is_prompt_failure(&e) => return Err(e),
                Err(e) => eprintln!("{:?}", miette::Report::new(e)),
            }
        }
    }

    fn print_header(&self, current: &Result<(NaiveDate, Slot), CliError>) {
        let product = self.cart.product();
        eprintln!();
        match current {
            Ok((date, slot)) => {
                let now = self.platform.now();
                let closing = if is_slot_disabled(slot, now) {
                    output::status_text("closed", false)
                } else {
                    slot.closes_at()
                        .map(|at| format!("closes in {}", countdown(at, now)))
                        .unwrap_or_default()
                };
                eprintln!(
                    "{}  {date}  {}  {closing}",
                    output::emphasis(&product.to_string()),
                    slot.display_time()
                );
                eprintln!("{}", render_partition(&self.cart, &SlotTarget::new(slot, *date)));
            }
            Err(e) => eprintln!("{}  {}", output::emphasis(&product.to_string()), output::muted(&e.to_string())),
        }
        if let Some(id) = self.cart.form().editing() {
            eprintln!("{}", output::muted(&format!("editing entry {}", id.short())));
        }
    }

    /// Run one menu action. `Ok(false)` ends the session.
    async fn step(
        &mut self,
        action: Action,
        current: Result<(NaiveDate, Slot), CliError>,
    ) -> Result<bool, CliError> {
        match action {
            Action::Quit => {
                let pending = self.cart.pending();
                if pending == 0 {
                    return Ok(false);
                }
                let discard = util::confirm(
                    &format!("Discard {pending} unsubmitted bid(s) and quit?"),
                    self.global.yes,
                )?;
                Ok(!discard)
            }
            Action::SwitchProduct => {
                let next = match self.cart.product() {
                    ProductType::LuckyDraw => ProductType::Jackpot,
                    ProductType::Jackpot => ProductType::LuckyDraw,
                };
                self.cart.set_product(next);
                self.slot_id = None;
                Ok(true)
            }
            Action::ChangeDraw => {
                self.choose_draw()?;
                Ok(true)
            }
            Action::Add | Action::Edit | Action::Delete | Action::ClearDraw | Action::Submit => {
                let (date, slot) = current?;
                let target = SlotTarget::new(&slot, date);
                match action {
                    Action::Add => self.add(&slot, &target)?,
                    Action::Edit => self.edit(&slot, &target)?,
                    Action::Delete => self.delete(&target)?,
                    Action::ClearDraw => self.clear(&target)?,
                    _ => self.submit(&slot, &target).await?,
                }
                Ok(true)
            }
        }
    }

    fn ensure_open(&self, slot: &Slot) -> Result<(), CliError> {
        if is_slot_disabled(slot, self.platform.now()) {
            return Err(CliError::Validation {
                field: "slot".into(),
                reason: format!("the {} draw is closed for betting", slot.display_time()),
            });
        }
        Ok(())
    }

    // ── Form prompts ─────────────────────────────────────────────────

    fn fill_form(&mut self) -> Result<(), CliError> {
        match self.cart.product() {
            ProductType::LuckyDraw => {
                let form = self.cart.form().lucky_draw().clone();
                let hint = if self.cart.form().editing().is_some() {
                    "single value"
                } else {
                    "#-separated"
                };
                self.cart
                    .update(FieldUpdate::CustomerName(ask("Customer name", &form.customer_name)?))?;
                self.cart
                    .update(FieldUpdate::CustomerPhone(ask("Customer phone", &form.customer_phone)?))?;
                self.cart.update(FieldUpdate::Numbers(ask(
                    &format!("Numbers 0-37 ({hint})"),
                    &form.numbers,
                )?))?;
                self.cart.update(FieldUpdate::Counts(ask(
                    &format!("Counts 1-80 ({hint})"),
                    &form.counts,
                )?))?;
            }
            ProductType::Jackpot => {
                let form = self.cart.form().jackpot().clone();
                self.cart
                    .update(FieldUpdate::CustomerName(ask("Customer name", &form.customer_name)?))?;
                self.cart
                    .update(FieldUpdate::CustomerPhone(ask("Customer phone", &form.customer_phone)?))?;
                for (index, current) in form.numbers.iter().enumerate() {
                    let value = ask(&format!("Number {} of {JACKPOT_LEN}", index + 1), current)?;
                    self.cart.update(FieldUpdate::JackpotNumber { index, value })?;
                }
            }
        }
        Ok(())
    }

    /// Validate the form into the cart, printing field errors on failure.
    fn commit_form(&mut self, target: &SlotTarget) -> Result<(), CliError> {
        match self.cart.add_entries(target) {
            Ok(ids) => {
                eprintln!("{} bid(s) saved", ids.len());
                Ok(())
            }
            Err(CartError::Validation(_)) => {
                for (field, message) in self.cart.form().errors() {
                    eprintln!("  {}: {message}", output::status_text(&field.to_string(), false));
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn add(&mut self, slot: &Slot, target: &SlotTarget) -> Result<(), CliError> {
        self.ensure_open(slot)?;
        self.fill_form()?;
        self.commit_form(target)
    }

    fn pick_entry(&self, target: &SlotTarget, prompt: &str) -> Result<Option<EntryId>, CliError> {
        let entries: Vec<&CartEntry> = self
            .cart
            .partition(target.product, &target.partition)
            .into_iter()
            .filter(|e| !e.status.is_submitted())
            .collect();
        if entries.is_empty() {
            eprintln!("No unsubmitted bids for this draw");
            return Ok(None);
        }
        let labels: Vec<String> = entries
            .iter()
            .map(|e| format!("{}  {}  {}", e.wager, e.customer.name, output::muted(&e.id.short())))
            .collect();
        let choice = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(util::prompt_err)?;
        Ok(choice.and_then(|i| entries.get(i)).map(|e| e.id))
    }

    fn edit(&mut self, slot: &Slot, target: &SlotTarget) -> Result<(), CliError> {
        self.ensure_open(slot)?;
        let Some(id) = self.pick_entry(target, "Edit which bid?")? else {
            return Ok(());
        };
        self.cart.edit_entry(id)?;
        self.fill_form()?;
        self.commit_form(target)
    }

    fn delete(&mut self, target: &SlotTarget) -> Result<(), CliError> {
        let Some(id) = self.pick_entry(target, "Delete which bid?")? else {
            return Ok(());
        };
        let removed = self.cart.delete_entry(id)?;
        eprintln!("Deleted {}", removed.wager);
        Ok(())
    }

    fn clear(&mut self, target: &SlotTarget) -> Result<(), CliError> {
        if self.cart.partition(target.product, &target.partition).is_empty() {
            return Ok(());
        }
        if util::confirm("Remove every bid for this draw?", self.global.yes)? {
            let removed = self.cart.clear_partition(target.product, &target.partition);
            eprintln!("Removed {removed} bid(s)");
        }
        Ok(())
    }

    async fn submit(&mut self, slot: &Slot, target: &SlotTarget) -> Result<(), CliError> {
        self.ensure_open(slot)?;
        if self.cart.partition(target.product, &target.partition).is_empty() {
            eprintln!("Nothing to submit");
            return Ok(());
        }
        place(self.platform, &mut self.cart, target, slot, self.global).await
    }

    fn choose_draw(&mut self) -> Result<(), CliError> {
        let product = self.cart.product();
        let now = self.platform.now();
        let dates = self.board.available_dates(self.platform.local_date(now));
        if dates.is_empty() {
            eprintln!("No draws scheduled in the booking window");
            return Ok(());
        }
        let date_labels: Vec<String> = dates.iter().map(ToString::to_string).collect();
        let current_date = self.current().ok().map(|(d, _)| d);
        let date_idx = Select::new()
            .with_prompt("Date")
            .items(&date_labels)
            .default(current_date.and_then(|d| dates.iter().position(|x| *x == d)).unwrap_or(0))
            .interact()
            .map_err(util::prompt_err)?;
        let Some(&date) = dates.get(date_idx) else {
            return Ok(());
        };

        let slots = self.board.slots_for(date, product);
        if slots.is_empty() {
            eprintln!("No {product} slots on {date}");
            self.date = Some(date);
            self.slot_id = None;
            return Ok(());
        }
        let slot_labels: Vec<String> = slots
            .iter()
            .map(|s| {
                if is_slot_disabled(s, now) {
                    format!("{}  {}", s.display_time(), output::muted("(closed)"))
                } else {
                    s.display_time()
                }
            })
            .collect();
        let slot_idx = Select::new()
            .with_prompt("Slot")
            .items(&slot_labels)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;
        self.date = Some(date);
        self.slot_id = slots.get(slot_idx).map(|s| s.id.clone());
        Ok(())
    }
}

fn ask(prompt: &str, initial: &str) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)
}

fn is_prompt_failure(err: &CliError) -> bool {
    matches!(err, CliError::Validation { field, .. } if field == "interactive" || field == "terminal")
}
