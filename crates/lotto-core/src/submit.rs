// ── Submission reconciler ──
//
// Sends one partition of the cart to the server, one create-bid call per
// entry, strictly in order. The partition is cleared only when every
// entry has been accepted. When a call fails the loop stops, nothing is
// removed, and entries the server already accepted are marked
// `Submitted` so a retry skips them instead of placing them twice.
//
// The caller holds `&mut BidCart` for the whole run, which keeps the
// cart frozen while requests are in flight.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, info, warn};

use lotto_api::models::{BidRecord, CreateBidRequest};

use crate::cart::BidCart;
use crate::error::CoreError;
use crate::model::{EntryId, EntryStatus, PartitionKey, ProductType};

/// Anything that can place a bid remotely.
pub trait BidSink {
    fn create_bid(
        &self,
        req: &CreateBidRequest,
    ) -> impl Future<Output = Result<BidRecord, CoreError>> + Send;
}

/// What happened to one entry during a submission run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Accepted in this run.
    Accepted { bid_id: String },
    /// Accepted by an earlier run; not sent again.
    AlreadySubmitted { bid_id: String },
    /// The request failed; the run stopped here.
    Failed { message: String },
    /// Never sent because an earlier entry failed.
    NotAttempted,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionReport {
    pub outcomes: Vec<(EntryId, EntryOutcome)>,
    /// Whether the partition was removed from the cart.
    pub cleared: bool,
}

impl SubmissionReport {
    /// Every entry is on the server.
    pub fn is_complete(&self) -> bool {
        !self.outcomes.is_empty()
            && self.outcomes.iter().all(|(_, o)| {
                matches!(
                    o,
                    EntryOutcome::Accepted { .. } | EntryOutcome::AlreadySubmitted { .. }
                )
            })
    }

    /// Bids placed by this run.
    pub fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::Accepted { .. }))
            .count()
    }

    /// The failing entry and its error message, if the run stopped early.
    pub fn failure(&self) -> Option<(EntryId, &str)> {
        self.outcomes.iter().find_map(|(id, o)| match o {
            EntryOutcome::Failed { message } => Some((*id, message.as_str())),
            _ => None,
        })
    }

    pub fn not_attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::NotAttempted))
            .count()
    }
}

/// Submit every `product` entry of `key`'s partition through `sink`.
///
/// `on_outcome` is called after each entry is resolved, in order. An
/// empty partition is a no-op and yields an empty report.
pub async fn submit_partition<S, F>(
    cart: &mut BidCart,
    product: ProductType,
    key: &PartitionKey,
    sink: &S,
    mut on_outcome: F,
) -> SubmissionReport
where
    S: BidSink + Sync,
    F: FnMut(EntryId, &EntryOutcome) + Send,
{
    let work: Vec<(EntryId, EntryStatus, CreateBidRequest)> = cart
        .partition(product, key)
        .into_iter()
        .map(|e| (e.id, e.status.clone(), e.to_request()))
        .collect();

    let mut report = SubmissionReport::default();
    if work.is_empty() {
        debug!(%product, partition = %key, "nothing to submit");
        return report;
    }
    info!(%product, partition = %key, entries = work.len(), "submitting partition");

    let mut failed = false;
    for (id, status, req) in work {
        let outcome = if failed {
            EntryOutcome::NotAttempted
        } else if let EntryStatus::Submitted { bid_id } = status {
            debug!(%id, %bid_id, "skipping entry accepted earlier");
            EntryOutcome::AlreadySubmitted { bid_id }
        } else {
            match sink.create_bid(&req).await {
                Ok(bid) => {
                    debug!(%id, bid_id = %bid.id, "bid accepted");
                    cart.mark_submitted(id, bid.id.clone());
                    EntryOutcome::Accepted { bid_id: bid.id }
                }
                Err(e) => {
                    warn!(%id, error = %e, "bid submission failed, stopping");
                    failed = true;
                    EntryOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            }
        };
        on_outcome(id, &outcome);
        report.outcomes.push((id, outcome));
    }

    if failed {
        info!(
            accepted = report.accepted(),
            not_attempted = report.not_attempted(),
            "partial submission, cart left in place"
        );
    } else {
        cart.clear_partition(product, key);
        report.cleared = true;
        info!(accepted = report.accepted(), "partition submitted");
    }
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cart::{FieldUpdate, SlotTarget};
    use crate::model::Wager;

    /// Sink that fails on the listed call numbers (1-based).
    struct ScriptedSink {
        fail_on: Vec<usize>,
        calls: AtomicUsize,
        sent: Mutex<Vec<CreateBidRequest>>,
    }

    impl ScriptedSink {
        fn new(fail_on: &[usize]) -> Self {
            Self {
                fail_on: fail_on.to_vec(),
                calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl BidSink for ScriptedSink {
        async fn create_bid(&self, req: &CreateBidRequest) -> Result<BidRecord, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.sent.lock().unwrap().push(req.clone());
            if self.fail_on.contains(&n) {
                return Err(CoreError::Rejected {
                    message: "Slot is closed".into(),
                });
            }
            Ok(BidRecord {
                id: format!("bid-{n}"),
                customer_name: req.customer_name.clone(),
                customer_phone: req.customer_phone.clone(),
                slot_id: req.slot_id.clone(),
                number: req.number,
                count: req.count,
                jp_numbers: req.jp_numbers.map(|n| n.to_vec()),
                note: None,
                created_at: None,
            })
        }
    }

    fn cart_with_three() -> (BidCart, SlotTarget) {
        let target = SlotTarget {
            slot_id: "S".into(),
            product: ProductType::LuckyDraw,
            partition: PartitionKey::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "20:00"),
            price: 1.0,
        };
        let mut cart = BidCart::new();
        cart.update(FieldUpdate::CustomerName("Tan".into())).unwrap();
        cart.update(FieldUpdate::CustomerPhone("0170000000".into())).unwrap();
        cart.update(FieldUpdate::Numbers("1#2#3".into())).unwrap();
        cart.update(FieldUpdate::Counts("10#20#30".into())).unwrap();
        cart.add_entries(&target).unwrap();
        (cart, target)
    }

    #[test]
    fn full_success_clears_partition() {
        let (mut cart, t) = cart_with_three();
        let sink = ScriptedSink::new(&[]);

        let report = tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &sink,
            |_, _| {},
        ));

        assert!(report.is_complete());
        assert!(report.cleared);
        assert_eq!(report.accepted(), 3);
        assert!(cart.is_empty());
        let numbers: Vec<_> = sink.sent.lock().unwrap().iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)], "sent sequentially in order");
    }

    #[test]
    fn failure_on_second_keeps_all_three() {
        let (mut cart, t) = cart_with_three();
        let sink = ScriptedSink::new(&[2]);
        let mut seen = Vec::new();

        let report = tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &sink,
            |id, outcome| seen.push((id, outcome.clone())),
        ));

        assert!(!report.cleared);
        assert!(!report.is_complete());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2, "stops at first failure");
        assert_eq!(cart.partition(ProductType::LuckyDraw, &t.partition).len(), 3);
        assert_eq!(report.failure().map(|(_, m)| m.to_owned()), Some("Rejected by server: Slot is closed".into()));
        assert_eq!(report.not_attempted(), 1);
        assert_eq!(seen.len(), 3);

        let statuses: Vec<bool> = cart
            .partition(ProductType::LuckyDraw, &t.partition)
            .iter()
            .map(|e| e.status.is_submitted())
            .collect();
        assert_eq!(statuses, vec![true, false, false]);
    }

    #[test]
    fn retry_skips_entries_already_accepted() {
        let (mut cart, t) = cart_with_three();
        let sink = ScriptedSink::new(&[2]);
        tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &sink,
            |_, _| {},
        ));

        let retry_sink = ScriptedSink::new(&[]);
        let report = tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &retry_sink,
            |_, _| {},
        ));

        assert!(report.is_complete());
        assert!(report.cleared);
        assert_eq!(report.accepted(), 2);
        assert_eq!(
            report.outcomes[0].1,
            EntryOutcome::AlreadySubmitted {
                bid_id: "bid-1".into()
            }
        );
        let resent: Vec<_> = retry_sink.sent.lock().unwrap().iter().map(|r| r.number).collect();
        assert_eq!(resent, vec![Some(2), Some(3)], "no duplicate for the first entry");
        assert!(cart.is_empty());
    }

    #[test]
    fn accepting_the_edited_entry_ends_the_edit() {
        let (mut cart, t) = cart_with_three();
        let first = cart.partition(ProductType::LuckyDraw, &t.partition)[0].id;
        cart.edit_entry(first).unwrap();

        let sink = ScriptedSink::new(&[2]);
        tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &sink,
            |_, _| {},
        ));
        assert_eq!(cart.form().editing(), None);

        // Whatever is typed next is a new bid, not a rewrite of the placed one.
        cart.update(FieldUpdate::CustomerName("Tan".into())).unwrap();
        cart.update(FieldUpdate::CustomerPhone("0170000000".into())).unwrap();
        cart.update(FieldUpdate::Numbers("1".into())).unwrap();
        cart.update(FieldUpdate::Counts("77".into())).unwrap();
        let added = cart.add_entries(&t).unwrap();
        assert_ne!(added, vec![first]);
        assert_eq!(
            cart.get(first).map(|e| e.wager.clone()),
            Some(Wager::LuckyDraw { number: 1, count: 10 })
        );

        let retry_sink = ScriptedSink::new(&[]);
        let report = tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &retry_sink,
            |_, _| {},
        ));
        assert!(report.cleared);
        let resent: Vec<_> = retry_sink
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.number, r.count))
            .collect();
        assert_eq!(
            resent,
            vec![(Some(2), Some(20)), (Some(3), Some(30)), (Some(1), Some(77))]
        );
    }

    #[test]
    fn empty_partition_is_a_no_op() {
        let mut cart = BidCart::new();
        let key = PartitionKey::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), "12:00");
        let sink = ScriptedSink::new(&[]);

        let report = tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::Jackpot,
            &key,
            &sink,
            |_, _| {},
        ));

        assert!(report.outcomes.is_empty());
        assert!(!report.cleared);
        assert!(!report.is_complete());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn other_partitions_survive_submission() {
        let (mut cart, t) = cart_with_three();
        let other = SlotTarget {
            partition: PartitionKey::new(t.partition.date, "12:00"),
            ..t.clone()
        };
        cart.update(FieldUpdate::CustomerName("Tan".into())).unwrap();
        cart.update(FieldUpdate::CustomerPhone("0170000000".into())).unwrap();
        cart.update(FieldUpdate::Numbers("9".into())).unwrap();
        cart.update(FieldUpdate::Counts("1".into())).unwrap();
        cart.add_entries(&other).unwrap();

        tokio_test::block_on(submit_partition(
            &mut cart,
            ProductType::LuckyDraw,
            &t.partition,
            &ScriptedSink::new(&[]),
            |_, _| {},
        ));

        let left = cart.partition(ProductType::LuckyDraw, &other.partition);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].wager, Wager::LuckyDraw { number: 9, count: 1 });
    }
}
