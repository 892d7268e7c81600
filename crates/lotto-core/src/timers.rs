// ── Draw timers ──
//
// Countdown formatting and the result watcher. The watcher is a
// background tokio task that polls for a slot's result only inside the
// half hour before its draw, and stops on the first announced result,
// on cancellation, or when it is pointed at another slot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{DrawResult, Slot};

/// Time between result polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Polling starts this long before the draw.
pub const POLL_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Time left until `close_at` as `HH:MM:SS`, clamped at `00:00:00`.
/// Hours are not wrapped at 24.
pub fn countdown(close_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (close_at - now).num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Whole minutes until `at`, rounded down (negative once passed).
pub fn minutes_until(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (at - now).num_seconds().div_euclid(60)
}

/// Something that can list published draw results.
pub trait ResultSource: Send + Sync + 'static {
    fn fetch_results(&self) -> impl Future<Output = Result<Vec<DrawResult>, CoreError>> + Send;
}

/// Background poller for one slot's result.
///
/// Dropping the watcher cancels its task.
pub struct ResultWatcher {
    slot_id: String,
    cancel: CancellationToken,
    rx: watch::Receiver<Option<DrawResult>>,
    handle: JoinHandle<()>,
}

impl ResultWatcher {
    /// Start watching `slot`. `parent` cancels this watcher along with
    /// anything else hanging off it.
    pub fn spawn<S: ResultSource>(
        source: Arc<S>,
        slot: &Slot,
        now: DateTime<Utc>,
        parent: &CancellationToken,
    ) -> Self {
        let cancel = parent.child_token();
        let (tx, rx) = watch::channel(None);
        let start_in = slot
            .draw_time
            .or(slot.window_close_at)
            .map_or(Duration::ZERO, |draw| delay_until_window(draw, now));
        debug!(slot_id = %slot.id, start_in_secs = start_in.as_secs(), "result watcher started");
        let handle = tokio::spawn(poll_task(
            source,
            slot.id.clone(),
            start_in,
            tx,
            cancel.clone(),
        ));
        Self {
            slot_id: slot.id.clone(),
            cancel,
            rx,
            handle,
        }
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    /// Latest observed result, without waiting.
    pub fn latest(&self) -> Option<DrawResult> {
        self.rx.borrow().clone()
    }

    /// Wait for the result. `None` means the watcher was stopped first.
    pub async fn wait(&mut self) -> Option<DrawResult> {
        loop {
            if let Some(result) = self.rx.borrow_and_update().clone() {
                return Some(result);
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }

    /// Stop polling. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Point the watcher at another slot: the old task is cancelled and
    /// a fresh one takes its place. Same slot is a no-op.
    pub fn retarget<S: ResultSource>(
        &mut self,
        source: Arc<S>,
        slot: &Slot,
        now: DateTime<Utc>,
        parent: &CancellationToken,
    ) {
        if slot.id == self.slot_id {
            return;
        }
        debug!(from = %self.slot_id, to = %slot.id, "result watcher retargeted");
        self.stop();
        let next = Self::spawn(source, slot, now, parent);
        let old = std::mem::replace(self, next);
        drop(old);
    }
}

impl Drop for ResultWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn delay_until_window(draw: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let window = TimeDelta::from_std(POLL_WINDOW).unwrap_or_else(|_| TimeDelta::minutes(30));
    (draw - window - now).to_std().unwrap_or(Duration::ZERO)
}

async fn poll_task<S: ResultSource>(
    source: Arc<S>,
    slot_id: String,
    start_in: Duration,
    tx: watch::Sender<Option<DrawResult>>,
    cancel: CancellationToken,
) {
    if !start_in.is_zero() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(start_in) => {}
        }
    }

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match source.fetch_results().await {
                    Ok(results) => {
                        if let Some(found) = results
                            .into_iter()
                            .find(|r| r.slot_id == slot_id && r.is_announced())
                        {
                            info!(%slot_id, winner = %found.display(), "draw result published");
                            tx.send_replace(Some(found));
                            break;
                        }
                        debug!(%slot_id, "no result yet");
                    }
                    Err(e) => warn!(%slot_id, error = %e, "result poll failed"),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    use super::*;
    use crate::model::{ProductType, SlotStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 11, 0, 0).unwrap()
    }

    #[test]
    fn countdown_formats_and_clamps() {
        let n = now();
        assert_eq!(countdown(n + TimeDelta::seconds(3725), n), "01:02:05");
        assert_eq!(countdown(n + TimeDelta::hours(30), n), "30:00:00");
        assert_eq!(countdown(n, n), "00:00:00");
        assert_eq!(countdown(n - TimeDelta::minutes(5), n), "00:00:00");
    }

    #[test]
    fn minutes_until_rounds_down() {
        let n = now();
        assert_eq!(minutes_until(n + TimeDelta::seconds(119), n), 1);
        assert_eq!(minutes_until(n + TimeDelta::seconds(30 * 60), n), 30);
        assert_eq!(minutes_until(n - TimeDelta::seconds(1), n), -1);
    }

    /// Returns the result for `slot_id` from the `ready_on`-th call on.
    struct FakeResults {
        slot_id: String,
        ready_on: usize,
        calls: AtomicUsize,
    }

    impl ResultSource for FakeResults {
        async fn fetch_results(&self) -> Result<Vec<DrawResult>, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 {
                return Err(CoreError::Timeout);
            }
            let announced = n >= self.ready_on;
            Ok(vec![DrawResult {
                slot_id: self.slot_id.clone(),
                code: None,
                product: ProductType::LuckyDraw,
                date: "2026-10-17".into(),
                time: "8:00PM".into(),
                winning_number: announced.then_some(7),
                winning_combo: None,
            }])
        }
    }

    fn slot(id: &str, draw_in: TimeDelta) -> Slot {
        Slot {
            id: id.into(),
            code: None,
            product: ProductType::LuckyDraw,
            status: SlotStatus::Open,
            time_label: "20:00".into(),
            draw_time: Some(now() + draw_in),
            window_close_at: None,
            bid_price: 1.0,
            winning_prize: None,
        }
    }

    fn source(slot_id: &str, ready_on: usize) -> Arc<FakeResults> {
        Arc::new(FakeResults {
            slot_id: slot_id.into(),
            ready_on,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn polls_only_inside_the_window_until_announced() {
        let src = source("s1", 3);
        let root = CancellationToken::new();
        let started = tokio::time::Instant::now();

        let mut watcher =
            ResultWatcher::spawn(Arc::clone(&src), &slot("s1", TimeDelta::minutes(40)), now(), &root);
        let result = watcher.wait().await.unwrap();

        assert_eq!(result.display(), "07");
        assert_eq!(src.calls.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10 * 60 + 10), "waited {elapsed:?}");
        assert!(elapsed < Duration::from_secs(10 * 60 + 15), "waited {elapsed:?}");
        assert_eq!(watcher.latest(), Some(result));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_before_any_poll() {
        let src = source("s1", 1);
        let root = CancellationToken::new();
        let mut watcher =
            ResultWatcher::spawn(Arc::clone(&src), &slot("s1", TimeDelta::hours(2)), now(), &root);

        root.cancel();

        assert_eq!(watcher.wait().await, None);
        assert_eq!(src.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retarget_replaces_the_old_watcher() {
        let old_src = source("s1", usize::MAX);
        let root = CancellationToken::new();
        let mut watcher =
            ResultWatcher::spawn(Arc::clone(&old_src), &slot("s1", TimeDelta::minutes(5)), now(), &root);
        tokio::time::sleep(Duration::from_secs(12)).await;
        let polled_before = old_src.calls.load(Ordering::SeqCst);
        assert!(polled_before >= 2);

        let new_src = source("s2", 2);
        watcher.retarget(Arc::clone(&new_src), &slot("s2", TimeDelta::minutes(5)), now(), &root);
        let result = watcher.wait().await.unwrap();

        assert_eq!(watcher.slot_id(), "s2");
        assert_eq!(result.slot_id, "s2");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(old_src.calls.load(Ordering::SeqCst), polled_before);
    }
}
