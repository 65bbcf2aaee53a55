use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Sender, channel};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::host::{ActionId, ActionRunner, ActorHandle};

/// Retry ceiling for power-classified actions. Normal actions start their
/// counter at the ceiling, so the retry guard never re-fires them.
pub const ACTION_MAX_RETRY: u32 = 4;

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug)]
struct DispatchJob {
    action: ActionId,
    actor: ActorHandle,
    attempt: u32,
}

/// Counters the worker updates as jobs move through the queue.
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Calls made into the host runner.
    pub executed: AtomicU64,
    pub succeeded: AtomicU64,
    /// Backoff timers started.
    pub retried: AtomicU64,
    /// Jobs dropped after the ceiling.
    pub abandoned: AtomicU64,
}

impl DispatchStats {
    #[inline(always)]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fire-and-forget action queue with bounded retry.
///
/// One consumer thread serializes calls into the host runner, so submission
/// order is execution order for first attempts. A failed attempt below the
/// ceiling sleeps 200 ms on its own timer thread and re-enqueues with
/// `attempt + 1`; a job that returns success is finished and never touched
/// again. There is no cancellation: every job runs to success or
/// exhaustion.
pub struct Dispatcher {
    sender: Sender<DispatchJob>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn ActionRunner>) -> Self {
        let (sender, receiver) = channel::<DispatchJob>();
        let stats = Arc::new(DispatchStats::default());

        let retry_sender = sender.clone();
        let worker_stats = Arc::clone(&stats);
        thread::spawn(move || {
            while let Ok(job) = receiver.recv() {
                DispatchStats::bump(&worker_stats.executed);
                if runner.execute(job.action, job.actor) {
                    DispatchStats::bump(&worker_stats.succeeded);
                    continue;
                }

                if job.attempt < ACTION_MAX_RETRY {
                    DispatchStats::bump(&worker_stats.retried);
                    let tx = retry_sender.clone();
                    thread::spawn(move || {
                        thread::sleep(RETRY_BACKOFF);
                        let _ = tx.send(DispatchJob {
                            attempt: job.attempt + 1,
                            ..job
                        });
                    });
                } else {
                    DispatchStats::bump(&worker_stats.abandoned);
                    debug!(
                        "Dropped {:?} after {} attempts.",
                        job.action,
                        job.attempt + 1
                    );
                }
            }
        });

        Self { sender, stats }
    }

    /// Enqueue `action` against `actor`. Power-classified actions retry on
    /// failure up to the ceiling; anything else fires exactly once.
    pub fn dispatch(&self, action: ActionId, actor: ActorHandle, power_class: bool) {
        let attempt = if power_class { 0 } else { ACTION_MAX_RETRY };
        let job = DispatchJob {
            action,
            actor,
            attempt,
        };
        if self.sender.send(job).is_err() {
            warn!("Dispatch queue is gone; dropping {action:?}.");
        }
    }

    #[inline(always)]
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::{ACTION_MAX_RETRY, Dispatcher};
    use crate::host::{ActionId, ActionRunner, ActorHandle};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    const PLAYER: ActorHandle = ActorHandle(0x14);

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyRunner {
        failures: u32,
        calls: AtomicU32,
        log: Mutex<Vec<ActionId>>,
    }

    impl FlakyRunner {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
                log: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ActionRunner for FlakyRunner {
        fn execute(&self, action: ActionId, _actor: ActorHandle) -> bool {
            self.log.lock().unwrap().push(action);
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            n >= self.failures
        }
    }

    fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        done()
    }

    fn init_test_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn power_job_retries_through_transient_failures() {
        init_test_logging();
        let runner = FlakyRunner::new(4);
        let dispatcher = Dispatcher::new(runner.clone());

        dispatcher.dispatch(ActionId::RightPowerAttack, PLAYER, true);

        assert!(
            wait_until(Duration::from_secs(3), || {
                dispatcher.stats().succeeded.load(Ordering::SeqCst) == 1
            }),
            "job should eventually succeed on the final attempt"
        );
        assert_eq!(runner.calls(), 5, "attempts 0..=4 must each execute once");
        assert_eq!(dispatcher.stats().retried.load(Ordering::SeqCst), 4);
        assert_eq!(dispatcher.stats().abandoned.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn power_job_is_abandoned_after_the_ceiling() {
        init_test_logging();
        let runner = FlakyRunner::new(u32::MAX);
        let dispatcher = Dispatcher::new(runner.clone());

        dispatcher.dispatch(ActionId::LeftPowerAttack, PLAYER, true);

        assert!(
            wait_until(Duration::from_secs(3), || {
                dispatcher.stats().abandoned.load(Ordering::SeqCst) == 1
            }),
            "job should be dropped after exhausting retries"
        );
        assert_eq!(
            runner.calls(),
            ACTION_MAX_RETRY + 1,
            "one initial attempt plus the retry ceiling"
        );
        assert_eq!(dispatcher.stats().succeeded.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn normal_job_never_retries() {
        init_test_logging();
        let runner = FlakyRunner::new(u32::MAX);
        let dispatcher = Dispatcher::new(runner.clone());

        dispatcher.dispatch(ActionId::RightAttack, PLAYER, false);

        assert!(
            wait_until(Duration::from_secs(1), || {
                dispatcher.stats().abandoned.load(Ordering::SeqCst) == 1
            }),
            "a failed normal job is dropped immediately"
        );
        // Give any stray timer a chance to fire before asserting.
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(runner.calls(), 1, "normal jobs fire exactly once");
        assert_eq!(dispatcher.stats().retried.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn successful_job_is_never_reenqueued() {
        init_test_logging();
        let runner = FlakyRunner::new(0);
        let dispatcher = Dispatcher::new(runner.clone());

        dispatcher.dispatch(ActionId::DualPowerAttack, PLAYER, true);

        assert!(wait_until(Duration::from_secs(1), || {
            dispatcher.stats().succeeded.load(Ordering::SeqCst) == 1
        }));
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(runner.calls(), 1, "a success must not come back around");
        assert_eq!(dispatcher.stats().retried.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn submission_order_is_preserved_for_first_attempts() {
        init_test_logging();
        let runner = FlakyRunner::new(0);
        let dispatcher = Dispatcher::new(runner.clone());

        dispatcher.dispatch(ActionId::RightAttack, PLAYER, false);
        dispatcher.dispatch(ActionId::RightRelease, PLAYER, false);
        dispatcher.dispatch(ActionId::RightPowerAttack, PLAYER, true);

        assert!(wait_until(Duration::from_secs(1), || {
            dispatcher.stats().succeeded.load(Ordering::SeqCst) == 3
        }));
        let log = runner.log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![
                ActionId::RightAttack,
                ActionId::RightRelease,
                ActionId::RightPowerAttack
            ],
            "the single consumer must drain in submission order"
        );
    }
}
