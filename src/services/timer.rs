use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Single-shot timer that owns at most one pending callback.
///
/// Arming always cancels whatever was pending. Once the deadline passes the
/// callback is handed to its own task and runs to completion; cancelling
/// after that point has no effect on it.
#[derive(Debug, Default)]
pub struct CancellableTimer {
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    handle: JoinHandle<()>,
    deadline: Instant,
}

impl CancellableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run after `delay`, replacing any pending one
    pub fn arm<F>(&mut self, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tokio::spawn(callback);
        });

        self.pending = Some(Pending { handle, deadline });
    }

    /// Drops the pending callback; returns whether one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) if !pending.handle.is_finished() => {
                pending.handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Time until the pending callback fires; `None` once it has fired
    pub fn remaining(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .filter(|pending| !pending.handle.is_finished())
            .map(|pending| pending.deadline.saturating_duration_since(Instant::now()))
    }
}

impl Drop for CancellableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = CancellableTimer::new();

        let counter = fired.clone();
        timer.arm(Duration::from_millis(500), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.remaining().is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(timer.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_cancels_previous() {
        let fired = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut timer = CancellableTimer::new();

        for label in ["first", "second", "third"] {
            let log = fired.clone();
            timer.arm(Duration::from_millis(500), async move {
                log.lock().unwrap().push(label);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(*fired.lock().unwrap(), vec!["third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_remaining() {
        let mut timer = CancellableTimer::new();
        assert_eq!(timer.remaining(), None);

        timer.arm(Duration::from_secs(20), async {});
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.remaining(), Some(Duration::from_secs(15)));

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut timer = CancellableTimer::new();
            let counter = fired.clone();
            timer.arm(Duration::from_millis(10), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
