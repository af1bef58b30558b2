// ABOUTME: Worker pool that runs inbound request callbacks off the read loop
// ABOUTME: A semaphore caps concurrency and backpressures the reader when every worker is busy

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

/// Bounded pool for inbound request processing.
///
/// Capacity is a semaphore: the reader waits for a permit before handing a
/// PDU over, so a saturated pool applies backpressure to the read loop
/// instead of queueing without bound. The degree only ever grows.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    degree: AtomicUsize,
    tracker: TaskTracker,
}

impl WorkerPool {
    pub fn new(degree: usize) -> Self {
        let degree = degree.max(1);
        let tracker = TaskTracker::new();
        // Closing only marks the tracker; tasks can still be spawned and
        // `wait` resolves once they are all done.
        tracker.close();
        Self {
            permits: Arc::new(Semaphore::new(degree)),
            degree: AtomicUsize::new(degree),
            tracker,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree.load(Ordering::Acquire)
    }

    /// Raise the number of concurrent workers to `degree`.
    pub fn grow_to(&self, degree: usize) {
        let previous = self.degree.fetch_max(degree, Ordering::AcqRel);
        if degree > previous {
            self.permits.add_permits(degree - previous);
        }
    }

    /// Run `task` once a worker is free. Returns false if the pool has been shut down.
    pub async fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
            return false;
        };
        self.tracker.spawn(async move {
            task.await;
            drop(permit);
        });
        true
    }

    /// Refuse further work. Tasks already running finish normally.
    pub fn shutdown(&self) {
        self.permits.close();
    }

    /// Wait for every spawned task to finish.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    async fn peak_concurrency(pool: &WorkerPool, tasks: usize) -> usize {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        for _ in 0..tasks {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .await;
        }
        pool.wait().await;
        peak.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn starts_serial() {
        let pool = WorkerPool::new(1);
        assert_eq!(peak_concurrency(&pool, 4).await, 1);
    }

    #[tokio::test]
    async fn grows_but_never_shrinks() {
        let pool = WorkerPool::new(1);
        pool.grow_to(3);
        pool.grow_to(2);
        assert_eq!(pool.degree(), 3);
        assert_eq!(peak_concurrency(&pool, 6).await, 3);
    }

    #[tokio::test]
    async fn shutdown_refuses_work() {
        let pool = WorkerPool::new(1);
        pool.shutdown();
        assert!(!pool.spawn(async {}).await);
    }
}
