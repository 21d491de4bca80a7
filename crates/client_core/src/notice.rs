use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// One outstanding delayed task. Scheduling replaces the previous task and
/// dropping the timer aborts whatever is still pending.
#[derive(Default)]
pub struct NoticeTimer {
    task: Option<JoinHandle<()>>,
}

impl NoticeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, after: Duration, on_elapsed: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_elapsed.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    fn counting(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_the_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NoticeTimer::new();
        timer.schedule(Duration::from_secs(3), counting(&fired));

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_previous_task() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NoticeTimer::new();
        timer.schedule(Duration::from_secs(3), counting(&fired));
        timer.schedule(Duration::from_secs(3), counting(&fired));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_the_task() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NoticeTimer::new();
        timer.schedule(Duration::from_secs(3), counting(&fired));
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
