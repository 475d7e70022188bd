use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::error::FetchError;
use crate::model::report::LastUpdate;
use crate::repository::ReportSource;
use crate::service::view_state::LOADING_MESSAGE;

pub const REFRESH_FAILED_TEXT: &str = "خطا در بارگذاری";

pub fn last_update_text(result: &Result<LastUpdate, FetchError>) -> String {
    match result {
        Ok(update) => update.display_text(),
        Err(_) => REFRESH_FAILED_TEXT.to_string(),
    }
}

/// Repeating last-update fetch. The task stops when the handle is cancelled
/// or dropped.
pub struct RefreshHandle {
    text: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Fetches immediately, then once per `period`. Must be called from
    /// within a tokio runtime.
    pub fn spawn<S>(source: S, period: Duration) -> Self
    where
        S: ReportSource + Send + Sync + 'static,
    {
        let (tx, rx) = watch::channel(LOADING_MESSAGE.to_string());
        let period = period.max(Duration::from_secs(1));

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = source.last_update().await;
                match &result {
                    Ok(update) => debug!("Last update: {:?}", update.parsed_timestamp()),
                    Err(err) => warn!("Loading last update failed: {}", err),
                }
                if tx.send(last_update_text(&result)).is_err() {
                    break;
                }
            }
        });

        Self { text: rx, task }
    }

    /// Latest published text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.text.clone()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::MockSource;
    use std::sync::atomic::Ordering;

    #[tokio::test(start_paused = true)]
    async fn test_publishes_immediately_then_every_period() {
        let source = MockSource {
            last_update: Some(LastUpdate {
                has_data: true,
                jalali: Some("1404/07/24 11:35:00".to_string()),
                timestamp: None,
            }),
            ..MockSource::default()
        };
        let calls = source.calls.clone();

        let handle = RefreshHandle::spawn(source, Duration::from_secs(30));
        assert_eq!(handle.text(), LOADING_MESSAGE);

        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "1404/07/24 11:35:00");

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_text() {
        let handle = RefreshHandle::spawn(MockSource::default(), Duration::from_secs(30));
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), REFRESH_FAILED_TEXT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_refreshing() {
        let source = MockSource::default();
        let calls = source.calls.clone();

        let handle = RefreshHandle::spawn(source, Duration::from_secs(30));
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_refreshing() {
        let source = MockSource::default();
        let calls = source.calls.clone();

        let handle = RefreshHandle::spawn(source, Duration::from_secs(30));
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
