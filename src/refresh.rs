//! Background refresh system
//!
//! Background work never touches the quiz store directly. The refresh timer
//! and fetch tasks post [`RefreshMessage`]s into the store's channel, and the
//! store's owner applies them one at a time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::data::FetchError;

/// Capacity of the store's message channel
pub const CHANNEL_CAPACITY: usize = 32;

/// Shortest period a timer will run at
const MIN_TIMER_PERIOD: Duration = Duration::from_secs(1);

/// Messages sent from background tasks to the store
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// The refresh timer fired
    Tick,
    /// A feed fetch completed
    FeedFetched(Result<Vec<u8>, FetchError>),
}

/// Handle to a running refresh timer
///
/// The timer task posts [`RefreshMessage::Tick`] every period, starting one
/// period after it is spawned. Dropping the handle stops the task, so
/// replacing a stored handle cancels the old timer.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTimer {
    /// Spawns a timer task sending ticks to `sender`
    ///
    /// # Arguments
    /// * `period` - Time between ticks (values under one second are raised to one second)
    /// * `sender` - Channel the ticks are posted to
    pub fn spawn(period: Duration, sender: mpsc::Sender<RefreshMessage>) -> Self {
        let period = period.max(MIN_TIMER_PERIOD);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                interval.tick().await;
                if sender.send(RefreshMessage::Tick).await.is_err() {
                    debug!("refresh channel closed, stopping timer");
                    break;
                }
            }
        });

        debug!(period_secs = period.as_secs(), "refresh timer started");
        Self { handle, period }
    }

    /// Time between ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the timer task has stopped
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_ticks(rx: &mut mpsc::Receiver<RefreshMessage>) -> usize {
        let mut ticks = 0;
        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, RefreshMessage::Tick) {
                ticks += 1;
            }
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_every_period() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let _timer = RefreshTimer::spawn(Duration::from_secs(10), tx);

        tokio::time::sleep(Duration::from_secs(35)).await;

        assert_eq!(drain_ticks(&mut rx), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_skips_immediate_tick() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let _timer = RefreshTimer::spawn(Duration::from_secs(10), tx);

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(drain_ticks(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let timer = RefreshTimer::spawn(Duration::from_secs(10), tx);

        tokio::time::sleep(Duration::from_secs(15)).await;
        drop(timer);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(drain_ticks(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_raises_tiny_period() {
        let (tx, _rx) = mpsc::channel(CHANNEL_CAPACITY);
        let timer = RefreshTimer::spawn(Duration::ZERO, tx);

        assert_eq!(timer.period(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let timer = RefreshTimer::spawn(Duration::from_secs(10), tx);

        drop(rx);
        tokio::time::sleep(Duration::from_secs(25)).await;

        assert!(timer.is_finished());
    }
}
