use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Repeating timer that feeds events into the app loop.
///
/// Every start gets a new generation number, carried by each event it sends.
/// Events from an earlier generation may still sit in the channel after a
/// stop; `accepts` rejects them so nothing draws after deactivation.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    generation: u64,
    period: Duration,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer. The first event is sent immediately.
    pub fn start<T, F>(&mut self, period: Duration, tx: UnboundedSender<T>, make: F)
    where
        T: Send + 'static,
        F: Fn(u64) -> T + Send + 'static,
    {
        self.stop();
        self.generation += 1;
        self.period = period;
        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(make(generation)).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True only for events sent by the currently running timer.
    pub fn accepts(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
