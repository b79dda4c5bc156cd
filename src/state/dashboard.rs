use std::time::Duration;

use chrono::{DateTime, Local};
use chrono_humanize::{Accuracy, HumanTime, Tense};
use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::AppEvent;
use crate::services::{spawn_probe, Ticker};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Latency {
    #[default]
    Idle,
    Pending,
    Measured(Duration),
    Failed(String),
}

impl std::fmt::Display for Latency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Latency::Idle => write!(f, "-"),
            Latency::Pending => write!(f, "measuring..."),
            Latency::Measured(d) => write!(f, "{} ms", d.as_millis()),
            Latency::Failed(reason) => write!(f, "unreachable ({reason})"),
        }
    }
}

/// System dashboard widget. The figures are decorative: CPU and memory are
/// random walks, uptime counts from session start and latency comes from a
/// single TCP connect when the widget opens.
#[derive(Debug)]
pub struct Dashboard {
    ticker: Ticker,
    started: DateTime<Local>,
    cpu: u8,
    memory: u8,
    latency: Latency,
    refreshes: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Dashboard {
    pub fn new(started: DateTime<Local>) -> Self {
        Self {
            ticker: Ticker::new(),
            started,
            cpu: 12,
            memory: 40,
            latency: Latency::Idle,
            refreshes: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn cpu(&self) -> u8 {
        self.cpu
    }

    pub fn memory(&self) -> u8 {
        self.memory
    }

    pub fn latency(&self) -> &Latency {
        &self.latency
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Start the refresh timer and fire a probe when the widget becomes
    /// visible; stop the timer when it is hidden.
    pub fn sync(&mut self, open: bool, tx: &UnboundedSender<AppEvent>, probe_addr: &str) {
        match (open, self.ticker.is_running()) {
            (true, false) => {
                self.ticker.start(REFRESH_INTERVAL, tx.clone(), AppEvent::DashboardRefresh);
                self.latency = Latency::Pending;
                spawn_probe(probe_addr.to_string(), tx.clone(), AppEvent::Latency);
                debug!(%probe_addr, "dashboard opened");
            }
            (false, true) => {
                self.ticker.stop();
                debug!(refreshes = self.refreshes, "dashboard hidden");
            }
            _ => {}
        }
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    /// Roll new figures. Stale refreshes are ignored.
    pub fn on_refresh(&mut self, generation: u64, rng: &mut impl Rng) -> bool {
        if !self.ticker.accepts(generation) {
            return false;
        }
        self.cpu = walk(self.cpu, rng.gen_range(-15..=15), 3, 97);
        self.memory = walk(self.memory, rng.gen_range(-5..=5), 20, 90);
        self.refreshes += 1;
        true
    }

    pub fn on_latency(&mut self, result: Result<Duration, String>) {
        self.latency = match result {
            Ok(d) => Latency::Measured(d),
            Err(reason) => Latency::Failed(reason),
        };
    }

    pub fn uptime_text(&self, now: DateTime<Local>) -> String {
        let elapsed = now.signed_duration_since(self.started);
        HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Present)
    }
}

fn walk(value: u8, delta: i32, min: u8, max: u8) -> u8 {
    (value as i32 + delta).clamp(min as i32, max as i32) as u8
}
