/// Transient toast shown over the page, e.g. "matrix mode enabled".
#[derive(Debug, Default)]
pub struct NotificationState {
    pub current_notification: Option<(String, Option<u64>)>, // message, close_tick
}

impl NotificationState {
    pub fn set_notification(&mut self, message: impl Into<String>, ticks: Option<u64>, tick_count: u64) {
        let close_tick = ticks.map(|duration| tick_count + duration);
        self.current_notification = Some((message.into(), close_tick));
    }

    pub fn clear_notification(&mut self) {
        self.current_notification = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.current_notification.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn should_close_notification(&self, tick_count: u64) -> bool {
        if let Some((_, Some(close_tick))) = &self.current_notification {
            tick_count >= *close_tick
        } else {
            false
        }
    }
}
