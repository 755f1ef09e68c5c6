use tokio::sync::broadcast;

use crate::models::domain::{AttemptRecord, Bundle, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Success, title, description)
    }

    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, title, description)
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Error, title, description)
    }

    fn with_level(level: NotificationLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Notification(Notification),
    SessionChanged(Option<Identity>),
    PublicationChanged(Option<Bundle>),
    AttemptRecorded(AttemptRecord),
}

/// Fan-out of store changes to whichever views are subscribed.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AppEvent) {
        // no subscribers is fine: nothing is rendering right now
        if self.sender.send(event).is_err() {
            log::trace!("No subscribers for event");
        }
    }

    pub fn notify(&self, notification: Notification) {
        self.publish(AppEvent::Notification(notification));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Drains whatever is queued on a receiver without waiting.
pub fn drain(receiver: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                log::warn!("Event receiver lagged, {} events skipped", skipped);
            }
            Err(_) => break,
        }
    }
    events
}
