use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use super::types::FormEvent;

/// Fan-out of store write notifications to in-process listeners.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<FormEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns how many listeners received the event; zero when nobody
    /// is listening.
    pub fn publish(&self, event: FormEvent) -> usize {
        tracing::trace!(event = event.kind(), form_id = %event.form_id(), "publishing");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Log every event until the last bus handle is dropped. The task
    /// resolves to the number of events it logged.
    pub fn spawn_logger(&self) -> JoinHandle<usize> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            let mut logged = 0;
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        log_event(&event);
                        logged += 1;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event logger fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            logged
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

fn log_event(event: &FormEvent) {
    match event {
        FormEvent::FormSaved(change) | FormEvent::FormUpdated(change) => tracing::info!(
            event = event.kind(),
            form_id = %change.form_id,
            title = %change.title,
            field_count = change.field_count,
            "form event"
        ),
        FormEvent::SubmissionReceived(received) => tracing::info!(
            event = event.kind(),
            form_id = %received.form_id,
            submission_id = %received.submission_id,
            value_count = received.value_count,
            "form event"
        ),
    }
}
