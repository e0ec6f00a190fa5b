//! Refresh lifecycle broadcasting

use tokio::sync::broadcast;

use crate::events::RefreshEvent;

const CHANNEL_CAPACITY: usize = 256;

pub struct EventManager {
    event_tx: broadcast::Sender<RefreshEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast a refresh event. Having no subscribers is not an error.
    pub fn emit(&self, event: RefreshEvent) {
        tracing::debug!("Broadcasting refresh event: {:?}", event.event_type);
        if let Ok(count) = self.event_tx.send(event) {
            tracing::trace!("Refresh event sent to {} receivers", count);
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RefreshEventType;

    #[test]
    fn test_emit_without_subscribers() {
        let manager = EventManager::new();
        manager.emit(RefreshEvent::started());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let manager = EventManager::new();
        let mut receiver1 = manager.subscribe();
        let mut receiver2 = manager.subscribe();

        manager.emit(RefreshEvent::completed(3, 0));

        let received1 = receiver1.recv().await.unwrap();
        let received2 = receiver2.recv().await.unwrap();

        assert!(matches!(
            received1.event_type,
            RefreshEventType::Completed { issue_count: 3, .. }
        ));
        assert_eq!(received1.event_type, received2.event_type);
    }
}
