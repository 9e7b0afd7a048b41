use serde::Serialize;
use tokio::sync::broadcast;

/// Notifications emitted by the render pipeline and the update dispatcher.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    RenderUpdated {
        length: usize,
        timestamp: i64,
    },
    DispatchRetry {
        action: String,
        attempt: u32,
        delay_ms: u64,
    },
    DispatchFailed {
        action: String,
        error: String,
    },
    DispatchSucceeded {
        action: String,
        result: serde_json::Value,
    },
    DispatchCancelled {
        count: usize,
    },
    ConnectivityChanged {
        online: bool,
    },
    VisibilityChanged {
        visible: bool,
    },
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Wall-clock Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::RenderUpdated {
            length: 42,
            timestamp: 1,
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::RenderUpdated { length: 42, .. }));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::DispatchCancelled { count: 2 });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, Event::DispatchCancelled { count: 2 }));
        assert!(matches!(e2, Event::DispatchCancelled { count: 2 }));
    }

    #[tokio::test]
    async fn dispatch_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::DispatchRetry {
            action: "save_setting".into(),
            attempt: 1,
            delay_ms: 1000,
        });
        bus.publish(Event::DispatchFailed {
            action: "save_setting".into(),
            error: "request timed out".into(),
        });
        bus.publish(Event::DispatchSucceeded {
            action: "reset".into(),
            result: serde_json::json!({"ok": true}),
        });

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, Event::DispatchRetry { attempt: 1, delay_ms: 1000, .. }));

        let e2 = rx.recv().await.unwrap();
        assert!(matches!(
            e2,
            Event::DispatchFailed { ref error, .. } if error == "request timed out"
        ));

        let e3 = rx.recv().await.unwrap();
        assert!(matches!(e3, Event::DispatchSucceeded { ref action, .. } if action == "reset"));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(Event::ConnectivityChanged { online: false });
        assert_eq!(count, 0);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::RenderUpdated {
            length: 10,
            timestamp: 1700000000000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RenderUpdated");
        assert_eq!(json["data"]["length"], 10);
    }

    #[test]
    fn now_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
