//! Real-time messaging hub.
//!
//! A broadcast fan-out between server components and connected clients,
//! carrying the CORS allow-list the transport layer enforces. Subscribing or
//! publishing never touches the network; the transport adapters sit above
//! this handle.

use tokio::sync::broadcast;
use tracing::debug;

use crate::config::{ConfigMap, RealtimeConfig};
use crate::error::BootstrapError;

/// One published event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub topic: String,
    pub data: String,
}

#[derive(Debug)]
pub struct RealtimeHub {
    tx: broadcast::Sender<Event>,
    cors_allowed_origins: Vec<String>,
}

impl RealtimeHub {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let section: RealtimeConfig = config.section("realtime")?;
        if section.capacity == 0 {
            return Err(BootstrapError::resource(
                "realtime",
                "channel capacity must be non-zero",
            ));
        }
        let (tx, _) = broadcast::channel(section.capacity);
        debug!(
            capacity = section.capacity,
            origins = ?section.cors_allowed_origins,
            "realtime hub ready"
        );
        Ok(Self {
            tx,
            cors_allowed_origins: section.cors_allowed_origins,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers; returns how many
    /// received it (zero when nobody is listening — not an error).
    pub fn publish(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn cors_allowed_origins(&self) -> &[String] {
        &self.cors_allowed_origins
    }

    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.cors_allowed_origins
            .iter()
            .any(|allowed| allowed == "*" || allowed == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigMap, defaults};

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let hub = RealtimeHub::from_config(&defaults()).unwrap();
        let mut rx = hub.subscribe();
        let delivered = hub.publish(Event {
            topic: "position".into(),
            data: "{}".into(),
        });
        assert_eq!(delivered, 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, "position");
    }

    #[test]
    fn publish_without_subscribers_delivers_nowhere() {
        let hub = RealtimeHub::from_config(&defaults()).unwrap();
        let delivered = hub.publish(Event {
            topic: "position".into(),
            data: "{}".into(),
        });
        assert_eq!(delivered, 0);
    }

    #[test]
    fn wildcard_origin_allows_everything() {
        let hub = RealtimeHub::from_config(&defaults()).unwrap();
        assert!(hub.origin_allowed("https://anywhere.example"));
    }

    #[test]
    fn explicit_origin_list_is_exact() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(
                serde_yaml::from_str(
                    "realtime:\n  cors_allowed_origins: [\"https://hq.example\"]\n",
                )
                .unwrap(),
            )
            .unwrap(),
        );
        let hub = RealtimeHub::from_config(&cfg).unwrap();
        assert!(hub.origin_allowed("https://hq.example"));
        assert!(!hub.origin_allowed("https://elsewhere.example"));
    }

    #[test]
    fn zero_capacity_fails_construction() {
        let mut cfg = defaults();
        cfg.merge_overlay(
            ConfigMap::from_value(serde_yaml::from_str("realtime:\n  capacity: 0\n").unwrap())
                .unwrap(),
        );
        let err = RealtimeHub::from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::ResourceInit { resource: "realtime", .. }
        ));
    }
}
