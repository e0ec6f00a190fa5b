use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshEvent {
    pub event_type: RefreshEventType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefreshEventType {
    Started,
    Completed {
        issue_count: usize,
        error_count: usize,
    },
    /// Another refresh was already running
    Skipped,
}

impl RefreshEvent {
    pub fn started() -> Self {
        Self {
            event_type: RefreshEventType::Started,
            timestamp: Utc::now(),
        }
    }

    pub fn completed(issue_count: usize, error_count: usize) -> Self {
        Self {
            event_type: RefreshEventType::Completed {
                issue_count,
                error_count,
            },
            timestamp: Utc::now(),
        }
    }

    pub fn skipped() -> Self {
        Self {
            event_type: RefreshEventType::Skipped,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_event_serialization() {
        let event = RefreshEvent::completed(42, 1);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"]["type"], "completed");
        assert_eq!(json["event_type"]["issue_count"], 42);

        let deserialized: RefreshEvent = serde_json::from_value(json).unwrap();
        assert_eq!(
            deserialized.event_type,
            RefreshEventType::Completed {
                issue_count: 42,
                error_count: 1
            }
        );
    }

    #[test]
    fn test_skipped_event_serialization() {
        let json = serde_json::to_string(&RefreshEvent::skipped()).unwrap();
        assert!(json.contains("\"type\":\"skipped\""));
    }
}
