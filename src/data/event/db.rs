use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Event, EventKind};
use crate::data::Store;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreateData {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub location: Option<String>,
}

impl Store {
    pub fn create_event(&self, data: EventCreateData) -> Event {
        let mut events = self.events.write().expect("event table lock poisoned");
        events.insert_with(|id| Event {
            id,
            class_id: data.class_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            kind: data.kind,
            location: data.location,
        })
    }

    pub fn events(&self, class_id: Option<i64>) -> Vec<Event> {
        let events = self.events.read().expect("event table lock poisoned");
        events
            .values()
            .filter(|e| class_id.is_none() || class_id == Some(e.class_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quiz_event(class_id: i64, title: &str) -> EventCreateData {
        EventCreateData {
            class_id,
            title: title.to_string(),
            description: None,
            due_date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            kind: EventKind::Assignment,
            location: None,
        }
    }

    #[test]
    fn events_filter_by_class() {
        let store = Store::new();
        store.create_event(quiz_event(1, "Algebra quiz"));
        store.create_event(quiz_event(2, "History essay"));
        store.create_event(quiz_event(1, "Lab report"));

        assert_eq!(store.events(None).len(), 3);
        assert_eq!(store.events(Some(1)).len(), 2);
        assert_eq!(store.events(Some(3)).len(), 0);
    }
}
