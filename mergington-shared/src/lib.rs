pub mod config;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use config::*;

/// An extracurricular activity and the students enrolled in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub description: String,
    pub schedule: String,
    pub max_participants: usize,
    /// Emails of the enrolled students, in signup order.
    pub participants: Vec<String>,
}

impl ActivityRecord {
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Number of places still available.
    pub fn spots_left(&self) -> usize {
        self.max_participants.saturating_sub(self.participants.len())
    }
}

/// All activities, keyed by name.
pub type Activities = BTreeMap<String, ActivityRecord>;

/// Body of a successful signup or unregister.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a rejected request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

/// A message on the `/activities/stream` endpoint.
///
/// Each message is serialized as json on its own line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatusUpdate {
    Activities(Activities),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(max: usize, participants: &[&str]) -> ActivityRecord {
        ActivityRecord {
            description: "Chess".to_owned(),
            schedule: "Fridays".to_owned(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_capacity() {
        let open = record(2, &["a@mergington.edu"]);
        assert!(!open.is_full());
        assert_eq!(open.spots_left(), 1);

        let full = record(1, &["a@mergington.edu"]);
        assert!(full.is_full());
        assert_eq!(full.spots_left(), 0);
    }

    #[test]
    fn test_has_participant() {
        let r = record(5, &["a@mergington.edu", "b@mergington.edu"]);
        assert!(r.has_participant("b@mergington.edu"));
        assert!(!r.has_participant("c@mergington.edu"));
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record(3, &["a@mergington.edu"])).unwrap();
        assert_eq!(json["max_participants"], 3);
        assert_eq!(json["participants"][0], "a@mergington.edu");
        assert!(json["description"].is_string());
        assert!(json["schedule"].is_string());
    }
}
