//! Typed meeting and attendee views.
//!
//! Decoded XML cannot tell "no children", "one child" and "many children"
//! apart: they come out as `""`, an object and an array respectively. This
//! module resolves that with [`Cardinality`] before anything is handed to
//! the caller, so `meetings` and `attendees` are always lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BbbError, BbbResult};

/// Message key the server uses when no meetings exist.
pub const NO_MEETINGS: &str = "noMeetings";

/// How many elements a decoded field held.
#[derive(Debug, Clone, PartialEq)]
pub enum Cardinality<T> {
    /// The field was missing or empty.
    Empty,
    /// The field held exactly one element.
    Single(T),
    /// The field held several elements.
    Many(Vec<T>),
}

impl Cardinality<Value> {
    /// Classifies a decoded field.
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::String(s)) if s.is_empty() => Self::Empty,
            Some(Value::Array(items)) => Self::Many(items),
            Some(other) => Self::Single(other),
        }
    }
}

impl<T> Cardinality<T> {
    /// Converts to a list, whatever the shape.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(item) => vec![item],
            Self::Many(items) => items,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A participant of a meeting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "isPresenter", default)]
    pub presenter: Option<String>,
    #[serde(rename = "isListeningOnly", default)]
    pub listening_only: Option<String>,
    #[serde(rename = "hasJoinedVoice", default)]
    pub joined_voice: Option<String>,
    #[serde(rename = "hasVideo", default)]
    pub video: Option<String>,
    #[serde(rename = "clientType", default)]
    pub client_type: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attendee {
    /// Returns true if the attendee joined as moderator.
    pub fn is_moderator(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("MODERATOR"))
    }

    /// Returns true if the attendee is the current presenter.
    pub fn is_presenter(&self) -> bool {
        is_true(self.presenter.as_deref())
    }
}

/// A meeting as reported by `getMeetings` or `getMeetingInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(rename = "meetingName", default)]
    pub meeting_name: Option<String>,
    #[serde(rename = "meetingID", default)]
    pub meeting_id: Option<String>,
    #[serde(rename = "internalMeetingID", default)]
    pub internal_meeting_id: Option<String>,
    #[serde(rename = "createTime", default)]
    pub create_time: Option<String>,
    #[serde(rename = "voiceBridge", default)]
    pub voice_bridge: Option<String>,
    #[serde(rename = "attendeePW", default)]
    pub attendee_pw: Option<String>,
    #[serde(rename = "moderatorPW", default)]
    pub moderator_pw: Option<String>,
    #[serde(default)]
    pub running: Option<String>,
    #[serde(rename = "participantCount", default)]
    pub participant_count: Option<String>,
    #[serde(rename = "moderatorCount", default)]
    pub moderator_count: Option<String>,
    /// Always a list after normalization.
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meeting {
    /// Returns true if the server reports the meeting as running.
    pub fn is_running(&self) -> bool {
        is_true(self.running.as_deref())
    }

    /// Returns the participant count, if present and numeric.
    pub fn participant_count(&self) -> Option<u32> {
        self.participant_count.as_deref()?.parse().ok()
    }
}

fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Extracts the meeting list from a decoded `getMeetings` payload.
pub fn meetings_from_payload(payload: &Value) -> BbbResult<Vec<Meeting>> {
    if payload.get("messageKey").and_then(Value::as_str) == Some(NO_MEETINGS) {
        return Ok(Vec::new());
    }

    let meetings = payload
        .get("meetings")
        .and_then(|m| m.get("meeting"))
        .cloned();

    Cardinality::from_value(meetings)
        .into_vec()
        .into_iter()
        .map(normalize_meeting)
        .collect()
}

/// Normalizes one decoded meeting, turning its attendees into a list.
pub fn normalize_meeting(mut value: Value) -> BbbResult<Meeting> {
    if !value.is_object() {
        return Err(BbbError::malformed(format!(
            "expected a meeting element, got {}",
            value
        )));
    }

    if let Some(fields) = value.as_object_mut() {
        let attendees = fields
            .remove("attendees")
            .and_then(|mut a| a.get_mut("attendee").map(Value::take));
        let attendees = Cardinality::from_value(attendees).into_vec();
        fields.insert("attendees".to_string(), Value::Array(attendees));
    }

    serde_json::from_value(value)
        .map_err(|e| BbbError::malformed(format!("invalid meeting element: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cardinality_classification() {
        assert_eq!(Cardinality::from_value(None), Cardinality::Empty);
        assert_eq!(Cardinality::from_value(Some(json!(""))), Cardinality::Empty);
        assert_eq!(
            Cardinality::from_value(Some(json!({"a": "1"}))),
            Cardinality::Single(json!({"a": "1"}))
        );
        assert_eq!(
            Cardinality::from_value(Some(json!([1, 2]))).len(),
            2
        );
    }

    #[test]
    fn into_vec_always_lists() {
        assert!(Cardinality::<u8>::Empty.into_vec().is_empty());
        assert_eq!(Cardinality::Single(1).into_vec(), vec![1]);
        assert_eq!(Cardinality::Many(vec![1, 2, 3]).into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn no_meetings_key_yields_empty_list() {
        let payload = json!({
            "returncode": "SUCCESS",
            "meetings": "",
            "messageKey": "noMeetings",
            "message": "no meetings were found on this server"
        });
        assert!(meetings_from_payload(&payload).unwrap().is_empty());
    }

    #[test]
    fn single_meeting_is_wrapped() {
        let payload = json!({
            "returncode": "SUCCESS",
            "meetings": {
                "meeting": {
                    "meetingName": "Club",
                    "meetingID": "club",
                    "running": "true",
                    "participantCount": "1",
                    "attendees": {
                        "attendee": { "userID": "w_1", "fullName": "Gerald", "role": "MODERATOR" }
                    }
                }
            }
        });
        let meetings = meetings_from_payload(&payload).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].meeting_id.as_deref(), Some("club"));
        assert!(meetings[0].is_running());
        assert_eq!(meetings[0].participant_count(), Some(1));
        assert_eq!(meetings[0].attendees.len(), 1);
        assert!(meetings[0].attendees[0].is_moderator());
    }

    #[test]
    fn attendee_shapes_are_normalized() {
        let payload = json!({
            "returncode": "SUCCESS",
            "meetings": {
                "meeting": [
                    { "meetingID": "empty", "attendees": "" },
                    { "meetingID": "many", "attendees": {
                        "attendee": [
                            { "fullName": "A", "isPresenter": "true" },
                            { "fullName": "B" }
                        ]
                    } },
                    { "meetingID": "missing" }
                ]
            }
        });
        let meetings = meetings_from_payload(&payload).unwrap();
        assert_eq!(meetings.len(), 3);
        assert!(meetings[0].attendees.is_empty());
        assert_eq!(meetings[1].attendees.len(), 2);
        assert!(meetings[1].attendees[0].is_presenter());
        assert!(!meetings[1].attendees[1].is_presenter());
        assert!(meetings[2].attendees.is_empty());
    }

    #[test]
    fn unknown_fields_are_kept() {
        let meeting = normalize_meeting(json!({
            "meetingID": "club",
            "isBreakout": "false",
            "metadata": ""
        }))
        .unwrap();
        assert_eq!(meeting.extra.get("isBreakout"), Some(&json!("false")));
        assert!(meeting.extra.contains_key("metadata"));
    }

    #[test]
    fn non_object_meeting_is_malformed() {
        let err = normalize_meeting(json!("club")).unwrap_err();
        assert!(matches!(err, BbbError::MalformedResponse(_)));
    }
}
