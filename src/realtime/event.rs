//! Realtime events: What the push channel delivers.

use crate::error::MalformedRealtimeEvent;
use crate::post::Post;
use serde_json::Value;

/// Event name for a newly published post.
pub const ADD_EVENT: &str = "add";
/// Event name for an edited post.
pub const EDIT_EVENT: &str = "edit";

/// An undecoded event as received from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Event name.
    pub name: String,
    /// JSON payload.
    pub data: Value,
}

impl RawEvent {
    /// Create a raw event.
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A decoded realtime event.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    /// A new post to insert at the head.
    Add(Post),
    /// A new version of an existing post.
    Edit(Post),
}

impl RealtimeEvent {
    /// Decode a raw event.
    ///
    /// Returns `Ok(None)` for event names this engine does not consume.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRealtimeEvent`] when an `add`/`edit` payload is not a post.
    pub fn parse(raw: &RawEvent) -> Result<Option<Self>, MalformedRealtimeEvent> {
        let wrap: fn(Post) -> Self = match raw.name.as_str() {
            ADD_EVENT => Self::Add,
            EDIT_EVENT => Self::Edit,
            _ => return Ok(None),
        };

        let malformed = |reason: String| MalformedRealtimeEvent {
            event: raw.name.clone(),
            reason,
        };
        let post = Post::from_value(&raw.data).map_err(|err| malformed(err.to_string()))?;

        // Pages may omit markup; a pushed post without any is unrenderable.
        let has_markup = ["content", "rendered_entity"]
            .iter()
            .any(|key| raw.data.get(key).is_some_and(Value::is_string));
        if !has_markup {
            return Err(malformed("missing field `content`".to_string()));
        }
        Ok(Some(wrap(post)))
    }

    /// The post carried by the event.
    pub const fn post(&self) -> &Post {
        match self {
            Self::Add(post) | Self::Edit(post) => post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_add_and_edit() {
        let add = RawEvent::new("add", json!({ "id": 4, "created": 40, "content": "new" }));
        let edit = RawEvent::new("edit", json!({ "id": 2, "created": 20, "content": "fixed" }));

        assert!(matches!(RealtimeEvent::parse(&add), Ok(Some(RealtimeEvent::Add(_)))));
        let parsed = RealtimeEvent::parse(&edit).unwrap().unwrap();
        assert_eq!(parsed.post().content, "fixed");
    }

    #[test]
    fn test_parse_unknown_event() {
        let raw = RawEvent::new("delete", json!({ "id": 1 }));
        assert!(matches!(RealtimeEvent::parse(&raw), Ok(None)));
    }

    #[test]
    fn test_parse_requires_markup() {
        let raw = RawEvent::new("add", json!({ "id": 4, "created": 40 }));
        let err = RealtimeEvent::parse(&raw).unwrap_err();
        assert!(err.reason.contains("content"));

        let raw = RawEvent::new("edit", json!({ "id": 4, "created": 40, "content": null }));
        assert!(RealtimeEvent::parse(&raw).is_err());

        let raw = RawEvent::new("add", json!({ "id": 4, "created": 40, "rendered_entity": "<p>x</p>" }));
        assert_eq!(RealtimeEvent::parse(&raw).unwrap().unwrap().post().content, "<p>x</p>");
    }

    #[test]
    fn test_parse_malformed() {
        let raw = RawEvent::new("add", json!({ "content": "no id" }));
        let err = RealtimeEvent::parse(&raw).unwrap_err();
        assert_eq!(err.event, "add");
        assert!(err.reason.contains("id"));
    }
}
