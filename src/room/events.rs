//! Notifications delivered by the room and session collaborators.
//!
//! The room SDK's subscription callbacks are modeled as messages into the
//! supervisor rather than as virtual dispatch: an adapter registers short
//! callbacks that forward these events and returns immediately.

use std::fmt;

/// Media kind of a published track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// One notification from the room or session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// The local participant was subscribed to a remote track.
    TrackSubscribed { sid: String, kind: TrackKind },
    /// A previously subscribed track went away.
    TrackUnsubscribed { sid: String },
    /// The session is over; all outstanding work must be cancelled.
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_kind_display() {
        assert_eq!(TrackKind::Video.to_string(), "video");
        assert_eq!(TrackKind::Audio.to_string(), "audio");
    }

    #[test]
    fn test_room_event_equality() {
        let a = RoomEvent::TrackSubscribed {
            sid: "TR_1".to_string(),
            kind: TrackKind::Video,
        };
        let b = RoomEvent::TrackSubscribed {
            sid: "TR_1".to_string(),
            kind: TrackKind::Video,
        };
        assert_eq!(a, b);
        assert_ne!(a, RoomEvent::Disconnected);
    }
}
