//! HTTP response DTOs.

use serde::Serialize;

use onechat_shared::ConnectionId;

/// One registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantDto {
    pub id: u64,
    pub name: String,
}

/// Current state of the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStateDto {
    pub participants: Vec<ParticipantDto>,
}

impl From<Vec<(ConnectionId, String)>> for RoomStateDto {
    fn from(entries: Vec<(ConnectionId, String)>) -> Self {
        Self {
            participants: entries
                .into_iter()
                .map(|(id, name)| ParticipantDto {
                    id: id.value(),
                    name,
                })
                .collect(),
        }
    }
}
