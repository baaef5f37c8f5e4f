use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for registered rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl RoomId {
    /// Ids derive from the office code and room number, case-normalized,
    /// and are unique across the whole registry.
    pub fn derive(office: &str, number: &str) -> Self {
        Self(format!("{office}-{number}").to_lowercase())
    }

    /// Normalize an externally supplied id (path parameter, CLI argument).
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed checklist of equipment tracked for every meeting room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Tv,
    RemoteControl,
    ExtensionLine,
    Videoconference,
    Manual,
    Monitor,
}

impl Equipment {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Tv,
            Self::RemoteControl,
            Self::ExtensionLine,
            Self::Videoconference,
            Self::Manual,
            Self::Monitor,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::RemoteControl => "Remote control",
            Self::ExtensionLine => "Extension line",
            Self::Videoconference => "Videoconference",
            Self::Manual => "Manual",
            Self::Monitor => "Monitor",
        }
    }
}

/// Presence flags for the checklist. Flags omitted from an input payload
/// deserialize to false, matching unchecked boxes on the review form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChecklist {
    #[serde(default)]
    pub tv: bool,
    #[serde(default)]
    pub remote_control: bool,
    #[serde(default)]
    pub extension_line: bool,
    #[serde(default)]
    pub videoconference: bool,
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub monitor: bool,
}

impl EquipmentChecklist {
    pub fn is_present(self, item: Equipment) -> bool {
        match item {
            Equipment::Tv => self.tv,
            Equipment::RemoteControl => self.remote_control,
            Equipment::ExtensionLine => self.extension_line,
            Equipment::Videoconference => self.videoconference,
            Equipment::Manual => self.manual,
            Equipment::Monitor => self.monitor,
        }
    }

    pub fn set(&mut self, item: Equipment, present: bool) {
        match item {
            Equipment::Tv => self.tv = present,
            Equipment::RemoteControl => self.remote_control = present,
            Equipment::ExtensionLine => self.extension_line = present,
            Equipment::Videoconference => self.videoconference = present,
            Equipment::Manual => self.manual = present,
            Equipment::Monitor => self.monitor = present,
        }
    }

    /// Checklist entries in display order.
    pub fn entries(self) -> impl Iterator<Item = (Equipment, bool)> {
        Equipment::ordered()
            .into_iter()
            .map(move |item| (item, self.is_present(item)))
    }
}

/// Inspection photo attached to a review. Local captures embed the image
/// bytes; a server-backed deployment stores a path reference instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Photo {
    Embedded {
        media_type: String,
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
    },
    Stored {
        path: String,
    },
}

impl Photo {
    pub fn embedded(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Embedded {
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Base64 transport encoding for embedded photo bytes.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        STANDARD.decode(raw.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// One immutable inspection record. Appended by the recorder, never edited
/// or removed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub recorded_at: DateTime<Utc>,
    pub equipment: EquipmentChecklist,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

/// Derived from the presence of a last review; never set by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Reviewed,
    NeverReviewed,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reviewed => "Reviewed",
            Self::NeverReviewed => "Never reviewed",
        }
    }
}

/// A trackable meeting space. `last_reviewed_at` and `last_note` mirror the
/// newest history entry; `history` is append-only and ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub office: String,
    pub floor: String,
    pub number: String,
    #[serde(default)]
    pub equipment: EquipmentChecklist,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_note: Option<String>,
    #[serde(default)]
    pub history: Vec<Review>,
}

impl Room {
    pub(crate) fn new(office: &str, floor: &str, number: String) -> Self {
        Self {
            id: RoomId::derive(office, &number),
            office: office.to_string(),
            floor: floor.to_string(),
            number,
            equipment: EquipmentChecklist::default(),
            last_reviewed_at: None,
            last_note: None,
            history: Vec::new(),
        }
    }

    /// Positive numeric sequence suffix of the room number, when the number
    /// is well-formed (`"<floor>.<seq>"`).
    pub fn sequence(&self) -> Option<u32> {
        let (_, suffix) = self.number.rsplit_once('.')?;
        let parsed = suffix.parse::<u32>().ok()?;
        (parsed > 0).then_some(parsed)
    }

    pub fn status(&self) -> RoomStatus {
        if self.last_reviewed_at.is_some() {
            RoomStatus::Reviewed
        } else {
            RoomStatus::NeverReviewed
        }
    }
}

/// Validation and lookup failures for registry operations. All are surfaced
/// before any state mutation occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown office code {0}")]
    UnknownOffice(String),
    #[error("office {office} has no floor {floor}")]
    UnknownFloor { office: String, floor: String },
    #[error("floor {floor} at {office} already holds its maximum of {capacity} rooms")]
    FloorFull {
        office: String,
        floor: String,
        capacity: usize,
    },
    #[error("room {0} already exists")]
    DuplicateRoom(RoomId),
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_is_case_normalized() {
        assert_eq!(RoomId::derive("MG", "9.2"), RoomId("mg-9.2".to_string()));
        assert_eq!(RoomId::parse("  MG-9.2 "), RoomId("mg-9.2".to_string()));
    }

    #[test]
    fn sequence_ignores_malformed_numbers() {
        let mut room = Room::new("MG", "9", "9.4".to_string());
        assert_eq!(room.sequence(), Some(4));

        room.number = "CEO".to_string();
        assert_eq!(room.sequence(), None);

        room.number = "9.0".to_string();
        assert_eq!(room.sequence(), None);

        room.number = "9.x".to_string();
        assert_eq!(room.sequence(), None);
    }

    #[test]
    fn checklist_flags_default_to_false_when_omitted() {
        let checklist: EquipmentChecklist =
            serde_json::from_str(r#"{"tv": true, "monitor": true}"#).expect("checklist parses");
        assert!(checklist.tv);
        assert!(checklist.monitor);
        assert!(!checklist.remote_control);
        assert!(!checklist.extension_line);
        assert!(!checklist.videoconference);
        assert!(!checklist.manual);
    }

    #[test]
    fn embedded_photo_round_trips_as_base64() {
        let photo = Photo::embedded("image/jpeg", vec![0xFF, 0xD8, 0xFF]);
        let encoded = serde_json::to_value(&photo).expect("photo serializes");
        assert_eq!(encoded["kind"], "embedded");
        assert_eq!(encoded["bytes"], "/9j/");

        let decoded: Photo = serde_json::from_value(encoded).expect("photo parses");
        assert_eq!(decoded, photo);
    }
}
