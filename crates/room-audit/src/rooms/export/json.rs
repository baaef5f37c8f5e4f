use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExportError;
use crate::rooms::domain::{Review, Room};

/// Serialized history export. Mirrors exactly the selection the caller
/// made; an empty review list is a valid document.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryDocument<'a> {
    pub room: RoomHeader<'a>,
    pub reviews: Vec<&'a Review>,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomHeader<'a> {
    pub number: &'a str,
    pub floor: &'a str,
    pub office: &'a str,
}

impl<'a> HistoryDocument<'a> {
    pub fn new(room: &'a Room, reviews: &[&'a Review], exported_at: DateTime<Utc>) -> Self {
        Self {
            room: RoomHeader {
                number: &room.number,
                floor: &room.floor,
                office: &room.office,
            },
            reviews: reviews.to_vec(),
            exported_at,
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
