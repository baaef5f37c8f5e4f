use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{RegistryError, Review, Room, RoomId};
use super::offices::GROUND_FLOOR;
use super::registry::RoomRegistry;

/// Optional criteria for the room listing. `text` is matched
/// case-insensitively against the room number, office code, and last note;
/// any one hit includes the room.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub office: Option<String>,
    pub floor: Option<String>,
    pub text: Option<String>,
}

/// Inclusive calendar-date bounds for history queries; the end bound
/// covers its whole day.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct HistoryRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl HistoryRange {
    pub fn contains(&self, review: &Review) -> bool {
        let date = review.recorded_at.date_naive();
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Rooms matching the filter, sorted by floor then numeric sequence.
pub fn list_rooms<'a>(registry: &'a RoomRegistry, filter: &RoomFilter) -> Vec<&'a Room> {
    let mut rooms: Vec<&Room> = registry
        .rooms()
        .iter()
        .filter(|room| matches_filter(room, filter))
        .collect();
    rooms.sort_by_key(|room| sort_key(room));
    rooms
}

/// Reviews for a room within the range, newest first.
pub fn list_history<'a>(
    registry: &'a RoomRegistry,
    id: &RoomId,
    range: &HistoryRange,
) -> Result<Vec<&'a Review>, RegistryError> {
    let room = registry
        .get(id)
        .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;

    let mut reviews: Vec<&Review> = room
        .history
        .iter()
        .filter(|review| range.contains(review))
        .collect();
    reviews.reverse();
    Ok(reviews)
}

fn matches_filter(room: &Room, filter: &RoomFilter) -> bool {
    if let Some(office) = normalized(filter.office.as_deref()) {
        if room.office != office {
            return false;
        }
    }
    if let Some(floor) = normalized(filter.floor.as_deref()) {
        if room.floor != floor {
            return false;
        }
    }

    match normalized(filter.text.as_deref()) {
        None => true,
        Some(text) => {
            let needle = text.to_lowercase();
            room.number.to_lowercase().contains(&needle)
                || room.office.to_lowercase().contains(&needle)
                || room
                    .last_note
                    .as_deref()
                    .map(|note| note.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        }
    }
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Ground floor first, numeric floors ascending, non-parseable labels
/// last; within a floor the sequence ascends with malformed numbers at the
/// end. The sort is stable, so insertion order breaks remaining ties.
fn sort_key(room: &Room) -> (u8, i64, u32) {
    let (band, level) = floor_rank(&room.floor);
    (band, level, room.sequence().unwrap_or(u32::MAX))
}

pub(crate) fn floor_rank(floor: &str) -> (u8, i64) {
    if floor == GROUND_FLOOR {
        return (0, 0);
    }
    match floor.trim().parse::<i64>() {
        Ok(level) => (1, level),
        Err(_) => (2, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rank_orders_ground_numeric_then_other() {
        let mut floors = vec!["10", "T", "2", "mezzanine", "1"];
        floors.sort_by_key(|floor| floor_rank(floor));
        assert_eq!(floors, ["T", "1", "2", "10", "mezzanine"]);
    }
}
