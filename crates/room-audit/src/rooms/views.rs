use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Equipment, EquipmentChecklist, Review, Room, RoomStatus};
use super::offices::{floor_display, OfficeDirectory};

/// One checklist entry rendered for clients.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentEntryView {
    pub item: Equipment,
    pub label: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: String,
    pub number: String,
    pub office: String,
    pub office_name: String,
    pub floor: String,
    pub floor_label: String,
    pub status: RoomStatus,
    pub status_label: &'static str,
    pub equipment: Vec<EquipmentEntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_note: Option<String>,
    pub review_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub recorded_at: DateTime<Utc>,
    pub equipment: Vec<EquipmentEntryView>,
    pub note: String,
    pub has_photo: bool,
}

pub fn room_view(room: &Room, offices: &OfficeDirectory) -> RoomView {
    let office_name = offices
        .get(&room.office)
        .map(|office| office.name.to_string())
        .unwrap_or_else(|| room.office.clone());

    RoomView {
        id: room.id.0.clone(),
        number: room.number.clone(),
        office: room.office.clone(),
        office_name,
        floor: room.floor.clone(),
        floor_label: floor_display(&room.floor),
        status: room.status(),
        status_label: room.status().label(),
        equipment: equipment_entries(room.equipment),
        last_reviewed_at: room.last_reviewed_at,
        last_note: room.last_note.clone(),
        review_count: room.history.len(),
    }
}

pub fn review_view(review: &Review) -> ReviewView {
    ReviewView {
        recorded_at: review.recorded_at,
        equipment: equipment_entries(review.equipment),
        note: review.note.clone(),
        has_photo: review.photo.is_some(),
    }
}

pub fn equipment_entries(checklist: EquipmentChecklist) -> Vec<EquipmentEntryView> {
    checklist
        .entries()
        .map(|(item, present)| EquipmentEntryView {
            item,
            label: item.label(),
            present,
        })
        .collect()
}
