use chrono::{DateTime, Utc};

use super::domain::{EquipmentChecklist, Photo, RegistryError, Review, RoomId};
use super::registry::RoomRegistry;

/// Input for one review. The checklist is a full replacement: flags left
/// unchecked on the form arrive as false and overwrite the previous state.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub equipment: EquipmentChecklist,
    pub note: String,
    pub photo: Option<Photo>,
}

/// The only mutator of a room's checklist and history after creation.
/// There is no undo or edit; a mistake is corrected by recording another
/// review.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewRecorder;

impl ReviewRecorder {
    pub fn record<'a>(
        &self,
        registry: &'a mut RoomRegistry,
        id: &RoomId,
        input: ReviewInput,
    ) -> Result<&'a Review, RegistryError> {
        self.record_at(registry, id, input, Utc::now())
    }

    /// Timestamped variant so callers and tests control the clock.
    pub fn record_at<'a>(
        &self,
        registry: &'a mut RoomRegistry,
        id: &RoomId,
        input: ReviewInput,
        recorded_at: DateTime<Utc>,
    ) -> Result<&'a Review, RegistryError> {
        let room = registry
            .get_mut(id)
            .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;

        room.equipment = input.equipment;
        room.last_reviewed_at = Some(recorded_at);
        room.last_note = Some(input.note.clone());
        room.history.push(Review {
            recorded_at,
            equipment: input.equipment,
            note: input.note,
            photo: input.photo,
        });

        Ok(&room.history[room.history.len() - 1])
    }
}
