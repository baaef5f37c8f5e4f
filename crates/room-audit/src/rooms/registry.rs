use std::collections::HashSet;

use serde::Serialize;

use super::domain::{RegistryError, Room, RoomId};
use super::offices::OfficeDirectory;

/// Owns the room collection for one dataset and enforces the per-floor
/// capacity and id uniqueness invariants.
#[derive(Debug)]
pub struct RoomRegistry {
    offices: OfficeDirectory,
    rooms: Vec<Room>,
}

/// Aggregate result of a bulk delete. Successful removals are kept even
/// when other ids turn out to be missing.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BulkDeleteOutcome {
    pub removed: Vec<RoomId>,
    pub missing: Vec<RoomId>,
}

impl RoomRegistry {
    pub fn new(offices: OfficeDirectory) -> Self {
        Self {
            offices,
            rooms: Vec::new(),
        }
    }

    /// Rebuild a registry from persisted rooms, rejecting duplicate ids.
    pub fn from_rooms(offices: OfficeDirectory, rooms: Vec<Room>) -> Result<Self, RegistryError> {
        let mut seen: HashSet<RoomId> = HashSet::with_capacity(rooms.len());
        for room in &rooms {
            if !seen.insert(room.id.clone()) {
                return Err(RegistryError::DuplicateRoom(room.id.clone()));
            }
        }
        Ok(Self { offices, rooms })
    }

    pub fn offices(&self) -> &OfficeDirectory {
        &self.offices
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| &room.id == id)
    }

    pub fn rooms_on_floor<'a>(
        &'a self,
        office: &'a str,
        floor: &'a str,
    ) -> impl Iterator<Item = &'a Room> {
        self.rooms
            .iter()
            .filter(move |room| room.office == office && room.floor == floor)
    }

    /// First-fit room number: the smallest positive sequence not in use on
    /// the floor, so a number freed by deletion is handed out again.
    /// Malformed existing numbers are ignored.
    pub fn next_room_number(&self, office: &str, floor: &str) -> Result<String, RegistryError> {
        self.floor_capacity(office, floor)?;

        let used: HashSet<u32> = self
            .rooms_on_floor(office, floor)
            .filter_map(Room::sequence)
            .collect();

        let mut candidate = 1u32;
        while used.contains(&candidate) {
            candidate += 1;
        }

        Ok(format!("{floor}.{candidate}"))
    }

    /// Register a new room on the given floor. Validation happens before
    /// any mutation; the duplicate check is defensive, the numbering
    /// scheme already avoids collisions.
    pub fn create_room(&mut self, office: &str, floor: &str) -> Result<&Room, RegistryError> {
        let capacity = self.floor_capacity(office, floor)?;
        let occupied = self.rooms_on_floor(office, floor).count();
        if occupied >= capacity {
            return Err(RegistryError::FloorFull {
                office: office.to_string(),
                floor: floor.to_string(),
                capacity,
            });
        }

        let number = self.next_room_number(office, floor)?;
        let room = Room::new(office, floor, number);
        if self.get(&room.id).is_some() {
            return Err(RegistryError::DuplicateRoom(room.id));
        }

        self.rooms.push(room);
        Ok(&self.rooms[self.rooms.len() - 1])
    }

    /// Removing an absent id is a no-op; returns whether a room went away.
    pub fn delete_room(&mut self, id: &RoomId) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|room| &room.id != id);
        self.rooms.len() != before
    }

    /// Each id is handled independently; removals are not rolled back when
    /// other ids are missing.
    pub fn delete_rooms<I>(&mut self, ids: I) -> BulkDeleteOutcome
    where
        I: IntoIterator<Item = RoomId>,
    {
        let mut outcome = BulkDeleteOutcome::default();
        for id in ids {
            if self.delete_room(&id) {
                outcome.removed.push(id);
            } else {
                outcome.missing.push(id);
            }
        }
        outcome
    }

    fn floor_capacity(&self, office: &str, floor: &str) -> Result<usize, RegistryError> {
        let site = self
            .offices
            .get(office)
            .ok_or_else(|| RegistryError::UnknownOffice(office.to_string()))?;
        site.capacity(floor)
            .ok_or_else(|| RegistryError::UnknownFloor {
                office: office.to_string(),
                floor: floor.to_string(),
            })
    }
}
