use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Photo, RegistryError, Room, RoomId};
use super::export::{self, ExportError, HistoryDocument};
use super::offices::OfficeDirectory;
use super::persistence::{PersistenceError, PersistenceGateway};
use super::query::{self, HistoryRange, RoomFilter};
use super::recorder::{ReviewInput, ReviewRecorder};
use super::registry::{BulkDeleteOutcome, RoomRegistry};
use super::views::{review_view, room_view, ReviewView, RoomView};

const RECENT_REVIEW_LIMIT: usize = 5;

/// Composes the registry, recorder, query, and export components behind a
/// single mutex so mutations stay serialized per dataset.
pub struct RoomService<P> {
    registry: Mutex<RoomRegistry>,
    recorder: ReviewRecorder,
    store: Arc<P>,
}

/// Error raised by the room service.
#[derive(Debug, thiserror::Error)]
pub enum RoomServiceError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
    Report,
}

impl ExportFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Report => "text/html; charset=utf-8",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Report => "html",
        }
    }
}

/// Finished export payload handed to the HTTP layer or written to disk.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub content_type: &'static str,
    pub filename: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total_rooms: usize,
    pub reviewed: usize,
    pub never_reviewed: usize,
    pub recent_reviews: Vec<RecentReviewEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentReviewEntry {
    pub room: String,
    pub floor: String,
    pub office: String,
    pub recorded_at: DateTime<Utc>,
    pub note: String,
}

impl<P: PersistenceGateway> RoomService<P> {
    /// Hydrate from the gateway at application start.
    pub fn load(offices: OfficeDirectory, store: Arc<P>) -> Result<Self, RoomServiceError> {
        let rooms = store.load_all()?;
        let registry = RoomRegistry::from_rooms(offices, rooms)?;
        Ok(Self {
            registry: Mutex::new(registry),
            recorder: ReviewRecorder,
            store,
        })
    }

    pub fn offices(&self) -> OfficeDirectory {
        self.lock().offices().clone()
    }

    pub fn list_rooms(&self, filter: &RoomFilter) -> Vec<RoomView> {
        let registry = self.lock();
        query::list_rooms(&registry, filter)
            .into_iter()
            .map(|room| room_view(room, registry.offices()))
            .collect()
    }

    pub fn get_room(&self, id: &RoomId) -> Result<RoomView, RoomServiceError> {
        let registry = self.lock();
        let room = registry
            .get(id)
            .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;
        Ok(room_view(room, registry.offices()))
    }

    /// Create then persist. Validation failures leave state untouched; a
    /// persistence failure keeps the created room in memory and surfaces
    /// the error so the caller can retry the save.
    pub fn create_room(&self, office: &str, floor: &str) -> Result<RoomView, RoomServiceError> {
        let mut registry = self.lock();
        let room = registry.create_room(office, floor)?.clone();
        let view = room_view(&room, registry.offices());
        self.persist(&registry)?;
        Ok(view)
    }

    pub fn delete_room(&self, id: &RoomId) -> Result<bool, RoomServiceError> {
        let mut registry = self.lock();
        let removed = registry.delete_room(id);
        if removed {
            self.persist(&registry)?;
        }
        Ok(removed)
    }

    pub fn delete_rooms(&self, ids: Vec<RoomId>) -> Result<BulkDeleteOutcome, RoomServiceError> {
        let mut registry = self.lock();
        let outcome = registry.delete_rooms(ids);
        if !outcome.removed.is_empty() {
            self.persist(&registry)?;
        }
        Ok(outcome)
    }

    pub fn record_review(
        &self,
        id: &RoomId,
        input: ReviewInput,
    ) -> Result<RoomView, RoomServiceError> {
        let mut registry = self.lock();
        self.recorder.record(&mut registry, id, input)?;
        let view = registry
            .get(id)
            .map(|room| room_view(room, registry.offices()))
            .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;
        self.persist(&registry)?;
        Ok(view)
    }

    pub fn history(
        &self,
        id: &RoomId,
        range: &HistoryRange,
    ) -> Result<Vec<ReviewView>, RoomServiceError> {
        let registry = self.lock();
        let reviews = query::list_history(&registry, id, range)?;
        Ok(reviews.into_iter().map(review_view).collect())
    }

    /// Export the selected slice of a room's history. An empty selection is
    /// rejected here for every format; the formatters themselves accept it.
    pub fn export_history(
        &self,
        id: &RoomId,
        range: &HistoryRange,
        format: ExportFormat,
    ) -> Result<ExportArtifact, RoomServiceError> {
        let registry = self.lock();
        let room = registry
            .get(id)
            .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;
        let reviews = query::list_history(&registry, id, range)?;
        if reviews.is_empty() {
            return Err(ExportError::NothingSelected.into());
        }

        let exported_at = Utc::now();
        let body = match format {
            ExportFormat::Json => HistoryDocument::new(room, &reviews, exported_at)
                .to_pretty_json()?
                .into_bytes(),
            ExportFormat::Csv => export::history_csv(room, &reviews)?.into_bytes(),
            ExportFormat::Report => {
                export::printable_report(room, registry.offices(), &reviews, exported_at)
                    .into_bytes()
            }
        };

        Ok(ExportArtifact {
            content_type: format.content_type(),
            filename: format!(
                "history-{}-{}.{}",
                room.number,
                exported_at.format("%Y%m%d%H%M%S"),
                format.extension()
            ),
            body,
        })
    }

    /// Spreadsheet-compatible dump of every room's current state.
    pub fn export_rooms_spreadsheet(&self) -> Result<ExportArtifact, RoomServiceError> {
        let registry = self.lock();
        let rooms = query::list_rooms(&registry, &RoomFilter::default());
        let body = export::rooms_csv(&rooms)?.into_bytes();

        Ok(ExportArtifact {
            content_type: ExportFormat::Csv.content_type(),
            filename: format!("rooms-{}.csv", Utc::now().format("%Y-%m-%d")),
            body,
        })
    }

    pub fn dashboard(&self) -> DashboardView {
        let registry = self.lock();
        let rooms = registry.rooms();
        let reviewed = rooms
            .iter()
            .filter(|room| room.last_reviewed_at.is_some())
            .count();

        let mut recent: Vec<RecentReviewEntry> = rooms
            .iter()
            .filter_map(|room| {
                room.last_reviewed_at.map(|recorded_at| RecentReviewEntry {
                    room: room.number.clone(),
                    floor: room.floor.clone(),
                    office: room.office.clone(),
                    recorded_at,
                    note: room.last_note.clone().unwrap_or_default(),
                })
            })
            .collect();
        recent.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        recent.truncate(RECENT_REVIEW_LIMIT);

        DashboardView {
            total_rooms: rooms.len(),
            reviewed,
            never_reviewed: rooms.len() - reviewed,
            recent_reviews: recent,
        }
    }

    /// Most recent photo on record for a room, regardless of date filters.
    pub fn latest_photo(&self, id: &RoomId) -> Result<Option<Photo>, RoomServiceError> {
        let registry = self.lock();
        let room = registry
            .get(id)
            .ok_or_else(|| RegistryError::RoomNotFound(id.clone()))?;
        Ok(room
            .history
            .iter()
            .rev()
            .find_map(|review| review.photo.clone()))
    }

    /// Replace the whole collection (seeding) and persist the result.
    pub fn replace_all(&self, rooms: Vec<Room>) -> Result<usize, RoomServiceError> {
        let mut registry = self.lock();
        let offices = registry.offices().clone();
        *registry = RoomRegistry::from_rooms(offices, rooms)?;
        let count = registry.rooms().len();
        self.persist(&registry)?;
        Ok(count)
    }

    fn lock(&self) -> MutexGuard<'_, RoomRegistry> {
        self.registry.lock().expect("registry mutex poisoned")
    }

    fn persist(&self, registry: &RoomRegistry) -> Result<(), RoomServiceError> {
        self.store.save_all(registry.rooms())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::persistence::MemoryStore;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose saves can be made to fail on demand.
    #[derive(Default)]
    struct FlakyStore {
        fail_saves: AtomicBool,
        inner: MemoryStore,
    }

    impl PersistenceGateway for FlakyStore {
        fn load_all(&self) -> Result<Vec<Room>, PersistenceError> {
            self.inner.load_all()
        }

        fn save_all(&self, rooms: &[Room]) -> Result<(), PersistenceError> {
            if self.fail_saves.load(Ordering::Relaxed) {
                return Err(PersistenceError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "disk unavailable",
                )));
            }
            self.inner.save_all(rooms)
        }
    }

    fn service_with_store(store: Arc<FlakyStore>) -> RoomService<FlakyStore> {
        RoomService::load(crate::rooms::offices::OfficeDirectory::standard(), store)
            .expect("empty store hydrates")
    }

    #[test]
    fn failed_save_surfaces_but_keeps_in_memory_state() {
        let store = Arc::new(FlakyStore::default());
        let service = service_with_store(store.clone());
        store.fail_saves.store(true, Ordering::Relaxed);

        let result = service.create_room("MG", "9");
        assert!(matches!(result, Err(RoomServiceError::Persistence(_))));

        // The room survived in memory; a retried save succeeds.
        let id = RoomId::parse("mg-9.1");
        assert_eq!(service.get_room(&id).expect("room retained").number, "9.1");

        store.fail_saves.store(false, Ordering::Relaxed);
        let review = service.record_review(&id, ReviewInput::default());
        assert!(review.is_ok());
        assert_eq!(store.load_all().expect("store readable").len(), 1);
    }

    #[test]
    fn export_with_empty_selection_is_rejected_for_every_format() {
        let service = service_with_store(Arc::new(FlakyStore::default()));
        service.create_room("MG", "9").expect("room created");

        let id = RoomId::parse("mg-9.1");
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Report] {
            let result = service.export_history(&id, &HistoryRange::default(), format);
            assert!(matches!(
                result,
                Err(RoomServiceError::Export(ExportError::NothingSelected))
            ));
        }
    }

    #[test]
    fn dashboard_reflects_review_state() {
        let service = service_with_store(Arc::new(FlakyStore::default()));
        service.create_room("MG", "9").expect("room created");
        service.create_room("MG", "9").expect("room created");

        service
            .record_review(
                &RoomId::parse("mg-9.1"),
                ReviewInput {
                    note: "inspected".to_string(),
                    ..ReviewInput::default()
                },
            )
            .expect("review recorded");

        let dashboard = service.dashboard();
        assert_eq!(dashboard.total_rooms, 2);
        assert_eq!(dashboard.reviewed, 1);
        assert_eq!(dashboard.never_reviewed, 1);
        assert_eq!(dashboard.recent_reviews.len(), 1);
        assert_eq!(dashboard.recent_reviews[0].note, "inspected");
    }
}
