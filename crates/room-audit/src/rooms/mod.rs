pub mod domain;
pub mod export;
pub mod offices;
pub mod persistence;
pub mod query;
mod recorder;
mod registry;
pub mod router;
mod service;
pub mod views;

pub use recorder::{ReviewInput, ReviewRecorder};
pub use registry::{BulkDeleteOutcome, RoomRegistry};
pub use service::{
    DashboardView, ExportArtifact, ExportFormat, RecentReviewEntry, RoomService, RoomServiceError,
};
