mod csv;
mod json;
mod report;

pub use self::csv::{history_csv, rooms_csv};
pub use json::HistoryDocument;
pub use report::printable_report;

/// Failures surfaced by the caller-facing export actions. Formatters accept
/// an empty selection; `NothingSelected` is raised by the action that
/// gathers the selection, consistently for every format.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no reviews selected for export")]
    NothingSelected,
    #[error("could not assemble csv export: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("could not assemble json export: {0}")]
    Json(#[from] serde_json::Error),
}
