use crate::infra::{parse_date, sample_rooms};
use chrono::NaiveDate;
use clap::Args;
use room_audit::error::AppError;
use room_audit::rooms::domain::{EquipmentChecklist, RoomId};
use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::persistence::{JsonFileStore, MemoryStore};
use room_audit::rooms::query::{HistoryRange, RoomFilter};
use room_audit::rooms::{ExportFormat, ReviewInput, RoomService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Limit the room listing to one office code (defaults to MG)
    #[arg(long)]
    pub(crate) office: Option<String>,
    /// Print the full room listing after seeding
    #[arg(long)]
    pub(crate) list_rooms: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryExportArgs {
    /// Path of the stored room dataset
    #[arg(long, default_value = "data/rooms.json")]
    pub(crate) store: PathBuf,
    /// Room id, e.g. mg-9.2
    #[arg(long)]
    pub(crate) room: String,
    /// Output format: json, csv, or report
    #[arg(long, default_value = "csv", value_parser = parse_format)]
    pub(crate) format: ExportFormat,
    /// Earliest review date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Latest review date to include, end-of-day inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Output file (defaults to the generated artifact name)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        "report" | "html" => Ok(ExportFormat::Report),
        other => Err(format!("unknown export format '{other}'")),
    }
}

pub(crate) fn run_history_export(args: HistoryExportArgs) -> Result<(), AppError> {
    let HistoryExportArgs {
        store,
        room,
        format,
        from,
        to,
        out,
    } = args;

    let store = Arc::new(JsonFileStore::new(store));
    let service = RoomService::load(OfficeDirectory::standard(), store)?;

    let range = HistoryRange {
        start: from,
        end: to,
    };
    let artifact = service.export_history(&RoomId::parse(&room), &range, format)?;

    let target = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
    std::fs::write(&target, &artifact.body)?;
    println!(
        "Exported {} bytes ({}) to {}",
        artifact.body.len(),
        artifact.content_type,
        target.display()
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { office, list_rooms } = args;
    let office = office.unwrap_or_else(|| "MG".to_string());

    println!("Room inspection demo");

    let service = RoomService::load(
        OfficeDirectory::standard(),
        Arc::new(MemoryStore::default()),
    )?;
    let seeded = service.replace_all(sample_rooms())?;
    println!("Seeded {seeded} rooms from the sample inventory");

    let created = service.create_room("FL", "T")?;
    println!(
        "\nRegistered room {} ({}, {})",
        created.number, created.floor_label, created.office_name
    );

    let reviewed = service.record_review(
        &RoomId::parse(&created.id),
        ReviewInput {
            equipment: EquipmentChecklist {
                tv: true,
                remote_control: true,
                videoconference: true,
                ..EquipmentChecklist::default()
            },
            note: "First inspection after installation".to_string(),
            photo: None,
        },
    )?;
    println!(
        "Recorded review -> status {} ({} entry in history)",
        reviewed.status_label, reviewed.review_count
    );

    service.delete_room(&RoomId::parse(&reviewed.id))?;
    let recreated = service.create_room("FL", "T")?;
    println!(
        "Deleted and re-created on the same floor -> number {} reused",
        recreated.number
    );

    let dashboard = service.dashboard();
    println!("\nDashboard");
    println!(
        "- {} rooms total | {} reviewed | {} never reviewed",
        dashboard.total_rooms, dashboard.reviewed, dashboard.never_reviewed
    );
    println!("Latest reviews:");
    for entry in &dashboard.recent_reviews {
        println!(
            "  - {} ({} / {}) on {}: {}",
            entry.room,
            entry.floor,
            entry.office,
            entry.recorded_at.format("%d/%m/%Y %H:%M"),
            entry.note
        );
    }

    if list_rooms {
        let filter = RoomFilter {
            office: Some(office.clone()),
            ..RoomFilter::default()
        };
        println!("\nRooms at {office}");
        for room in service.list_rooms(&filter) {
            println!(
                "- {} | {} | {} | last note: {}",
                room.number,
                room.floor_label,
                room.status_label,
                room.last_note.as_deref().unwrap_or("-")
            );
        }
    }

    let flagged = service.list_rooms(&RoomFilter {
        text: Some("HDMI".to_string()),
        ..RoomFilter::default()
    });
    if let Some(room) = flagged.first() {
        let artifact = service.export_history(
            &RoomId::parse(&room.id),
            &HistoryRange::default(),
            ExportFormat::Csv,
        )?;
        println!(
            "\nSample CSV export for flagged room {} ({} bytes):",
            room.number,
            artifact.body.len()
        );
        print!("{}", String::from_utf8_lossy(&artifact.body));
    }

    Ok(())
}
