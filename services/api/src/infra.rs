use chrono::{Duration, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use room_audit::rooms::domain::{EquipmentChecklist, Room};
use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::{ReviewInput, ReviewRecorder, RoomRegistry};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Sample inventory mirroring the spreadsheet the facilities team started
/// from: the Mario Garnero floors, with a review on record for every room.
pub(crate) fn sample_rooms() -> Vec<Room> {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    let recorder = ReviewRecorder;
    let seeded_at = Utc::now();

    let floors: [(&str, usize); 5] = [("13", 5), ("12", 4), ("10", 3), ("9", 4), ("8", 4)];

    let mut age = 0i64;
    for (floor, count) in floors {
        for slot in 0..count {
            let id = match registry.create_room("MG", floor) {
                Ok(room) => room.id.clone(),
                Err(_) => continue,
            };

            let input = ReviewInput {
                equipment: sample_checklist(floor, slot),
                note: sample_note(floor, slot).to_string(),
                photo: None,
            };
            let recorded_at = seeded_at - Duration::days(age);
            age += 1;

            let _ = recorder.record_at(&mut registry, &id, input, recorded_at);
        }
    }

    registry.rooms().to_vec()
}

fn sample_checklist(floor: &str, slot: usize) -> EquipmentChecklist {
    EquipmentChecklist {
        tv: true,
        remote_control: true,
        extension_line: floor == "13" && slot == 1,
        videoconference: slot % 2 == 0,
        manual: floor == "12" || floor == "8",
        monitor: floor == "10" && slot == 1,
    }
}

fn sample_note(floor: &str, slot: usize) -> &'static str {
    if floor == "12" && slot == 3 {
        "HDMI cable showing intermittent faults"
    } else if floor == "9" && slot == 2 {
        "Remote control battery replaced"
    } else {
        "OK"
    }
}
