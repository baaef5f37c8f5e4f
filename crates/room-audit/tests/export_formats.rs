use chrono::{TimeZone, Utc};
use room_audit::rooms::domain::{EquipmentChecklist, Photo, RoomId};
use room_audit::rooms::export::{history_csv, printable_report, rooms_csv, HistoryDocument};
use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::query::{list_history, HistoryRange};
use room_audit::rooms::{ReviewInput, ReviewRecorder, RoomRegistry};

fn reviewed_registry(note: &str, photo: Option<Photo>) -> (RoomRegistry, RoomId) {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    let id = registry
        .create_room("MG", "9")
        .expect("room created")
        .id
        .clone();

    let at = Utc
        .with_ymd_and_hms(2025, 6, 2, 14, 30, 0)
        .single()
        .expect("valid timestamp");
    ReviewRecorder
        .record_at(
            &mut registry,
            &id,
            ReviewInput {
                equipment: EquipmentChecklist {
                    tv: true,
                    remote_control: true,
                    ..EquipmentChecklist::default()
                },
                note: note.to_string(),
                photo,
            },
            at,
        )
        .expect("review recorded");

    (registry, id)
}

#[test]
fn csv_keeps_hostile_notes_in_a_single_record() {
    let (registry, id) = reviewed_registry("broken; cable\nneeds swap", None);
    let room = registry.get(&id).expect("room present");
    let reviews = list_history(&registry, &id, &HistoryRange::default()).expect("room present");

    let csv = history_csv(room, &reviews).expect("csv renders");
    assert!(csv.starts_with('\u{feff}'));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(csv.trim_start_matches('\u{feff}').as_bytes());

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("csv parses back");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].len(), 11);
    assert_eq!(&records[0][0], "02/06/2025 14:30");
    assert_eq!(&records[0][1], "9.1");
    assert_eq!(&records[0][4], "Yes");
    assert_eq!(&records[0][6], "No");
    assert_eq!(&records[0][10], "broken, cable needs swap");
}

#[test]
fn json_export_accepts_an_empty_selection() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    let id = registry
        .create_room("MG", "9")
        .expect("room created")
        .id
        .clone();
    let room = registry.get(&id).expect("room present");

    let exported_at = Utc
        .with_ymd_and_hms(2025, 6, 2, 15, 0, 0)
        .single()
        .expect("valid timestamp");
    let json = HistoryDocument::new(room, &[], exported_at)
        .to_pretty_json()
        .expect("json renders");

    let value: serde_json::Value = serde_json::from_str(&json).expect("json parses back");
    assert_eq!(value["room"]["number"], "9.1");
    assert_eq!(value["room"]["floor"], "9");
    assert_eq!(value["room"]["office"], "MG");
    assert!(value["reviews"].as_array().expect("reviews array").is_empty());
    assert!(value["exported_at"].is_string());
}

#[test]
fn json_export_mirrors_the_given_selection() {
    let (registry, id) = reviewed_registry("OK", None);
    let room = registry.get(&id).expect("room present");
    let reviews = list_history(&registry, &id, &HistoryRange::default()).expect("room present");

    let exported_at = Utc
        .with_ymd_and_hms(2025, 6, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let json = HistoryDocument::new(room, &reviews, exported_at)
        .to_pretty_json()
        .expect("json renders");

    let value: serde_json::Value = serde_json::from_str(&json).expect("json parses back");
    let entries = value["reviews"].as_array().expect("reviews array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["note"], "OK");
    assert_eq!(entries[0]["equipment"]["tv"], true);
    assert_eq!(entries[0]["equipment"]["monitor"], false);
}

#[test]
fn exports_are_deterministic_given_the_timestamp() {
    let (registry, id) = reviewed_registry("OK", None);
    let room = registry.get(&id).expect("room present");
    let reviews = list_history(&registry, &id, &HistoryRange::default()).expect("room present");

    let exported_at = Utc
        .with_ymd_and_hms(2025, 6, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");

    let first_json = HistoryDocument::new(room, &reviews, exported_at)
        .to_pretty_json()
        .expect("json renders");
    let second_json = HistoryDocument::new(room, &reviews, exported_at)
        .to_pretty_json()
        .expect("json renders");
    assert_eq!(first_json, second_json);

    let first_csv = history_csv(room, &reviews).expect("csv renders");
    let second_csv = history_csv(room, &reviews).expect("csv renders");
    assert_eq!(first_csv, second_csv);
}

#[test]
fn printable_report_embeds_notes_and_photos() {
    let photo = Photo::embedded("image/jpeg", vec![0xFF, 0xD8, 0xFF]);
    let (registry, id) = reviewed_registry("cable <broken> & frayed", Some(photo));
    let room = registry.get(&id).expect("room present");
    let reviews = list_history(&registry, &id, &HistoryRange::default()).expect("room present");

    let generated_at = Utc
        .with_ymd_and_hms(2025, 6, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let report = printable_report(room, registry.offices(), &reviews, generated_at);

    assert!(report.starts_with("<!DOCTYPE html>"));
    assert!(report.contains("Review history - Room 9.1"));
    assert!(report.contains("Mario Garnero"));
    assert!(report.contains("cable &lt;broken&gt; &amp; frayed"));
    assert!(!report.contains("<broken>"));
    assert!(report.contains("data:image/jpeg;base64,/9j/"));
    assert!(report.contains("Generated 03/06/2025 09:00"));
}

#[test]
fn rooms_csv_lists_one_record_per_room() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    registry.create_room("MG", "9").expect("room created");
    registry.create_room("MG", "8").expect("room created");

    let rooms: Vec<_> = registry.rooms().iter().collect();
    let csv = rooms_csv(&rooms).expect("csv renders");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(csv.trim_start_matches('\u{feff}').as_bytes());
    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("csv parses back");

    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|record| &record[record.len() - 3] == "Never reviewed"));
}
