use csv::WriterBuilder;

use super::ExportError;
use crate::rooms::domain::{Equipment, Review, Room};

/// Byte-order mark so spreadsheet applications detect UTF-8.
const BOM: &str = "\u{feff}";
const YES: &str = "Yes";
const NO: &str = "No";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Review history as semicolon-delimited text, one record per review.
pub fn history_csv(room: &Room, reviews: &[&Review]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

    let mut header = vec![
        "Timestamp".to_string(),
        "Room".to_string(),
        "Floor".to_string(),
        "Office".to_string(),
    ];
    header.extend(
        Equipment::ordered()
            .into_iter()
            .map(|item| item.label().to_string()),
    );
    header.push("Note".to_string());
    writer.write_record(&header)?;

    for review in reviews {
        let mut record = vec![
            review.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            room.number.clone(),
            room.floor.clone(),
            room.office.clone(),
        ];
        record.extend(
            Equipment::ordered()
                .into_iter()
                .map(|item| presence_token(review.equipment.is_present(item)).to_string()),
        );
        record.push(sanitize_note(&review.note));
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// Registry-wide snapshot for spreadsheet import: current checklist and
/// last-review state per room.
pub fn rooms_csv(rooms: &[&Room]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

    let mut header = vec![
        "Room".to_string(),
        "Floor".to_string(),
        "Office".to_string(),
    ];
    header.extend(
        Equipment::ordered()
            .into_iter()
            .map(|item| item.label().to_string()),
    );
    header.push("Status".to_string());
    header.push("Last reviewed".to_string());
    header.push("Last note".to_string());
    writer.write_record(&header)?;

    for room in rooms {
        let mut record = vec![room.number.clone(), room.floor.clone(), room.office.clone()];
        record.extend(
            Equipment::ordered()
                .into_iter()
                .map(|item| presence_token(room.equipment.is_present(item)).to_string()),
        );
        record.push(room.status().label().to_string());
        record.push(
            room.last_reviewed_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        );
        record.push(sanitize_note(room.last_note.as_deref().unwrap_or_default()));
        writer.write_record(&record)?;
    }

    finish(writer)
}

fn presence_token(present: bool) -> &'static str {
    if present {
        YES
    } else {
        NO
    }
}

/// Delimiters and line breaks inside a note would fan one review across
/// extra rows or columns in naive spreadsheet imports.
fn sanitize_note(note: &str) -> String {
    note.replace(['\r', '\n'], " ").replace(';', ",")
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(csv::Error::from(err.into_error())))?;
    let body = String::from_utf8_lossy(&bytes);
    Ok(format!("{BOM}{body}"))
}
