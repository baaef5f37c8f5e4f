use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::query::{list_rooms, RoomFilter};
use room_audit::rooms::{ReviewInput, ReviewRecorder, RoomRegistry};

fn office_filter(office: &str) -> RoomFilter {
    RoomFilter {
        office: Some(office.to_string()),
        ..RoomFilter::default()
    }
}

#[test]
fn filter_by_office_and_floor_sorts_by_sequence() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    for _ in 0..4 {
        registry.create_room("MG", "9").expect("room created");
    }
    for _ in 0..2 {
        registry.create_room("MG", "8").expect("room created");
    }
    registry.create_room("BR", "9").expect("room created");

    let filter = RoomFilter {
        office: Some("MG".to_string()),
        floor: Some("9".to_string()),
        text: None,
    };

    let first = list_rooms(&registry, &filter);
    let numbers: Vec<&str> = first.iter().map(|room| room.number.as_str()).collect();
    assert_eq!(numbers, ["9.1", "9.2", "9.3", "9.4"]);
    assert!(first.iter().all(|room| room.office == "MG"));

    // Stable under repeated calls with unchanged state.
    let second = list_rooms(&registry, &filter);
    let repeat: Vec<&str> = second.iter().map(|room| room.number.as_str()).collect();
    assert_eq!(numbers, repeat);
}

#[test]
fn ground_floor_sorts_first_and_numeric_floors_ascend() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    // Created out of order on purpose: 10, 2, T, 1.
    registry.create_room("FL", "10").expect("room created");
    registry.create_room("FL", "2").expect("room created");
    registry.create_room("FL", "T").expect("room created");
    registry.create_room("FL", "1").expect("room created");

    let rooms = list_rooms(&registry, &office_filter("FL"));
    let floors: Vec<&str> = rooms.iter().map(|room| room.floor.as_str()).collect();
    assert_eq!(floors, ["T", "1", "2", "10"]);
}

#[test]
fn text_search_matches_number_office_and_last_note() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    let recorder = ReviewRecorder;

    let first = registry.create_room("MG", "9").expect("room created").id.clone();
    registry.create_room("MG", "9").expect("room created");
    registry.create_room("BR", "8").expect("room created");

    recorder
        .record(
            &mut registry,
            &first,
            ReviewInput {
                note: "HDMI cable flaky".to_string(),
                ..ReviewInput::default()
            },
        )
        .expect("review recorded");

    let by_note = list_rooms(
        &registry,
        &RoomFilter {
            text: Some("hdmi".to_string()),
            ..RoomFilter::default()
        },
    );
    assert_eq!(by_note.len(), 1);
    assert_eq!(by_note[0].number, "9.1");

    let by_number = list_rooms(
        &registry,
        &RoomFilter {
            text: Some("9.2".to_string()),
            ..RoomFilter::default()
        },
    );
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].number, "9.2");

    let by_office = list_rooms(
        &registry,
        &RoomFilter {
            text: Some("br".to_string()),
            ..RoomFilter::default()
        },
    );
    assert_eq!(by_office.len(), 1);
    assert_eq!(by_office[0].office, "BR");
}

#[test]
fn blank_filter_fields_are_treated_as_absent() {
    let mut registry = RoomRegistry::new(OfficeDirectory::standard());
    registry.create_room("MG", "9").expect("room created");
    registry.create_room("BR", "8").expect("room created");

    let rooms = list_rooms(
        &registry,
        &RoomFilter {
            office: Some(String::new()),
            floor: Some("  ".to_string()),
            text: Some(String::new()),
        },
    );
    assert_eq!(rooms.len(), 2);
}
