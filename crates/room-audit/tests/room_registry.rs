use room_audit::rooms::domain::{EquipmentChecklist, RegistryError, Room, RoomId};
use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::RoomRegistry;

fn registry() -> RoomRegistry {
    RoomRegistry::new(OfficeDirectory::standard())
}

#[test]
fn create_rooms_up_to_capacity_then_floor_full() {
    let mut registry = registry();

    // MG floor 10 is configured for three rooms.
    for expected in ["10.1", "10.2", "10.3"] {
        let room = registry.create_room("MG", "10").expect("capacity not reached");
        assert_eq!(room.number, expected);
    }

    match registry.create_room("MG", "10") {
        Err(RegistryError::FloorFull {
            office,
            floor,
            capacity,
        }) => {
            assert_eq!(office, "MG");
            assert_eq!(floor, "10");
            assert_eq!(capacity, 3);
        }
        other => panic!("expected floor full error, got {other:?}"),
    }
}

#[test]
fn single_room_floor_fills_immediately() {
    let mut registry = registry();

    registry.create_room("FL", "1").expect("first room fits");
    assert!(matches!(
        registry.create_room("FL", "1"),
        Err(RegistryError::FloorFull { .. })
    ));
}

#[test]
fn unknown_office_and_floor_are_rejected_before_mutation() {
    let mut registry = registry();

    assert_eq!(
        registry.create_room("XX", "1"),
        Err(RegistryError::UnknownOffice("XX".to_string()))
    );
    assert_eq!(
        registry.create_room("MG", "42"),
        Err(RegistryError::UnknownFloor {
            office: "MG".to_string(),
            floor: "42".to_string(),
        })
    );
    assert!(registry.rooms().is_empty());
}

#[test]
fn next_room_number_fills_the_first_gap() {
    let mut registry = registry();

    assert_eq!(
        registry.next_room_number("MG", "9").expect("floor known"),
        "9.1"
    );

    for _ in 0..4 {
        registry.create_room("MG", "9").expect("capacity not reached");
    }
    assert!(registry.delete_room(&RoomId::parse("mg-9.2")));

    // Remaining sequences are {1, 3, 4}; the first gap is 2.
    assert_eq!(
        registry.next_room_number("MG", "9").expect("floor known"),
        "9.2"
    );
    let reused = registry.create_room("MG", "9").expect("gap available");
    assert_eq!(reused.number, "9.2");
}

#[test]
fn malformed_room_numbers_are_ignored_by_numbering() {
    let offices = OfficeDirectory::standard();
    let named_room = Room {
        id: RoomId::parse("mg-ceo"),
        office: "MG".to_string(),
        floor: "13".to_string(),
        number: "CEO".to_string(),
        equipment: EquipmentChecklist::default(),
        last_reviewed_at: None,
        last_note: None,
        history: Vec::new(),
    };
    let mut registry =
        RoomRegistry::from_rooms(offices, vec![named_room]).expect("unique ids accepted");

    assert_eq!(
        registry.next_room_number("MG", "13").expect("floor known"),
        "13.1"
    );
    let created = registry.create_room("MG", "13").expect("capacity not reached");
    assert_eq!(created.number, "13.1");
}

#[test]
fn from_rooms_rejects_duplicate_ids() {
    let offices = OfficeDirectory::standard();
    let room = Room {
        id: RoomId::parse("mg-9.1"),
        office: "MG".to_string(),
        floor: "9".to_string(),
        number: "9.1".to_string(),
        equipment: EquipmentChecklist::default(),
        last_reviewed_at: None,
        last_note: None,
        history: Vec::new(),
    };

    let result = RoomRegistry::from_rooms(offices, vec![room.clone(), room]);
    assert!(matches!(result, Err(RegistryError::DuplicateRoom(_))));
}

#[test]
fn delete_room_is_idempotent() {
    let mut registry = registry();
    registry.create_room("MG", "9").expect("room created");

    let id = RoomId::parse("mg-9.1");
    assert!(registry.delete_room(&id));
    assert!(!registry.delete_room(&id));
}

#[test]
fn bulk_delete_keeps_partial_successes() {
    let mut registry = registry();
    registry.create_room("MG", "9").expect("room created");
    registry.create_room("MG", "9").expect("room created");

    let outcome = registry.delete_rooms(vec![
        RoomId::parse("mg-9.1"),
        RoomId::parse("mg-9.99"),
        RoomId::parse("mg-9.2"),
    ]);

    assert_eq!(outcome.removed, vec![RoomId::parse("mg-9.1"), RoomId::parse("mg-9.2")]);
    assert_eq!(outcome.missing, vec![RoomId::parse("mg-9.99")]);
    assert!(registry.rooms().is_empty());
}
