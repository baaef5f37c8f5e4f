use serde::Serialize;

/// Floor label used for the ground floor in office configurations.
pub const GROUND_FLOOR: &str = "T";

/// One labeled level within an office and the maximum number of rooms it
/// may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorPlan {
    pub label: &'static str,
    pub max_rooms: usize,
}

/// A physical site containing floors and rooms, identified by a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Office {
    pub code: &'static str,
    pub name: &'static str,
    pub floors: Vec<FloorPlan>,
}

impl Office {
    pub fn capacity(&self, floor: &str) -> Option<usize> {
        self.floors
            .iter()
            .find(|plan| plan.label == floor)
            .map(|plan| plan.max_rooms)
    }
}

/// The immutable set of offices a registry serves. Loaded once at startup,
/// never created or destroyed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeDirectory {
    offices: Vec<Office>,
}

impl OfficeDirectory {
    pub fn new(offices: Vec<Office>) -> Self {
        Self { offices }
    }

    /// The four sites currently tracked by the facilities team.
    pub fn standard() -> Self {
        Self::new(standard_offices())
    }

    pub fn get(&self, code: &str) -> Option<&Office> {
        self.offices.iter().find(|office| office.code == code)
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }
}

/// Human label for a floor: `"T"` is the ground floor, everything else is
/// shown as-is.
pub fn floor_display(floor: &str) -> String {
    if floor == GROUND_FLOOR {
        "Ground floor".to_string()
    } else {
        format!("Floor {floor}")
    }
}

fn standard_offices() -> Vec<Office> {
    vec![
        Office {
            code: "MG",
            name: "Mario Garnero",
            floors: vec![
                FloorPlan { label: "8", max_rooms: 5 },
                FloorPlan { label: "9", max_rooms: 5 },
                FloorPlan { label: "10", max_rooms: 3 },
                FloorPlan { label: "12", max_rooms: 7 },
                FloorPlan { label: "13", max_rooms: 6 },
            ],
        },
        Office {
            code: "FL",
            name: "Faria Lima",
            floors: vec![
                FloorPlan { label: GROUND_FLOOR, max_rooms: 3 },
                FloorPlan { label: "1", max_rooms: 1 },
                FloorPlan { label: "2", max_rooms: 3 },
                FloorPlan { label: "3", max_rooms: 3 },
                FloorPlan { label: "4", max_rooms: 2 },
                FloorPlan { label: "5", max_rooms: 4 },
                FloorPlan { label: "6", max_rooms: 2 },
                FloorPlan { label: "7", max_rooms: 3 },
                FloorPlan { label: "8", max_rooms: 4 },
                FloorPlan { label: "9", max_rooms: 3 },
                FloorPlan { label: "10", max_rooms: 1 },
                FloorPlan { label: "11", max_rooms: 4 },
            ],
        },
        Office {
            code: "BR",
            name: "Berrini",
            floors: vec![
                FloorPlan { label: "8", max_rooms: 3 },
                FloorPlan { label: "9", max_rooms: 2 },
            ],
        },
        Office {
            code: "BL",
            name: "Barão de Limeira",
            floors: vec![
                FloorPlan { label: "1", max_rooms: 7 },
                FloorPlan { label: "2", max_rooms: 6 },
                FloorPlan { label: "6", max_rooms: 6 },
                FloorPlan { label: "7", max_rooms: 6 },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_directory_lists_all_sites() {
        let directory = OfficeDirectory::standard();
        let codes: Vec<&str> = directory.offices().iter().map(|office| office.code).collect();
        assert_eq!(codes, ["MG", "FL", "BR", "BL"]);
    }

    #[test]
    fn capacity_lookup_honors_floor_labels() {
        let directory = OfficeDirectory::standard();
        let faria_lima = directory.get("FL").expect("FL configured");
        assert_eq!(faria_lima.capacity(GROUND_FLOOR), Some(3));
        assert_eq!(faria_lima.capacity("11"), Some(4));
        assert_eq!(faria_lima.capacity("12"), None);
        assert!(directory.get("XX").is_none());
    }

    #[test]
    fn ground_floor_has_a_dedicated_label() {
        assert_eq!(floor_display("T"), "Ground floor");
        assert_eq!(floor_display("9"), "Floor 9");
    }
}
