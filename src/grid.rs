//! In-memory occupancy tracking for one generation run.
//!
//! The grid records, per (day, slot), which classes, teachers and rooms are
//! already committed. It is owned by a single run and thrown away with it;
//! nothing outside the generator ever reads it.

use std::collections::{HashMap, HashSet};

use crate::domain::{ClassId, Day, RoomId, Slot, TeacherId};

#[derive(Debug, Default)]
struct SlotOccupancy {
    classes: HashSet<ClassId>,
    teachers: HashSet<TeacherId>,
    rooms: HashSet<RoomId>,
}

/// Busy-id sets keyed by (day, slot). Starts empty; grows only through
/// [`OccupancyGrid::occupy`] as placements are committed.
#[derive(Debug, Default)]
pub struct OccupancyGrid {
    cells: HashMap<(Day, Slot), SlotOccupancy>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_busy(&self, day: Day, slot: Slot, class_id: ClassId) -> bool {
        self.cells
            .get(&(day, slot))
            .is_some_and(|cell| cell.classes.contains(&class_id))
    }

    pub fn teacher_busy(&self, day: Day, slot: Slot, teacher_id: TeacherId) -> bool {
        self.cells
            .get(&(day, slot))
            .is_some_and(|cell| cell.teachers.contains(&teacher_id))
    }

    pub fn room_busy(&self, day: Day, slot: Slot, room_id: RoomId) -> bool {
        self.cells
            .get(&(day, slot))
            .is_some_and(|cell| cell.rooms.contains(&room_id))
    }

    /// Marks all three participants busy at (day, slot).
    pub fn occupy(
        &mut self,
        day: Day,
        slot: Slot,
        class_id: ClassId,
        teacher_id: TeacherId,
        room_id: RoomId,
    ) {
        let cell = self.cells.entry((day, slot)).or_default();
        cell.classes.insert(class_id);
        cell.teachers.insert(teacher_id);
        cell.rooms.insert(room_id);
    }
}
