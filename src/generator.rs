//! Timetable generation: expands weekly demand into lesson units, spreads
//! them over the week and seats them into the occupancy grid.
//!
//! Placement is greedy and best-effort. A unit that cannot be seated is
//! dropped with a diagnostic; the run always completes and commits whatever
//! was placed.

use log::{debug, info, warn};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::catalog::{Catalog, ResolvedCatalog};
use crate::domain::{
    ClassId, Day, Diagnostic, Lesson, RoomId, SchoolClass, Slot, SubjectId, TeacherId,
};
use crate::grid::OccupancyGrid;
use crate::store::{EntityStore, LessonDraft, StoreError};

/// One atomic 45-minute lesson instance awaiting placement.
///
/// The room is deliberately left open: the placer picks one of `rooms` at
/// the slot it ends up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonUnit {
    pub subject: String,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub rooms: Vec<RoomId>,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Lessons committed to the store.
    pub committed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns one class's weekly subject-hours table into a flat unit list.
///
/// A subject that failed catalog resolution contributes zero units and one
/// `ReferenceMissing` diagnostic; there is no partial expansion.
pub fn expand_demand(
    class_name: &str,
    plan: &BTreeMap<String, u8>,
    resolved: &ResolvedCatalog,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<LessonUnit> {
    let mut units = Vec::new();
    for (subject_name, &hours) in plan {
        if hours == 0 {
            continue;
        }
        match resolved.subjects.get(subject_name) {
            Some(entry) => {
                for _ in 0..hours {
                    units.push(LessonUnit {
                        subject: subject_name.clone(),
                        subject_id: entry.subject_id,
                        teacher_id: entry.teacher_id,
                        rooms: entry.rooms.clone(),
                    });
                }
            }
            None => {
                let reason = resolved
                    .failures
                    .get(subject_name)
                    .cloned()
                    .unwrap_or_else(|| format!("subject {subject_name} is not resolvable"));
                warn!("skipping {subject_name} for class {class_name}: {reason}");
                diagnostics.push(Diagnostic::reference_missing(
                    class_name,
                    Some(subject_name.clone()),
                    reason,
                ));
            }
        }
    }
    units
}

/// Spreads a class's units across the week as evenly as possible.
///
/// The unit order is shuffled first, so which subjects land on which day is
/// randomized; the per-day counts are not: every day gets `total / days`
/// units and the first `total % days` days get one extra.
pub fn distribute_across_days(
    mut units: Vec<LessonUnit>,
    day_count: usize,
    rng: &mut StdRng,
) -> Vec<Vec<LessonUnit>> {
    if day_count == 0 {
        return Vec::new();
    }
    units.shuffle(rng);

    let base = units.len() / day_count;
    let remainder = units.len() % day_count;

    let mut buckets = Vec::with_capacity(day_count);
    for day_index in 0..day_count {
        let take = base + usize::from(day_index < remainder);
        let rest = units.split_off(take);
        buckets.push(units);
        units = rest;
    }
    buckets
}

fn find_tight_slot(
    unit: &LessonUnit,
    class_id: ClassId,
    day: Day,
    pivot: Slot,
    pool: &[Slot],
    grid: &OccupancyGrid,
    rng: &mut StdRng,
) -> Option<(Slot, RoomId)> {
    let mut ordered = pool.to_vec();
    ordered.sort_by_key(|&slot| (slot.abs_diff(pivot), slot));

    for slot in ordered {
        if grid.class_busy(day, slot, class_id) || grid.teacher_busy(day, slot, unit.teacher_id) {
            continue;
        }
        let free: Vec<RoomId> = unit
            .rooms
            .iter()
            .filter(|&&room| !grid.room_busy(day, slot, room))
            .copied()
            .collect();
        if let Some(&room) = free.choose(rng) {
            return Some((slot, room));
        }
    }
    None
}

fn find_fallback_slot(
    unit: &LessonUnit,
    class_id: ClassId,
    day: Day,
    slots: &[Slot],
    grid: &OccupancyGrid,
) -> Option<(Slot, RoomId)> {
    for &slot in slots {
        if grid.class_busy(day, slot, class_id) || grid.teacher_busy(day, slot, unit.teacher_id) {
            continue;
        }
        if let Some(&room) = unit
            .rooms
            .iter()
            .find(|&&room| !grid.room_busy(day, slot, room))
        {
            return Some((slot, room));
        }
    }
    None
}

/// Seats one class-day's units, preferring a contiguous block.
///
/// Units with fewer eligible rooms pick their slots first. The primary pass
/// works outward from a random pivot inside the first `units.len()` slots;
/// the fallback scans the whole slot range in natural order.
#[allow(clippy::too_many_arguments)]
fn place_day(
    class_id: ClassId,
    class_name: &str,
    day: Day,
    mut units: Vec<LessonUnit>,
    slots: &[Slot],
    grid: &mut OccupancyGrid,
    rng: &mut StdRng,
    drafts: &mut Vec<LessonDraft>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if units.is_empty() {
        return;
    }

    units.sort_by_key(|unit| unit.rooms.len());

    let mut pool: Vec<Slot> = slots.iter().take(units.len()).copied().collect();
    let pivot = pool.choose(rng).copied();

    for unit in units {
        let seat = pivot
            .and_then(|pivot| find_tight_slot(&unit, class_id, day, pivot, &pool, grid, rng))
            .or_else(|| find_fallback_slot(&unit, class_id, day, slots, grid));

        match seat {
            Some((slot, room)) => {
                debug!(
                    "placed {} for class {class_name} at day {day}, slot {slot}, room {room}",
                    unit.subject
                );
                grid.occupy(day, slot, class_id, unit.teacher_id, room);
                drafts.push(LessonDraft {
                    class_id,
                    subject_id: unit.subject_id,
                    teacher_id: unit.teacher_id,
                    room_id: room,
                    day,
                    slot,
                });
                pool.retain(|&s| s != slot);
            }
            None => {
                warn!(
                    "could not place {} for class {class_name} on day {day}",
                    unit.subject
                );
                diagnostics.push(Diagnostic::placement_exhausted(class_name, unit.subject, day));
            }
        }
    }
}

/// Regenerates the full timetable from the catalog, replacing whatever
/// lesson set the store held before.
///
/// Classes are processed in random order; the order only shifts which class
/// wins contended slots. All failures short of a store outage are reported
/// through the returned diagnostics, never as an error.
pub fn regenerate<S: EntityStore>(
    store: &S,
    catalog: &Catalog,
    rng: &mut StdRng,
) -> Result<GenerationReport, StoreError> {
    let classes = store.classes()?;
    let subjects = store.subjects()?;
    let teachers = store.teachers()?;
    let rooms = store.rooms()?;

    info!(
        "regenerating timetable for {} curriculum classes over a {}x{} grid",
        catalog.curriculum.len(),
        catalog.days.len(),
        catalog.slots.len()
    );

    let resolved = catalog.resolve(&subjects, &teachers, &rooms);
    let class_by_name: HashMap<String, &SchoolClass> =
        classes.iter().map(|class| (class.name(), class)).collect();

    let mut grid = OccupancyGrid::new();
    let mut drafts = Vec::new();
    let mut diagnostics = Vec::new();

    let mut class_names: Vec<&String> = catalog.curriculum.keys().collect();
    class_names.shuffle(rng);

    for class_name in class_names {
        let Some(class) = class_by_name.get(class_name.as_str()) else {
            warn!("class {class_name} not found in store");
            diagnostics.push(Diagnostic::reference_missing(
                class_name.clone(),
                None,
                "class not found in store",
            ));
            continue;
        };

        let plan = &catalog.curriculum[class_name];
        let units = expand_demand(class_name, plan, &resolved, &mut diagnostics);
        let buckets = distribute_across_days(units, catalog.days.len(), rng);

        for (&day, day_units) in catalog.days.iter().zip(buckets) {
            place_day(
                class.id,
                class_name,
                day,
                day_units,
                &catalog.slots,
                &mut grid,
                rng,
                &mut drafts,
                &mut diagnostics,
            );
        }
    }

    let committed = store.replace_lessons(drafts)?;
    info!(
        "timetable committed: {committed} lessons, {} diagnostics",
        diagnostics.len()
    );

    Ok(GenerationReport {
        committed,
        diagnostics,
    })
}

/// Why a manually proposed lesson was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingConflict {
    ClassBusy,
    RoomBusy,
    TeacherBusy,
}

impl fmt::Display for BookingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BookingConflict::ClassBusy => "the class already has a lesson at this time",
            BookingConflict::RoomBusy => "the room is occupied at this time",
            BookingConflict::TeacherBusy => "the teacher is busy at this time",
        };
        f.write_str(text)
    }
}

/// Conflict check for a single manual addition, run against the persisted
/// lesson set rather than any in-memory grid.
pub fn validate_manual_booking(
    lessons: &[Lesson],
    draft: &LessonDraft,
) -> Result<(), BookingConflict> {
    let same_cell = |lesson: &&Lesson| lesson.day == draft.day && lesson.slot == draft.slot;

    if lessons
        .iter()
        .filter(same_cell)
        .any(|lesson| lesson.class_id == draft.class_id)
    {
        return Err(BookingConflict::ClassBusy);
    }
    if lessons
        .iter()
        .filter(same_cell)
        .any(|lesson| lesson.room_id == draft.room_id)
    {
        return Err(BookingConflict::RoomBusy);
    }
    if lessons
        .iter()
        .filter(same_cell)
        .any(|lesson| lesson.teacher_id == draft.teacher_id)
    {
        return Err(BookingConflict::TeacherBusy);
    }
    Ok(())
}
