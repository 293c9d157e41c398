//! Domain model for school timetable generation.

use serde::{Deserialize, Serialize};
use std::fmt;

// Entity id aliases, matching the integer keys of the backing store.
pub type ClassId = u32;
pub type SubjectId = u32;
pub type TeacherId = u32;
pub type RoomId = u32;
pub type LessonId = u32;

/// Weekday index. The standard catalog uses `0..=4` (Mon–Fri).
pub type Day = u8;

/// Lesson-period position within a day. The standard catalog uses `1..=8`.
pub type Slot = u8;

/// A school class ("10А"), referenced by id in all conflict checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: ClassId,
    /// Grade number, 1–11.
    pub number: u8,
    /// Section letter ("А", "Б", ...).
    pub letter: String,
}

impl SchoolClass {
    pub fn new(id: ClassId, number: u8, letter: impl Into<String>) -> Self {
        Self {
            id,
            number,
            letter: letter.into(),
        }
    }

    /// Display name used as the curriculum key, e.g. `"10А"`.
    pub fn name(&self) -> String {
        format!("{}{}", self.number, self.letter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

impl Subject {
    pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
}

impl Teacher {
    pub fn new(id: TeacherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A committed lesson assignment: one class meets one subject with one
/// teacher in one room at a fixed (day, slot).
///
/// Global invariant across the stored set: at any (day, slot) a class,
/// teacher, or room appears in at most one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub slot: Slot,
}

/// Classifies a non-fatal problem encountered during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    /// A class, subject, teacher or room named in the catalog has no
    /// counterpart in the store.
    ReferenceMissing,
    /// No (slot, room) combination could seat a lesson unit.
    PlacementExhausted,
}

/// A requirement that could not be satisfied during generation.
///
/// Diagnostics are accumulated and returned to the caller; they never
/// abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Day>,
    pub reason: String,
}

impl Diagnostic {
    pub fn reference_missing(
        class_name: impl Into<String>,
        subject: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::ReferenceMissing,
            class_name: class_name.into(),
            subject,
            day: None,
            reason: reason.into(),
        }
    }

    pub fn placement_exhausted(
        class_name: impl Into<String>,
        subject: impl Into<String>,
        day: Day,
    ) -> Self {
        Self {
            kind: DiagnosticKind::PlacementExhausted,
            class_name: class_name.into(),
            subject: Some(subject.into()),
            day: Some(day),
            reason: "no free (slot, room) combination left".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] class {}", self.kind, self.class_name)?;
        if let Some(subject) = &self.subject {
            write!(f, ", subject {}", subject)?;
        }
        if let Some(day) = self.day {
            write!(f, ", day {}", day)?;
        }
        write!(f, ": {}", self.reason)
    }
}
