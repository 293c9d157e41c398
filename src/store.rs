//! Persistence seam for the timetable service.
//!
//! The generator only ever talks to [`EntityStore`]; the shipped backend is
//! an in-memory store behind a [`parking_lot::RwLock`]. A SQL-backed store
//! would implement the same trait.

use parking_lot::RwLock;
use std::fmt;

use crate::domain::{
    ClassId, Day, Lesson, LessonId, Room, RoomId, SchoolClass, Slot, Subject, SubjectId, Teacher,
    TeacherId,
};

/// Persistence failure. Fatal to the operation that hit it; the in-memory
/// backend never produces one, but the trait keeps the failure path honest
/// for real backends.
#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(detail) => write!(f, "store unavailable: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A lesson that has not been assigned an id by the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub slot: Slot,
}

impl LessonDraft {
    fn into_lesson(self, id: LessonId) -> Lesson {
        Lesson {
            id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            room_id: self.room_id,
            day: self.day,
            slot: self.slot,
        }
    }
}

/// Snapshot reads and lesson writes used by the generator and the API.
pub trait EntityStore {
    fn classes(&self) -> Result<Vec<SchoolClass>, StoreError>;
    fn subjects(&self) -> Result<Vec<Subject>, StoreError>;
    fn teachers(&self) -> Result<Vec<Teacher>, StoreError>;
    fn rooms(&self) -> Result<Vec<Room>, StoreError>;
    fn lessons(&self) -> Result<Vec<Lesson>, StoreError>;

    /// Replaces the whole committed lesson set in one logical transaction.
    ///
    /// Readers never observe the half-cleared state between the delete and
    /// the insert. Returns the number of lessons committed.
    fn replace_lessons(&self, drafts: Vec<LessonDraft>) -> Result<usize, StoreError>;

    /// Inserts a single manually booked lesson.
    fn insert_lesson(&self, draft: LessonDraft) -> Result<Lesson, StoreError>;

    /// Deletes one lesson; `Ok(false)` if the id was unknown.
    fn delete_lesson(&self, id: LessonId) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
struct StoreInner {
    classes: Vec<SchoolClass>,
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    lessons: Vec<Lesson>,
    next_class_id: ClassId,
    next_subject_id: SubjectId,
    next_teacher_id: TeacherId,
    next_room_id: RoomId,
    next_lesson_id: LessonId,
}

fn next_id(counter: &mut u32) -> u32 {
    *counter += 1;
    *counter
}

/// In-memory [`EntityStore`] shared across API handlers via `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_class(&self, number: u8, letter: impl Into<String>) -> SchoolClass {
        let mut inner = self.inner.write();
        let id = next_id(&mut inner.next_class_id);
        let class = SchoolClass::new(id, number, letter);
        inner.classes.push(class.clone());
        class
    }

    pub fn insert_subject(&self, name: impl Into<String>) -> Subject {
        let mut inner = self.inner.write();
        let id = next_id(&mut inner.next_subject_id);
        let subject = Subject::new(id, name);
        inner.subjects.push(subject.clone());
        subject
    }

    pub fn insert_teacher(&self, name: impl Into<String>) -> Teacher {
        let mut inner = self.inner.write();
        let id = next_id(&mut inner.next_teacher_id);
        let teacher = Teacher::new(id, name);
        inner.teachers.push(teacher.clone());
        teacher
    }

    pub fn insert_room(&self, name: impl Into<String>) -> Room {
        let mut inner = self.inner.write();
        let id = next_id(&mut inner.next_room_id);
        let room = Room::new(id, name);
        inner.rooms.push(room.clone());
        room
    }
}

impl EntityStore for InMemoryStore {
    fn classes(&self) -> Result<Vec<SchoolClass>, StoreError> {
        Ok(self.inner.read().classes.clone())
    }

    fn subjects(&self) -> Result<Vec<Subject>, StoreError> {
        Ok(self.inner.read().subjects.clone())
    }

    fn teachers(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(self.inner.read().teachers.clone())
    }

    fn rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.inner.read().rooms.clone())
    }

    fn lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        Ok(self.inner.read().lessons.clone())
    }

    fn replace_lessons(&self, drafts: Vec<LessonDraft>) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        inner.lessons.clear();
        let count = drafts.len();
        for draft in drafts {
            let id = next_id(&mut inner.next_lesson_id);
            inner.lessons.push(draft.into_lesson(id));
        }
        Ok(count)
    }

    fn insert_lesson(&self, draft: LessonDraft) -> Result<Lesson, StoreError> {
        let mut inner = self.inner.write();
        let id = next_id(&mut inner.next_lesson_id);
        let lesson = draft.into_lesson(id);
        inner.lessons.push(lesson.clone());
        Ok(lesson)
    }

    fn delete_lesson(&self, id: LessonId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let before = inner.lessons.len();
        inner.lessons.retain(|lesson| lesson.id != id);
        Ok(inner.lessons.len() < before)
    }
}
