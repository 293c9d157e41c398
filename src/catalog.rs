//! Curriculum catalog: which subjects each class takes each week, who
//! teaches each subject and which rooms may host it.
//!
//! The catalog is plain data keyed by names; [`Catalog::resolve`] joins it
//! against a store snapshot once per generation run, so missing references
//! surface eagerly instead of failing lookup-by-lookup inside the placer.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Day, Room, RoomId, Slot, Subject, SubjectId, Teacher, TeacherId};

/// Staffing for one subject: its teacher and the rooms that may host it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPlan {
    pub teacher: String,
    pub rooms: Vec<String>,
}

impl SubjectPlan {
    pub fn new(
        teacher: impl Into<String>,
        rooms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            rooms: rooms.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full scheduling catalog. Read-only during generation.
///
/// Days and slots are data so the grid shape is not baked into the
/// algorithm; [`Catalog::standard`] gives the usual 5×8 school week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub days: Vec<Day>,
    pub slots: Vec<Slot>,
    /// Class name -> subject name -> required weekly hours.
    pub curriculum: BTreeMap<String, BTreeMap<String, u8>>,
    /// Subject name -> staffing plan.
    pub subjects: BTreeMap<String, SubjectPlan>,
}

impl Catalog {
    /// An empty catalog over Mon–Fri, lesson periods 1–8.
    pub fn standard() -> Self {
        Self {
            days: (0..5).collect(),
            slots: (1..=8).collect(),
            curriculum: BTreeMap::new(),
            subjects: BTreeMap::new(),
        }
    }

    pub fn with_subject(mut self, name: impl Into<String>, plan: SubjectPlan) -> Self {
        self.subjects.insert(name.into(), plan);
        self
    }

    pub fn with_class_plan(
        mut self,
        class_name: impl Into<String>,
        hours: impl IntoIterator<Item = (impl Into<String>, u8)>,
    ) -> Self {
        let plan = hours
            .into_iter()
            .map(|(subject, h)| (subject.into(), h))
            .collect();
        self.curriculum.insert(class_name.into(), plan);
        self
    }

    /// Weekly subject-hours table for one class, if the catalog knows it.
    pub fn class_plan(&self, class_name: &str) -> Option<&BTreeMap<String, u8>> {
        self.curriculum.get(class_name)
    }

    /// Joins the name-keyed subject plans against store snapshots.
    ///
    /// Every subject referenced by any class plan ends up either in
    /// `subjects` (fully resolved ids) or in `failures` with the reason it
    /// cannot be scheduled. A failed subject contributes zero lesson units.
    pub fn resolve(
        &self,
        subjects: &[Subject],
        teachers: &[Teacher],
        rooms: &[Room],
    ) -> ResolvedCatalog {
        let subject_ids: BTreeMap<&str, SubjectId> =
            subjects.iter().map(|s| (s.name.as_str(), s.id)).collect();
        let teacher_ids: BTreeMap<&str, TeacherId> =
            teachers.iter().map(|t| (t.name.as_str(), t.id)).collect();
        let room_ids: BTreeMap<&str, RoomId> =
            rooms.iter().map(|r| (r.name.as_str(), r.id)).collect();

        let mut resolved = ResolvedCatalog::default();

        let demanded: BTreeSet<&str> = self
            .curriculum
            .values()
            .flat_map(|plan| plan.keys())
            .map(String::as_str)
            .collect();

        for name in demanded {
            match self.resolve_subject(name, &subject_ids, &teacher_ids, &room_ids) {
                Ok(entry) => {
                    resolved.subjects.insert(name.to_string(), entry);
                }
                Err(reason) => {
                    resolved.failures.insert(name.to_string(), reason);
                }
            }
        }

        resolved
    }

    fn resolve_subject(
        &self,
        name: &str,
        subject_ids: &BTreeMap<&str, SubjectId>,
        teacher_ids: &BTreeMap<&str, TeacherId>,
        room_ids: &BTreeMap<&str, RoomId>,
    ) -> Result<ResolvedSubject, String> {
        let plan = self
            .subjects
            .get(name)
            .ok_or_else(|| format!("no staffing plan for subject {name}"))?;
        let subject_id = *subject_ids
            .get(name)
            .ok_or_else(|| format!("subject {name} not found in store"))?;
        let teacher_id = *teacher_ids
            .get(plan.teacher.as_str())
            .ok_or_else(|| format!("teacher {} not found in store", plan.teacher))?;

        let rooms: Vec<RoomId> = plan
            .rooms
            .iter()
            .filter_map(|room| room_ids.get(room.as_str()).copied())
            .collect();
        if rooms.is_empty() {
            return Err(format!("no eligible room for subject {name} found in store"));
        }

        Ok(ResolvedSubject {
            subject_id,
            teacher_id,
            rooms,
        })
    }
}

/// A subject plan with every name joined to a store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubject {
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    /// Non-empty; the placer picks one per lesson at placement time.
    pub rooms: Vec<RoomId>,
}

/// Result of joining the catalog against one store snapshot.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCatalog {
    pub subjects: BTreeMap<String, ResolvedSubject>,
    /// Subject name -> why it cannot be scheduled this run.
    pub failures: BTreeMap<String, String>,
}
