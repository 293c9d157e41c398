//! REST API for the timetable service.
//!
//! Endpoints mirror the service surface: reference-data listings, a
//! per-class week view, full regeneration and manual lesson booking.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Datelike, Duration, NaiveDate};
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::domain::{
    ClassId, Day, Diagnostic, Lesson, LessonId, RoomId, SchoolClass, Slot, SubjectId, TeacherId,
};
use crate::generator;
use crate::store::{EntityStore, InMemoryStore, LessonDraft, StoreError};

/// Application state shared across handlers: the entity store plus the
/// curriculum catalog the generator runs against.
pub struct AppState {
    pub store: InMemoryStore,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(store: InMemoryStore, catalog: Catalog) -> Self {
        Self { store, catalog }
    }
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDto {
    pub id: ClassId,
    pub number: u8,
    pub letter: String,
    pub name: String,
}

impl From<&SchoolClass> for ClassDto {
    fn from(class: &SchoolClass) -> Self {
        Self {
            id: class.id,
            number: class.number,
            letter: class.letter.clone(),
            name: class.name(),
        }
    }
}

/// A lesson with its references joined to display names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: LessonId,
    pub class_id: ClassId,
    pub class_name: String,
    pub subject_id: SubjectId,
    pub subject: String,
    pub teacher_id: TeacherId,
    pub teacher: String,
    pub room_id: RoomId,
    pub room: String,
    pub day: Day,
    pub slot: Slot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLessonRequest {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub slot: Slot,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Optional fixed seed; omit for a different schedule every run.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub run_id: String,
    pub committed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// One day column of a class week view: a date plus one entry per slot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleDto {
    pub day: Day,
    pub date: NaiveDate,
    pub slots: Vec<Option<LessonDto>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekScheduleDto {
    pub class_id: ClassId,
    pub class_name: String,
    pub week_offset: i64,
    pub days: Vec<DayScheduleDto>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    #[serde(default)]
    pub week_offset: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(err: StoreError) -> ApiError {
    error!("store failure: {err}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

// ============================================================================
// Name joining
// ============================================================================

struct NameIndex {
    classes: HashMap<ClassId, String>,
    subjects: HashMap<SubjectId, String>,
    teachers: HashMap<TeacherId, String>,
    rooms: HashMap<RoomId, String>,
}

impl NameIndex {
    fn load(store: &impl EntityStore) -> Result<Self, StoreError> {
        Ok(Self {
            classes: store
                .classes()?
                .into_iter()
                .map(|c| (c.id, c.name()))
                .collect(),
            subjects: store
                .subjects()?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect(),
            teachers: store
                .teachers()?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect(),
            rooms: store.rooms()?.into_iter().map(|r| (r.id, r.name)).collect(),
        })
    }

    fn lesson_dto(&self, lesson: &Lesson) -> LessonDto {
        let name = |map: &HashMap<u32, String>, id: u32| {
            map.get(&id).cloned().unwrap_or_else(|| "?".to_string())
        };
        LessonDto {
            id: lesson.id,
            class_id: lesson.class_id,
            class_name: name(&self.classes, lesson.class_id),
            subject_id: lesson.subject_id,
            subject: name(&self.subjects, lesson.subject_id),
            teacher_id: lesson.teacher_id,
            teacher: name(&self.teachers, lesson.teacher_id),
            room_id: lesson.room_id,
            room: name(&self.rooms, lesson.room_id),
            day: lesson.day,
            slot: lesson.slot,
        }
    }
}

/// Monday of the week `offset` weeks away from the week containing `today`.
fn monday_of_week(today: NaiveDate, offset: i64) -> NaiveDate {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday + Duration::weeks(offset)
}

fn build_week_view(
    class: &SchoolClass,
    lessons: &[Lesson],
    names: &NameIndex,
    catalog: &Catalog,
    monday: NaiveDate,
    week_offset: i64,
) -> WeekScheduleDto {
    let days = catalog
        .days
        .iter()
        .map(|&day| {
            let slots = catalog
                .slots
                .iter()
                .map(|&slot| {
                    lessons
                        .iter()
                        .find(|l| l.class_id == class.id && l.day == day && l.slot == slot)
                        .map(|l| names.lesson_dto(l))
                })
                .collect();
            DayScheduleDto {
                day,
                date: monday + Duration::days(i64::from(day)),
                slots,
            }
        })
        .collect();

    WeekScheduleDto {
        class_id: class.id,
        class_name: class.name(),
        week_offset,
        days,
    }
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Reference data
        .route("/demo-data", get(list_demo_data))
        .route("/classes", get(list_classes))
        .route("/classes/{id}/schedule", get(class_schedule))
        // Schedule generation
        .route("/schedule/generate", post(generate_schedule))
        // Manual lesson management
        .route("/lessons", get(list_lessons))
        .route("/lessons", post(add_lesson))
        .route("/lessons/{id}", delete(remove_lesson))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "School Timetable",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(crate::demo_data::list_demo_data())
}

/// GET /classes - List all classes.
async fn list_classes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ClassDto>>, ApiError> {
    let classes = state.store.classes().map_err(store_error)?;
    Ok(Json(classes.iter().map(ClassDto::from).collect()))
}

/// GET /classes/{id}/schedule?weekOffset=N - Week view for one class.
async fn class_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ClassId>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekScheduleDto>, ApiError> {
    let classes = state.store.classes().map_err(store_error)?;
    let class = classes
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "class not found"))?;

    let lessons = state.store.lessons().map_err(store_error)?;
    let names = NameIndex::load(&state.store).map_err(store_error)?;
    let monday = monday_of_week(chrono::Local::now().date_naive(), query.week_offset);

    Ok(Json(build_week_view(
        class,
        &lessons,
        &names,
        &state.catalog,
        monday,
        query.week_offset,
    )))
}

/// POST /schedule/generate - Regenerate the full timetable.
///
/// Always succeeds at the transport level; unplaced lessons are reported
/// in the diagnostics list.
async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    request: Option<Json<GenerateRequest>>,
) -> Result<Json<GenerateResponse>, ApiError> {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let seed = request.and_then(|Json(r)| r.seed);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report =
        generator::regenerate(&state.store, &state.catalog, &mut rng).map_err(store_error)?;

    Ok(Json(GenerateResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        committed: report.committed,
        diagnostics: report.diagnostics,
    }))
}

/// GET /lessons - List all committed lessons.
async fn list_lessons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LessonDto>>, ApiError> {
    let lessons = state.store.lessons().map_err(store_error)?;
    let names = NameIndex::load(&state.store).map_err(store_error)?;
    Ok(Json(lessons.iter().map(|l| names.lesson_dto(l)).collect()))
}

/// POST /lessons - Manually book a single lesson.
///
/// Rejected loudly on any conflict with the persisted schedule.
async fn add_lesson(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddLessonRequest>,
) -> Result<(StatusCode, Json<LessonDto>), ApiError> {
    let catalog = &state.catalog;
    if !catalog.days.contains(&request.day) || !catalog.slots.contains(&request.slot) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "day or slot outside the timetable grid",
        ));
    }

    let names = NameIndex::load(&state.store).map_err(store_error)?;
    if !names.classes.contains_key(&request.class_id)
        || !names.subjects.contains_key(&request.subject_id)
        || !names.teachers.contains_key(&request.teacher_id)
        || !names.rooms.contains_key(&request.room_id)
    {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "unknown class, subject, teacher or room id",
        ));
    }

    let draft = LessonDraft {
        class_id: request.class_id,
        subject_id: request.subject_id,
        teacher_id: request.teacher_id,
        room_id: request.room_id,
        day: request.day,
        slot: request.slot,
    };

    let lessons = state.store.lessons().map_err(store_error)?;
    generator::validate_manual_booking(&lessons, &draft)
        .map_err(|conflict| api_error(StatusCode::CONFLICT, conflict.to_string()))?;

    let lesson = state.store.insert_lesson(draft).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(names.lesson_dto(&lesson))))
}

/// DELETE /lessons/{id} - Delete one lesson.
async fn remove_lesson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<LessonId>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_lesson(id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(StatusCode::NOT_FOUND, "lesson not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: LessonId, class_id: ClassId, day: Day, slot: Slot) -> Lesson {
        Lesson {
            id,
            class_id,
            subject_id: 1,
            teacher_id: 1,
            room_id: 1,
            day,
            slot,
        }
    }

    fn names_for(store: &InMemoryStore) -> NameIndex {
        NameIndex::load(store).unwrap()
    }

    #[test]
    fn monday_of_week_rewinds_to_monday() {
        // 2026-08-06 is a Thursday.
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let monday = monday_of_week(thursday, 0);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(monday.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn monday_of_week_applies_the_offset() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(
            monday_of_week(monday, 1),
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
        );
        assert_eq!(
            monday_of_week(monday, -1),
            NaiveDate::from_ymd_opt(2026, 7, 27).unwrap()
        );
    }

    #[test]
    fn lesson_dto_joins_display_names() {
        let store = InMemoryStore::new();
        let class = store.insert_class(10, "А");
        store.insert_subject("Алгебра");
        store.insert_teacher("Иванов И.И. (алгебра)");
        store.insert_room("Кабинет 102 (алгебра)");

        let dto = names_for(&store).lesson_dto(&lesson(1, class.id, 0, 1));
        assert_eq!(dto.class_name, "10А");
        assert_eq!(dto.subject, "Алгебра");
        assert_eq!(dto.teacher, "Иванов И.И. (алгебра)");
        assert_eq!(dto.room, "Кабинет 102 (алгебра)");
    }

    #[test]
    fn lesson_dto_tolerates_dangling_references() {
        let store = InMemoryStore::new();
        let dto = names_for(&store).lesson_dto(&lesson(1, 42, 0, 1));
        assert_eq!(dto.class_name, "?");
        assert_eq!(dto.subject, "?");
    }

    #[test]
    fn week_view_places_lessons_at_their_slots() {
        let store = InMemoryStore::new();
        let class = store.insert_class(10, "А");
        store.insert_subject("Алгебра");
        store.insert_teacher("Иванов И.И. (алгебра)");
        store.insert_room("Кабинет 102 (алгебра)");

        let lessons = vec![lesson(1, class.id, 0, 1), lesson(2, class.id, 2, 5)];
        let names = names_for(&store);
        let catalog = Catalog::standard();
        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();

        let view = build_week_view(&class, &lessons, &names, &catalog, monday, 0);

        assert_eq!(view.class_name, "10А");
        assert_eq!(view.days.len(), 5);
        assert_eq!(view.days[0].slots.len(), 8);
        assert!(view.days[0].slots[0].is_some());
        assert!(view.days[0].slots[1].is_none());
        assert!(view.days[2].slots[4].is_some());
        assert_eq!(view.days[2].date, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
    }

    #[test]
    fn week_view_skips_other_classes() {
        let store = InMemoryStore::new();
        let class = store.insert_class(10, "А");
        let other = store.insert_class(11, "А");

        let lessons = vec![lesson(1, other.id, 0, 1)];
        let names = names_for(&store);
        let catalog = Catalog::standard();
        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();

        let view = build_week_view(&class, &lessons, &names, &catalog, monday, 0);
        assert!(view.days.iter().all(|d| d.slots.iter().all(Option::is_none)));
    }
}
