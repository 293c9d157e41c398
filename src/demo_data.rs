//! Demo data sets for the timetable service: the school's reference
//! entities plus a curriculum catalog sized SMALL (two senior classes) or
//! LARGE (all of grades 9–11).

use crate::catalog::{Catalog, SubjectPlan};
use crate::store::InMemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn curriculum(&self) -> Vec<(String, Vec<(&'static str, u8)>)> {
        match self {
            DemoData::Small => vec![
                ("10А".to_string(), senior_plan()),
                ("11А".to_string(), vec![("Алгебра", 4), ("Геометрия", 4)]),
            ],
            DemoData::Large => {
                let mut plans = Vec::new();
                for letter in SECTION_LETTERS {
                    plans.push((format!("9{letter}"), grade_9_plan()));
                    plans.push((format!("10{letter}"), senior_plan()));
                    plans.push((format!("11{letter}"), grade_11_plan()));
                }
                plans
            }
        }
    }
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

const SECTION_LETTERS: [&str; 3] = ["А", "Б", "В"];

const TEACHERS: &[&str] = &[
    "Иванов И.И. (алгебра)",
    "Петрова А.В. (геометрия)",
    "Сидорова Е.М. (физика)",
    "Козлов Д.Н. (история)",
    "Морозова Л.К. (биология)",
    "Орлова Н.К. (русский язык)",
    "Васильева Е.М. (английский)",
    "Лебедев С.П. (литература)",
    "Николаева Т.С. (химия)",
    "Фёдоров А.Б. (информатика)",
    "Смирнова О.П. (физкультура)",
    "Кузнецова Р.И. (музыка)",
    "Григорьев Д.М. (ОБЖ)",
    "Борисова Л.А. (география)",
    "Тихонов К.Е. (черчение)",
    "Романова Ю.С. (обществознание)",
];

const ROOMS: &[&str] = &[
    "Кабинет 101 (математика)",
    "Кабинет 102 (алгебра)",
    "Кабинет 103 (геометрия)",
    "Кабинет 201 (физика)",
    "Кабинет 202 (химия)",
    "Кабинет 301 (биология)",
    "Кабинет 302 (география)",
    "Кабинет 401 (история)",
    "Кабинет 402 (обществознание)",
    "Кабинет 501 (русский язык)",
    "Кабинет 502 (литература)",
    "Кабинет 601 (английский)",
    "Кабинет 602 (немецкий)",
    "Кабинет 701 (информатика)",
    "Кабинет 702 (черчение)",
    "Кабинет 801 (музыка)",
    "Кабинет 802 (ОБЖ)",
    "Спортзал №1",
    "Спортзал №2",
    "Актовый зал",
    "Библиотека",
    "Столовая",
];

const SUBJECTS: &[&str] = &[
    "Алгебра",
    "Геометрия",
    "Русский язык",
    "Литература",
    "Физика",
    "Химия",
    "Биология",
    "История",
    "Обществознание",
    "География",
    "Информатика",
    "Английский",
    "Физкультура",
    "Музыка",
    "ОБЖ",
    "Черчение",
    "Окружающий мир",
    "Трудовое воспитание",
    "ИЗО",
];

/// Subject -> (teacher, eligible rooms) for the scheduled subjects.
const STAFFING: &[(&str, &str, &[&str])] = &[
    ("Алгебра", "Иванов И.И. (алгебра)", &["Кабинет 102 (алгебра)"]),
    ("Геометрия", "Петрова А.В. (геометрия)", &["Кабинет 103 (геометрия)"]),
    ("Физика", "Сидорова Е.М. (физика)", &["Кабинет 201 (физика)"]),
    ("Информатика", "Фёдоров А.Б. (информатика)", &["Кабинет 701 (информатика)"]),
    ("Русский язык", "Орлова Н.К. (русский язык)", &["Кабинет 501 (русский язык)"]),
    ("Литература", "Лебедев С.П. (литература)", &["Кабинет 502 (литература)"]),
    ("Физкультура", "Смирнова О.П. (физкультура)", &["Спортзал №1", "Спортзал №2"]),
    ("Химия", "Николаева Т.С. (химия)", &["Кабинет 202 (химия)"]),
];

fn senior_plan() -> Vec<(&'static str, u8)> {
    vec![
        ("Алгебра", 4),
        ("Геометрия", 4),
        ("Физика", 2),
        ("Информатика", 2),
        ("Русский язык", 1),
        ("Литература", 1),
        ("Физкультура", 2),
        ("Химия", 1),
    ]
}

fn grade_9_plan() -> Vec<(&'static str, u8)> {
    vec![
        ("Алгебра", 3),
        ("Геометрия", 2),
        ("Русский язык", 2),
        ("Литература", 2),
        ("Физика", 2),
        ("Химия", 2),
        ("Информатика", 1),
        ("Физкультура", 2),
    ]
}

fn grade_11_plan() -> Vec<(&'static str, u8)> {
    vec![
        ("Алгебра", 4),
        ("Геометрия", 3),
        ("Физика", 3),
        ("Информатика", 2),
        ("Русский язык", 2),
        ("Литература", 2),
        ("Химия", 2),
    ]
}

/// Seeds the store with the reference entities and returns the matching
/// catalog for the chosen data set.
pub fn seed(store: &InMemoryStore, demo: DemoData) -> Catalog {
    for number in 1..=11 {
        for letter in SECTION_LETTERS {
            store.insert_class(number, letter);
        }
    }
    for name in TEACHERS {
        store.insert_teacher(*name);
    }
    for name in ROOMS {
        store.insert_room(*name);
    }
    for name in SUBJECTS {
        store.insert_subject(*name);
    }

    let mut catalog = Catalog::standard();
    for (subject, teacher, rooms) in STAFFING {
        catalog = catalog.with_subject(*subject, SubjectPlan::new(*teacher, rooms.iter().copied()));
    }
    for (class_name, plan) in demo.curriculum() {
        catalog = catalog.with_class_plan(class_name, plan);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityStore;

    #[test]
    fn seed_creates_the_full_reference_roster() {
        let store = InMemoryStore::new();
        seed(&store, DemoData::Small);

        assert_eq!(store.classes().unwrap().len(), 33);
        assert_eq!(store.teachers().unwrap().len(), 16);
        assert_eq!(store.rooms().unwrap().len(), 22);
        assert_eq!(store.subjects().unwrap().len(), 19);
    }

    #[test]
    fn small_covers_two_classes_large_covers_nine() {
        let store = InMemoryStore::new();
        assert_eq!(seed(&store, DemoData::Small).curriculum.len(), 2);

        let store = InMemoryStore::new();
        assert_eq!(seed(&store, DemoData::Large).curriculum.len(), 9);
    }

    #[test]
    fn every_demanded_subject_resolves_against_the_seeded_store() {
        for demo in [DemoData::Small, DemoData::Large] {
            let store = InMemoryStore::new();
            let catalog = seed(&store, demo);
            let resolved = catalog.resolve(
                &store.subjects().unwrap(),
                &store.teachers().unwrap(),
                &store.rooms().unwrap(),
            );
            assert!(
                resolved.failures.is_empty(),
                "{:?}: {:?}",
                demo,
                resolved.failures
            );
        }
    }

    #[test]
    fn class_10a_demands_seventeen_hours() {
        let store = InMemoryStore::new();
        let catalog = seed(&store, DemoData::Small);
        let total: u32 = catalog.curriculum["10А"].values().map(|&h| u32::from(h)).sum();
        assert_eq!(total, 17);
    }

    #[test]
    fn demo_data_from_str() {
        assert_eq!("SMALL".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("invalid".parse::<DemoData>().is_err());
    }
}
