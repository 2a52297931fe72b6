use std::collections::HashMap;

use serde::Serialize;

use super::{Page, PageData, PageState};
use crate::api::{ApiClient, ApiRequest};
use crate::filter::{StudentFilter, StudentSort};
use crate::models::{SchoolClass, Student};
use crate::output::{self, Record};
use crate::stats::{self, Breakdown};

pub const EMPTY_MESSAGE: &str = "No students found.";

impl Record for Student {
    const COLUMNS: &'static [&'static str] = &[
        "Admission No",
        "Name",
        "Class",
        "Gender",
        "Status",
        "Email",
        "Phone",
        "Address",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.admission_no.clone(),
            self.full_name(),
            self.class_name.clone(),
            self.gender.clone(),
            self.status.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
        ]
    }
}

impl Record for SchoolClass {
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Class",
        "Level",
        "Capacity",
        "Enrolled",
        "Free",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.level.clone(),
            self.capacity.to_string(),
            self.student_count.to_string(),
            self.available_seats().to_string(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    pub students: Vec<Student>,
    pub classes: Vec<SchoolClass>,
}

impl PageData for Roster {
    fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl Roster {
    /// Fills blank class names from the class list.
    pub fn join_classes(mut self) -> Self {
        let names: HashMap<i64, &str> = self
            .classes
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        for s in self.students.iter_mut() {
            if s.class_name.trim().is_empty() {
                if let Some(name) = names.get(&s.class_id) {
                    s.class_name = name.to_string();
                }
            }
        }
        self
    }

    pub fn view(&self, filter: &StudentFilter, sort: StudentSort) -> Vec<&Student> {
        let mut rows = filter.apply(&self.students);
        sort.sort(&mut rows);
        rows
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentStats {
    pub total: usize,
    pub active: usize,
    pub active_percent: f64,
    pub by_gender: Vec<Breakdown>,
    pub by_status: Vec<Breakdown>,
}

pub fn student_stats(rows: &[&Student]) -> StudentStats {
    let active = rows.iter().filter(|s| s.is_active()).count();
    StudentStats {
        total: rows.len(),
        active,
        active_percent: stats::percentage(active as f64, rows.len() as f64),
        by_gender: stats::breakdown(rows, |s| s.gender.to_lowercase()),
        by_status: stats::breakdown(rows, |s| s.status.to_lowercase()),
    }
}

pub fn stats_card(s: &StudentStats) -> Vec<(&'static str, String)> {
    let share = |label: &str, list: &[Breakdown]| {
        let percent = list
            .iter()
            .find(|b| b.label == label)
            .map_or(0.0, |b| b.percent);
        stats::format_percent(percent)
    };
    vec![
        ("Students", s.total.to_string()),
        (
            "Active",
            format!("{} ({})", s.active, stats::format_percent(s.active_percent)),
        ),
        ("Female", share("female", &s.by_gender)),
        ("Male", share("male", &s.by_gender)),
    ]
}

/// CSV of exactly the rows given, which are the filtered rows.
pub fn export_csv(rows: &[&Student]) -> String {
    String::from_utf8_lossy(&output::render_csv(rows)).into_owned()
}

pub struct StudentsPage {
    client: ApiClient,
    pub roster: Page<Roster>,
}

impl StudentsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            roster: Page::new("students"),
        }
    }

    /// Students and classes are fetched concurrently; a failed class
    /// fetch only loses the class names.
    pub async fn refresh(&self) -> PageState<Roster> {
        let client = self.client.clone();
        self.roster
            .load(async move {
                let (students, classes) = tokio::join!(
                    client.fetch::<Vec<Student>>(ApiRequest::get("students.php"), &["students"]),
                    client.fetch_or_default::<Vec<SchoolClass>>(
                        ApiRequest::get("classes.php"),
                        &["classes"]
                    ),
                );
                Ok(Roster {
                    students: students?,
                    classes,
                }
                .join_classes())
            })
            .await
    }

    pub async fn roster(&self) -> Roster {
        self.roster.data().await.unwrap_or_default()
    }
}
