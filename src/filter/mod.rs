use serde::Serialize;

use crate::models::Student;

/// Student list filter. Every set field must match (AND); unset fields and
/// a blank search term match everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StudentFilter {
    pub class_id: Option<i64>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub search: String,
}

fn eq_opt(expected: &Option<String>, actual: &str) -> bool {
    match expected.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(want) => want.eq_ignore_ascii_case(actual.trim()),
    }
}

pub fn matches_search(student: &Student, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        student.full_name(),
        student.admission_no.clone(),
        student.email.clone(),
        student.class_name.clone(),
        student.phone.clone(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

impl StudentFilter {
    pub fn matches(&self, student: &Student) -> bool {
        self.class_id.map_or(true, |id| student.class_id == id)
            && eq_opt(&self.status, &student.status)
            && eq_opt(&self.gender, &student.gender)
            && matches_search(student, &self.search)
    }

    pub fn apply<'a>(&self, students: &'a [Student]) -> Vec<&'a Student> {
        students.iter().filter(|s| self.matches(s)).collect()
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StudentSort {
    #[default]
    Name,
    AdmissionNo,
    Class,
}

impl StudentSort {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(StudentSort::Name),
            "admission" | "admission_no" | "admission-no" => Ok(StudentSort::AdmissionNo),
            "class" => Ok(StudentSort::Class),
            other => Err(format!(
                "unknown sort key '{other}', expected name, admission or class"
            )),
        }
    }

    pub fn sort(self, rows: &mut [&Student]) {
        match self {
            StudentSort::Name => rows.sort_by_cached_key(|s| s.full_name().to_lowercase()),
            StudentSort::AdmissionNo => rows.sort_by(|a, b| a.admission_no.cmp(&b.admission_no)),
            StudentSort::Class => rows.sort_by_cached_key(|s| {
                (s.class_name.to_lowercase(), s.full_name().to_lowercase())
            }),
        }
    }
}
