use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use super::{MutationError, Resource, ResourcePage};
use crate::api::ApiClient;
use crate::forms::TeacherForm;
use crate::models::Teacher;
use crate::output::Record;
use crate::stats::{self, Breakdown};

pub(crate) fn flipped_status(active: bool) -> &'static str {
    if active {
        "inactive"
    } else {
        "active"
    }
}

impl Resource for Teacher {
    type Form = TeacherForm;

    const ENDPOINT: &'static str = "teachers.php";
    const LIST_KEYS: &'static [&'static str] = &["teachers"];
    const NOUN: &'static str = "teacher";

    fn id(&self) -> i64 {
        self.id
    }

    fn status_toggle(&self) -> Value {
        json!({ "status": flipped_status(self.is_active()) })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by_cached_key(|t| t.full_name().to_lowercase());
    }
}

impl Record for Teacher {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Phone", "Subject", "Qualification", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name(),
            self.email.clone(),
            self.phone.clone(),
            self.subject.clone(),
            self.qualification.clone(),
            self.status.clone(),
        ]
    }
}

impl Record for Breakdown {
    const COLUMNS: &'static [&'static str] = &["Group", "Count", "Share"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            self.count.to_string(),
            stats::format_percent(self.percent),
        ]
    }
}

pub fn subject_breakdown(teachers: &[Teacher]) -> Vec<Breakdown> {
    stats::breakdown(teachers, |t| t.subject.clone())
}

/// Which staff table a profile picture belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaffKind {
    Teacher,
    Employee,
}

impl StaffKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffKind::Teacher => "teacher",
            StaffKind::Employee => "employee",
        }
    }
}

/// Uploads a profile picture and returns its stored URL.
pub async fn upload_profile_picture(
    client: &ApiClient,
    kind: StaffKind,
    user_id: i64,
    path: &Path,
) -> Result<String, MutationError> {
    let url = client
        .upload(
            "upload_profile_picture.php",
            vec![
                ("user_type".to_string(), kind.as_str().to_string()),
                ("user_id".to_string(), user_id.to_string()),
            ],
            "profile_picture",
            path,
        )
        .await?;
    info!(user_type = kind.as_str(), user_id, %url, "profile picture uploaded");
    Ok(url)
}

pub type TeachersPage = ResourcePage<Teacher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_status() {
        let t = Teacher {
            status: "Active".into(),
            ..Default::default()
        };
        assert_eq!(t.status_toggle(), json!({"status": "inactive"}));
        let t = Teacher {
            status: "inactive".into(),
            ..Default::default()
        };
        assert_eq!(t.status_toggle(), json!({"status": "active"}));
    }

    #[test]
    fn breakdown_by_subject() {
        let rows: Vec<Teacher> = ["Maths", "maths", "English", ""]
            .iter()
            .map(|s| Teacher {
                subject: s.to_string(),
                ..Default::default()
            })
            .collect();
        let b = subject_breakdown(&rows);
        assert_eq!(b.iter().map(|x| x.count).sum::<usize>(), 4);
        assert_eq!(b[0].percent, 25.0);
        assert!(b.iter().all(|x| x.percent <= 100.0));
    }
}
