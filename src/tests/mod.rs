
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiClient, ApiError, ApiRequest, FormPart, RequestBody, Session};
use crate::forms::{TeacherForm, Validate, ValidationError};
use crate::models::ReportKind;
use crate::pages::dashboard::DashboardPage;
use crate::pages::education_levels::{EducationLevelsPage, ReorderOutcome};
use crate::pages::hr::{HrPage, LeaveDecision};
use crate::pages::reports::{self, ReportsPage};
use crate::pages::resource::{Resource, ResourcePage};
use crate::pages::roles::RolesPage;
use crate::pages::settings::SettingsPage;
use crate::pages::students::StudentsPage;
use crate::pages::system_reset::{self, ResetError, ResetOptions};
use crate::pages::teachers::{self, StaffKind, TeachersPage};
use crate::pages::{AssumeYes, Confirm, MutationError, PageState};

use mock::MockTransport;

const HR: &str = "hr_management.php";

struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

fn levels_backend() -> Arc<MockTransport> {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "education_levels.php",
        &[],
        json!({"success": true, "levels": [
            {"id": 2, "name": "Primary", "code": "PRI", "display_order": 2, "is_active": 1},
            {"id": 1, "name": "Nursery", "code": "NUR", "display_order": 1, "is_active": 1},
            {"id": 3, "name": "Secondary", "code": "SEC", "display_order": 3, "is_active": "0"}
        ]}),
    );
    mock.on(
        Method::PUT,
        "education_levels.php",
        &[("action", "swap_order")],
        json!({"success": true}),
    );
    mock
}

fn teachers_backend() -> Arc<MockTransport> {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "teachers.php",
        &[],
        json!({"success": true, "teachers": [
            {"id": "3", "first_name": "Ada", "last_name": "Lovelace", "email": "ada@school.org", "specialization": "Maths", "status": "active"}
        ]}),
    );
    mock
}

#[tokio::test]
async fn approving_leave_posts_once_then_refetches_list_and_summary() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        HR,
        &[("action", "update_leave_status")],
        json!({"success": true, "message": "Leave request approved"}),
    );
    mock.on(
        Method::GET,
        HR,
        &[("action", "leaves")],
        json!({"success": true, "leaves": [{"leave_id": "17", "employee_name": "Grace Hopper", "status": "approved"}]}),
    );
    mock.on(
        Method::GET,
        HR,
        &[("action", "dashboard")],
        json!({"success": true, "data": {"total_employees": "12", "pending_leave_requests": 0}}),
    );

    let page = HrPage::new(mock.client());
    page.decide_leave(17, LeaveDecision::Approve).await.unwrap();

    assert_eq!(mock.count(Method::POST, HR), 1);
    assert_eq!(mock.count_action(Method::GET, HR, "leaves"), 1);
    assert_eq!(mock.count_action(Method::GET, HR, "dashboard"), 1);
    assert_eq!(mock.requests().len(), 3);

    let post = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::POST)
        .unwrap();
    assert_eq!(
        post.json_body(),
        Some(&json!({"leave_id": 17, "status": "approved"}))
    );

    let leaves = page.leaves.data().await.unwrap();
    assert_eq!(leaves[0].id, 17);
    let summary = page.summary.data().await.unwrap();
    assert_eq!(summary.total_employees, 12);
    assert_eq!(summary.pending_leaves, 0);
}

#[tokio::test]
async fn failed_leave_decision_skips_refetch() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        HR,
        &[("action", "update_leave_status")],
        json!({"success": false, "message": "Leave request not found"}),
    );
    let page = HrPage::new(mock.client());
    let err = page
        .decide_leave(99, LeaveDecision::Reject)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Leave request not found");
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn levels_are_listed_in_display_order() {
    let mock = levels_backend();
    let page = EducationLevelsPage::education_levels(mock.client());
    page.refresh().await;
    let ids: Vec<i64> = page.rows().await.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(page.position_of(3).await, Some(2));
}

#[tokio::test]
async fn moving_first_level_up_sends_nothing() {
    let mock = levels_backend();
    let page = EducationLevelsPage::education_levels(mock.client());
    page.refresh().await;
    let before = mock.requests().len();

    let outcome = page.move_up(0).await.unwrap();
    assert_eq!(outcome, ReorderOutcome::Unchanged);
    let outcome = page.move_down(2).await.unwrap();
    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert_eq!(mock.requests().len(), before);
}

#[tokio::test]
async fn moving_level_down_swaps_in_one_request() {
    let mock = levels_backend();
    let page = EducationLevelsPage::education_levels(mock.client());
    page.refresh().await;

    let outcome = page.move_down(0).await.unwrap();
    assert_eq!(outcome, ReorderOutcome::Swapped { moved: 1, with: 2 });

    let puts: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].query_value("action"), Some("swap_order"));
    assert_eq!(
        puts[0].json_body(),
        Some(&json!({"orders": [
            {"id": 1, "display_order": 2},
            {"id": 2, "display_order": 1}
        ]}))
    );
    assert_eq!(mock.count(Method::GET, "education_levels.php"), 2);
}

#[tokio::test]
async fn rejected_swap_refetches_and_reports() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "education_levels.php",
        &[],
        json!({"levels": [{"id": 1, "display_order": 1}, {"id": 2, "display_order": 2}]}),
    );
    mock.on(
        Method::PUT,
        "education_levels.php",
        &[("action", "swap_order")],
        json!({"success": false, "message": "Display order conflict"}),
    );
    let page = EducationLevelsPage::education_levels(mock.client());
    page.refresh().await;
    let err = page.move_up(1).await.unwrap_err();
    assert_eq!(err.to_string(), "Display order conflict");
    assert_eq!(mock.count(Method::GET, "education_levels.php"), 2);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let mock = teachers_backend();
    let page = TeachersPage::new(mock.client());
    page.refresh().await;

    let deleted = page.delete(3, &Decline).await.unwrap();
    assert!(!deleted);
    assert_eq!(mock.count(Method::DELETE, "teachers.php"), 0);
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn confirmed_delete_sends_delete_then_refetches() {
    let mock = teachers_backend();
    mock.on(Method::DELETE, "teachers.php", &[], json!({"success": true}));
    let page = TeachersPage::new(mock.client());
    page.refresh().await;

    assert!(page.delete(3, &AssumeYes).await.unwrap());
    let log = mock.requests();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].method, Method::DELETE);
    assert_eq!(log[1].query_value("id"), Some("3"));
    assert_eq!(log[2].method, Method::GET);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let mock = teachers_backend();
    let page = TeachersPage::new(mock.client());
    let form = TeacherForm {
        first_name: "Alan".into(),
        last_name: "Turing".into(),
        ..Default::default()
    };
    let err = page.create(&form).await.unwrap_err();
    assert!(matches!(
        err,
        MutationError::Validation(ValidationError::Required { field: "email" })
    ));

    let form = TeacherForm {
        email: "not-an-email".into(),
        ..form
    };
    let err = page.create(&form).await.unwrap_err();
    assert!(matches!(
        err,
        MutationError::Validation(ValidationError::InvalidEmail { .. })
    ));
    assert!(mock.requests().is_empty());
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Gadget {
    id: i64,
}

/// JSON objects only take string keys, so this form never encodes.
#[derive(Default, Serialize)]
struct GadgetForm {
    slots: BTreeMap<(u8, u8), u8>,
}

impl Validate for GadgetForm {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Resource for Gadget {
    type Form = GadgetForm;

    const ENDPOINT: &'static str = "gadgets.php";
    const LIST_KEYS: &'static [&'static str] = &["gadgets"];
    const NOUN: &'static str = "gadget";

    fn id(&self) -> i64 {
        self.id
    }

    fn status_toggle(&self) -> serde_json::Value {
        json!({})
    }
}

#[tokio::test]
async fn unencodable_form_fails_before_sending() {
    let mock = MockTransport::new();
    mock.on(Method::POST, "gadgets.php", &[], json!({"success": true}));
    mock.on(Method::PUT, "gadgets.php", &[], json!({"success": true}));
    let page = ResourcePage::<Gadget>::new(mock.client());
    let mut form = GadgetForm::default();
    form.slots.insert((1, 2), 3);

    let err = page.create(&form).await.unwrap_err();
    match err {
        MutationError::Api(ApiError::Encode { endpoint, .. }) => {
            assert_eq!(endpoint, "gadgets.php")
        }
        other => panic!("expected encode error, got {other:?}"),
    }
    let err = page.update(7, &form).await.unwrap_err();
    assert!(matches!(err, MutationError::Api(ApiError::Encode { .. })));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn toggle_resends_full_record_with_flipped_status() {
    let mock = teachers_backend();
    mock.on(Method::PUT, "teachers.php", &[], json!({"success": true}));
    let page = TeachersPage::new(mock.client());
    page.refresh().await;

    let teacher = page.find(3).await.unwrap();
    page.toggle_status(&teacher).await.unwrap();

    let put = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::PUT)
        .unwrap();
    assert_eq!(put.query_value("id"), Some("3"));
    let body = put.json_body().unwrap();
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["subject"], "Maths");
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn backend_rejection_surfaces_its_message() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "roles.php",
        &[],
        json!({"success": false, "message": "Role name already exists"}),
    );
    let page = RolesPage::new(mock.client());
    let form = crate::forms::RoleForm {
        name: "Bursar".into(),
        ..Default::default()
    };
    let err = page.roles.create(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "Role name already exists");
    // no refetch after a rejected mutation
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn error_status_prefers_backend_message() {
    let mock = MockTransport::new();
    mock.on_status(
        Method::GET,
        "invoices.php",
        &[],
        500,
        r#"{"success": false, "error": "Database unavailable"}"#,
    );
    mock.on_status(Method::GET, "students.php", &[], 502, "<html>Bad gateway</html>");
    let client = mock.client();

    let err = client
        .fetch::<Vec<crate::models::Invoice>>(ApiRequest::get("invoices.php"), &["invoices"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");

    let err = client
        .fetch::<Vec<crate::models::Student>>(ApiRequest::get("students.php"), &["students"])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, .. }));
}

#[tokio::test]
async fn assigning_permissions_replaces_the_set() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "roles.php", &[], json!({"roles": []}));
    mock.on(
        Method::PUT,
        "roles.php",
        &[("action", "permissions")],
        json!({"success": true}),
    );
    let page = RolesPage::new(mock.client());
    let perms = vec!["students.view".to_string(), "invoices.create".to_string()];
    page.assign_permissions(4, &perms).await.unwrap();

    let put = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::PUT)
        .unwrap();
    assert_eq!(
        put.json_body(),
        Some(&json!({"role_id": 4, "permissions": ["students.view", "invoices.create"]}))
    );
    assert_eq!(mock.count(Method::GET, "roles.php"), 1);
}

#[tokio::test]
async fn reset_requires_the_exact_phrase() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "system_reset.php",
        &[],
        json!({"success": true, "message": "Selected data cleared"}),
    );
    let client = mock.client();
    let options = ResetOptions {
        students: true,
        finance: true,
        ..Default::default()
    };

    for attempt in ["reset-confirm", "RESET-CONFIRM ", " RESET-CONFIRM", ""] {
        let err = system_reset::reset(&client, attempt, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ResetError::NotConfirmed));
    }
    assert!(mock.requests().is_empty());

    let err = system_reset::reset(&client, "RESET-CONFIRM", &ResetOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ResetError::NothingSelected));
    assert!(mock.requests().is_empty());

    system_reset::reset(&client, "RESET-CONFIRM", &options)
        .await
        .unwrap();
    let log = mock.requests();
    assert_eq!(log.len(), 1);
    let body = log[0].json_body().unwrap();
    assert_eq!(body["confirmation"], "RESET-CONFIRM");
    assert_eq!(body["options"]["students"], true);
    assert_eq!(body["options"]["finance"], true);
    assert_eq!(body["options"]["settings"], false);
}

#[tokio::test]
async fn roster_survives_failed_class_fetch() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "students.php",
        &[],
        json!({"success": true, "students": [
            {"id": 1, "first_name": "Ada", "class_id": 4, "status": "active"}
        ]}),
    );
    mock.on_status(Method::GET, "classes.php", &[], 500, "oops");

    let page = StudentsPage::new(mock.client());
    let state = page.refresh().await;
    let roster = state.data().unwrap();
    assert_eq!(roster.students.len(), 1);
    assert!(roster.classes.is_empty());
}

#[tokio::test]
async fn roster_fills_class_names() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "students.php",
        &[],
        json!({"data": {"students": [{"id": 1, "first_name": "Ada", "class_id": "4"}]}}),
    );
    mock.on(
        Method::GET,
        "classes.php",
        &[],
        json!({"classes": [{"id": 4, "class_name": "Grade 4"}]}),
    );
    let page = StudentsPage::new(mock.client());
    page.refresh().await;
    assert_eq!(page.roster().await.students[0].class_name, "Grade 4");
}

#[tokio::test]
async fn no_students_is_the_empty_state() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "students.php", &[], json!({"success": true, "students": []}));
    mock.on(Method::GET, "classes.php", &[], json!({"success": true, "classes": []}));
    let page = StudentsPage::new(mock.client());
    assert_eq!(page.refresh().await, PageState::Empty);
}

#[tokio::test]
async fn report_with_missing_sections_renders_no_data() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::RevenueReport.as_str())],
        json!({"success": true}),
    );
    let page = ReportsPage::new(mock.client());
    let state = page.load(ReportKind::RevenueReport, None).await;
    let report = state.data().unwrap();
    assert!(report.body.is_empty());
    let out = reports::render(report);
    assert!(out.contains(reports::NO_DATA));
}

#[tokio::test]
async fn report_request_carries_the_period() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "reports.php", &[], json!({"success": true}));
    let range = crate::utils::DateRange::parse("2024-01-01", "2024-03-31").unwrap();
    reports::fetch_report(&mock.client(), ReportKind::AttendanceReport, Some(&range))
        .await
        .unwrap();
    let req = &mock.requests()[0];
    assert_eq!(req.query_value("type"), Some("attendance_report"));
    assert_eq!(req.query_value("start_date"), Some("2024-01-01"));
    assert_eq!(req.query_value("end_date"), Some("2024-03-31"));
}

#[tokio::test]
async fn fetch_all_isolates_failures() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "reports.php", &[], json!({"success": true}));
    mock.on(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::EnrollmentReport.as_str())],
        json!({"success": false, "message": "Enrollment data unavailable"}),
    );
    let results = reports::fetch_all(&mock.client(), None).await;
    assert_eq!(results.len(), ReportKind::ALL.len());
    for (kind, result) in results {
        if kind == ReportKind::EnrollmentReport {
            assert_eq!(result.unwrap_err().to_string(), "Enrollment data unavailable");
        } else {
            assert_eq!(result.unwrap().kind, kind);
        }
    }
}

#[tokio::test]
async fn slower_stale_report_never_overwrites_newer_one() {
    let mock = MockTransport::new();
    mock.on_delayed(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::RevenueReport.as_str())],
        Duration::from_millis(150),
        json!({"success": true}),
    );
    mock.on(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::EnrollmentReport.as_str())],
        json!({"success": true}),
    );
    let page = ReportsPage::new(mock.client());

    let slow = page.load(ReportKind::RevenueReport, None);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.load(ReportKind::EnrollmentReport, None).await
    };
    tokio::join!(slow, fast);

    let shown = page.report.data().await.unwrap();
    assert_eq!(shown.kind, ReportKind::EnrollmentReport);
}

#[tokio::test]
async fn switching_report_aborts_the_slower_load() {
    let mock = MockTransport::new();
    mock.on_delayed(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::RevenueReport.as_str())],
        Duration::from_millis(300),
        json!({"success": true}),
    );
    mock.on(
        Method::GET,
        "reports.php",
        &[("type", ReportKind::EnrollmentReport.as_str())],
        json!({"success": true}),
    );
    let page = ReportsPage::new(mock.client());

    let started = std::time::Instant::now();
    let slow = page.load(ReportKind::RevenueReport, None);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        page.load(ReportKind::EnrollmentReport, None).await
    };
    let (slow_state, fast_state) = tokio::join!(slow, fast);

    // The revenue request was cut short instead of waiting out its delay.
    assert!(started.elapsed() < Duration::from_millis(300));
    assert_ne!(
        slow_state.data().map(|r| r.kind),
        Some(ReportKind::RevenueReport)
    );
    assert_eq!(
        fast_state.data().map(|r| r.kind),
        Some(ReportKind::EnrollmentReport)
    );
    assert_eq!(mock.count(Method::GET, "reports.php"), 2);
}

#[tokio::test]
async fn dashboard_decodes_string_numbers() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "dashboard.php",
        &[],
        json!({"success": true, "data": {
            "stats": {"total_students": "120", "active_students": 100},
            "financial": {"total_invoiced": "1000", "total_collected": "250.5"},
            "insights": [{"title": "Fees overdue", "priority": "high"}],
            "charts": null
        }}),
    );
    let page = DashboardPage::new(mock.client());
    let payload = page.refresh().await.data().cloned().unwrap();
    assert_eq!(payload.stats.total_students, 120);
    assert_eq!(payload.financial.total_collected, 250.5);
    assert!(payload.charts.enrollment_trend.is_empty());
    let out = crate::pages::dashboard::render(&payload);
    assert!(out.contains("Fees overdue"));
}

#[tokio::test]
async fn timeout_becomes_failed_state() {
    let mock = MockTransport::new();
    mock.on_timeout(Method::GET, "dashboard.php");
    let page = DashboardPage::new(mock.client());
    match page.refresh().await {
        PageState::Failed(message) => assert!(message.contains("timed out")),
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn settings_fold_key_value_rows() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "settings.php",
        &[],
        json!({"success": true, "data": [
            {"setting_key": "school_name", "setting_value": "Hillside Academy"},
            {"setting_key": "currency", "setting_value": "KES"}
        ]}),
    );
    let page = SettingsPage::new(mock.client());
    let settings = page.refresh().await.data().cloned().unwrap();
    assert_eq!(settings.school_name, "Hillside Academy");
    assert_eq!(settings.currency, "KES");
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "teachers.php", &[], json!({"teachers": []}));
    let client = ApiClient::with_transport(
        mock.clone(),
        Session::new(Some("s3cret".into()), Some("admin".into())),
    );
    TeachersPage::new(client).refresh().await;
    let req = &mock.requests()[0];
    assert!(req
        .headers
        .iter()
        .any(|(k, v)| k == "Authorization" && v == "Bearer s3cret"));
}

async fn scratch_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("schoolboard-test-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await.unwrap();
    path
}

#[tokio::test]
async fn upload_rejects_unsupported_and_empty_files() {
    let mock = MockTransport::new();
    let client = mock.client();

    let txt = scratch_file("notes.txt", b"hello").await;
    let err = teachers::upload_profile_picture(&client, StaffKind::Teacher, 3, &txt)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MutationError::Api(ApiError::InvalidUpload { .. })
    ));

    let empty = scratch_file("empty.png", b"").await;
    let err = teachers::upload_profile_picture(&client, StaffKind::Teacher, 3, &empty)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("file is empty"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn profile_picture_upload_is_multipart() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "upload_profile_picture.php",
        &[],
        json!({"success": true, "url": "uploads/profiles/7.png"}),
    );
    let png = scratch_file("face.png", &[0x89, b'P', b'N', b'G']).await;
    let url = teachers::upload_profile_picture(&mock.client(), StaffKind::Employee, 7, &png)
        .await
        .unwrap();
    assert_eq!(url, "uploads/profiles/7.png");

    let req = &mock.requests()[0];
    let RequestBody::Multipart(parts) = &req.body else {
        panic!("expected a multipart body");
    };
    let text = |field: &str| {
        parts.iter().find_map(|p| match p {
            FormPart::Text { name, value } if name == field => Some(value.clone()),
            _ => None,
        })
    };
    assert_eq!(text("user_type").as_deref(), Some("employee"));
    assert_eq!(text("user_id").as_deref(), Some("7"));
    assert!(parts.iter().any(|p| matches!(
        p,
        FormPart::File { name, mime, .. } if name == "profile_picture" && mime == "image/png"
    )));
}

#[tokio::test]
async fn restore_uploads_backup_with_confirmation() {
    let mock = MockTransport::new();
    mock.on(Method::POST, "system_reset.php", &[], json!({"success": true}));
    let backup = scratch_file("backup.sql", b"CREATE TABLE students();").await;

    let err = system_reset::restore(&mock.client(), "yes", &backup)
        .await
        .unwrap_err();
    assert!(matches!(err, ResetError::NotConfirmed));
    assert!(mock.requests().is_empty());

    system_reset::restore(&mock.client(), "RESET-CONFIRM", &backup)
        .await
        .unwrap();
    let req = &mock.requests()[0];
    let RequestBody::Multipart(parts) = &req.body else {
        panic!("expected a multipart body");
    };
    assert!(parts.iter().any(|p| matches!(
        p,
        FormPart::Text { name, value } if name == "action" && value == "restore"
    )));
    assert!(parts.iter().any(|p| matches!(
        p,
        FormPart::File { name, .. } if name == "backup_file"
    )));
}
