use std::future::Future;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::api::{self, envelope, ApiClient, Session};
use crate::cli::args::{
    CliArgs, Command, EmployeeFields, EmployeesCommand, LeavesCommand, LevelFields,
    LevelsCommand, PersonFields, ReportArgs, ResetArgs, RoleFields, RolesCommand,
    SettingsCommand, SettingsFields, StudentQuery, StudentsCommand, TeacherFields,
    TeachersCommand,
};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::{StudentFilter, StudentSort};
use crate::forms::{EducationLevelForm, EmployeeForm, RoleForm, SettingsForm, TeacherForm};
use crate::models::{DashboardPayload, ReportKind};
use crate::output::{self, OutputFormat, Record};
use crate::pages::education_levels::{EducationLevelsPage, ReorderOutcome};
use crate::pages::hr::{self, HrPage, LeaveDecision};
use crate::pages::roles::{self, RolesPage};
use crate::pages::settings::SettingsPage;
use crate::pages::students::{self, StudentsPage};
use crate::pages::system_reset::{self, ResetOptions, CONFIRMATION_PHRASE};
use crate::pages::teachers::{self, StaffKind, TeachersPage};
use crate::pages::{
    dashboard, invoices, reports, AssumeYes, Confirm, MutationError, PageState, Resource,
    ResourcePage,
};
use crate::utils::{self, DateRange};

fn info_line(message: &str) {
    eprintln!("{} {}", "[INF]".blue().bold(), message);
}

fn warn_line(message: &str) {
    eprintln!("{} {}", "[WRN]".yellow().bold(), message);
}

fn format_kv_line(label: &str, value: &str) {
    debug!("{:<10}: {}", label, value);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schoolboard={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn spinner(message: &str) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

/// Shows a spinner on an interactive terminal while `fut` runs.
async fn loading<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = spinner(message);
    let out = fut.await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    out
}

struct StdinConfirm;

fn read_stdin_line() -> Option<String> {
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} {prompt} [y/N] ", "[?]".yellow().bold());
        read_stdin_line()
            .map(|l| matches!(l.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

/// Ready data, nothing (empty state) or the failure message.
fn settled<T>(state: PageState<T>) -> Result<Option<T>, String> {
    match state {
        PageState::Ready(data) => Ok(Some(data)),
        PageState::Failed(message) => Err(message),
        PageState::Idle | PageState::Loading | PageState::Empty => Ok(None),
    }
}

fn report_backend_message(resp: &Value, fallback: &str) {
    let message = envelope::backend_message(resp).unwrap_or_else(|| fallback.to_string());
    info_line(&message);
}

#[derive(Debug)]
struct RunConfig {
    api: api::Options,
    output: Option<PathBuf>,
    format: OutputFormat,
    no_color: bool,
    assume_yes: bool,
    command: Command,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let command = args
        .command
        .ok_or_else(|| "no command given, see --help".to_string())?;

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| api::Options::default().base_url);
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(15);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let session = Session::new(args.token.or(cfg.token), args.user.or(cfg.user_name));

    let output = args.output.map(|p| config::expand_tilde(&p));
    let cfg_format = match cfg.output_format.as_deref() {
        Some(raw) => Some(OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid output_format '{raw}' in config, expected table, text, json or csv")
        })?),
        None => None,
    };
    let format = args
        .format
        .as_deref()
        .and_then(OutputFormat::parse)
        .or_else(|| {
            output
                .as_ref()
                .and_then(|p| output::infer_format_from_path(&p.to_string_lossy()))
        })
        .or(cfg_format)
        .unwrap_or_default();

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let assume_yes = args.yes || cfg.assume_yes.unwrap_or(false);

    Ok(RunConfig {
        api: api::Options {
            base_url,
            timeout_seconds,
            proxy,
            session,
        },
        output,
        format,
        no_color,
        assume_yes,
        command,
    })
}

impl RunConfig {
    fn confirmer(&self) -> Box<dyn Confirm> {
        if self.assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(StdinConfirm)
        }
    }

    async fn emit(&self, bytes: &[u8]) -> Result<(), String> {
        output::write_output(self.output.as_deref(), bytes).await?;
        if let Some(path) = self.output.as_ref() {
            info_line(&format!("wrote {}", path.display()));
        }
        Ok(())
    }

    async fn emit_rows<R: Record>(&self, rows: &[&R], empty_message: &str) -> Result<(), String> {
        self.emit(&output::render_rows(self.format, rows, empty_message))
            .await
    }

    /// A titled card, or the underlying value for json output.
    async fn emit_card<T: Serialize>(
        &self,
        title: &str,
        fields: &[(&str, String)],
        data: &T,
    ) -> Result<(), String> {
        match self.format {
            OutputFormat::Json => self.emit(&output::render_json(data)).await,
            _ => self.emit(output::render_card(title, fields).as_bytes()).await,
        }
    }
}

fn set_if(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.trim().to_string();
    }
}

fn level_form(mut form: EducationLevelForm, fields: &LevelFields) -> EducationLevelForm {
    set_if(&mut form.name, &fields.name);
    set_if(&mut form.code, &fields.code);
    set_if(&mut form.description, &fields.description);
    if fields.display_order.is_some() {
        form.display_order = fields.display_order;
    }
    if fields.inactive {
        form.is_active = false;
    }
    form
}

fn role_form(mut form: RoleForm, fields: &RoleFields) -> Result<RoleForm, String> {
    set_if(&mut form.name, &fields.name);
    set_if(&mut form.description, &fields.description);
    if let Some(raw) = fields.permissions.as_deref() {
        form.permissions = utils::parse_permissions_csv(raw)
            .map_err(|e| format!("invalid --permissions '{raw}': {e}"))?;
    }
    if fields.inactive {
        form.is_active = false;
    }
    Ok(form)
}

fn apply_person(
    person: &PersonFields,
    first_name: &mut String,
    last_name: &mut String,
    email: &mut String,
    phone: &mut String,
    status: &mut String,
) {
    set_if(first_name, &person.first_name);
    set_if(last_name, &person.last_name);
    set_if(email, &person.email);
    set_if(phone, &person.phone);
    set_if(status, &person.status);
}

fn teacher_form(mut form: TeacherForm, fields: &TeacherFields) -> TeacherForm {
    apply_person(
        &fields.person,
        &mut form.first_name,
        &mut form.last_name,
        &mut form.email,
        &mut form.phone,
        &mut form.status,
    );
    set_if(&mut form.subject, &fields.subject);
    set_if(&mut form.qualification, &fields.qualification);
    form
}

fn employee_form(mut form: EmployeeForm, fields: &EmployeeFields) -> EmployeeForm {
    apply_person(
        &fields.person,
        &mut form.first_name,
        &mut form.last_name,
        &mut form.email,
        &mut form.phone,
        &mut form.status,
    );
    set_if(&mut form.department, &fields.department);
    set_if(&mut form.position, &fields.position);
    if let Some(salary) = fields.salary {
        form.salary = salary;
    }
    form
}

fn settings_form(mut form: SettingsForm, fields: &SettingsFields) -> SettingsForm {
    set_if(&mut form.school_name, &fields.school_name);
    set_if(&mut form.school_address, &fields.address);
    set_if(&mut form.school_phone, &fields.phone);
    set_if(&mut form.school_email, &fields.email);
    set_if(&mut form.currency, &fields.currency);
    set_if(&mut form.academic_year, &fields.academic_year);
    set_if(&mut form.current_term, &fields.term);
    form
}

fn student_filter(q: &StudentQuery) -> Result<(StudentFilter, StudentSort), String> {
    let filter = StudentFilter {
        class_id: q.class_id,
        status: q.status.clone(),
        gender: q.gender.clone(),
        search: q.search.clone(),
    };
    Ok((filter, StudentSort::parse(&q.sort)?))
}

async fn load_resource<R: Resource>(page: &ResourcePage<R>) -> Result<(), String> {
    let state = loading(&format!("Loading {}s", R::NOUN), page.refresh()).await;
    settled(state).map(|_| ())
}

async fn list_resource<R: Resource + Record>(
    run: &RunConfig,
    page: &ResourcePage<R>,
) -> Result<(), String> {
    let rows = page.rows().await;
    let refs: Vec<&R> = rows.iter().collect();
    run.emit_rows(&refs, &format!("No {}s found.", R::NOUN)).await
}

async fn toggle_resource<R: Resource>(page: &ResourcePage<R>, id: i64) -> Result<(), String> {
    let record = page.find(id).await.map_err(|e| e.to_string())?;
    let resp = page
        .toggle_status(&record)
        .await
        .map_err(|e| e.to_string())?;
    report_backend_message(&resp, &format!("{} #{id} status toggled", R::NOUN));
    Ok(())
}

async fn delete_resource<R: Resource>(
    run: &RunConfig,
    page: &ResourcePage<R>,
    id: i64,
) -> Result<(), String> {
    page.find(id).await.map_err(|e| e.to_string())?;
    let confirm = run.confirmer();
    let deleted = page
        .delete(id, confirm.as_ref())
        .await
        .map_err(|e| e.to_string())?;
    if deleted {
        info_line(&format!("{} #{id} deleted", R::NOUN));
    } else {
        warn_line("cancelled, nothing was deleted");
    }
    Ok(())
}

fn saved(resp: Result<Value, MutationError>, noun: &str) -> Result<(), String> {
    let resp = resp.map_err(|e| e.to_string())?;
    report_backend_message(&resp, &format!("{noun} saved"));
    Ok(())
}

async fn run_dashboard(run: &RunConfig, client: ApiClient) -> Result<(), String> {
    let page = dashboard::DashboardPage::new(client);
    let state = loading("Loading dashboard", page.refresh()).await;
    let payload = settled(state)?.unwrap_or_else(DashboardPayload::default);
    match run.format {
        OutputFormat::Json => run.emit(&output::render_json(&payload)).await,
        _ => run.emit(dashboard::render(&payload).as_bytes()).await,
    }
}

async fn run_report(run: &RunConfig, client: ApiClient, args: &ReportArgs) -> Result<(), String> {
    let range = match (args.from.as_deref(), args.to.as_deref()) {
        (Some(from), Some(to)) => Some(DateRange::parse(from, to)?),
        _ => None,
    };
    if let Some(range) = range.as_ref() {
        format_kv_line(
            "Period",
            &format!("{} .. {} ({} days)", range.start, range.end, range.days()),
        );
    }

    if args.kind.trim().eq_ignore_ascii_case("all") {
        let results = loading("Loading reports", reports::fetch_all(&client, range.as_ref())).await;
        let mut ok = Vec::new();
        for (kind, result) in results {
            match result {
                Ok(report) => ok.push(report),
                Err(e) => warn_line(&format!("{kind}: {e}")),
            }
        }
        let bytes = match run.format {
            OutputFormat::Json => output::render_json(&ok),
            _ => ok
                .iter()
                .map(reports::render)
                .collect::<Vec<_>>()
                .join("\n")
                .into_bytes(),
        };
        return run.emit(&bytes).await;
    }

    let kind = ReportKind::parse(&args.kind)
        .ok_or_else(|| format!("invalid report type '{}'", args.kind))?;
    let page = reports::ReportsPage::new(client);
    let state = loading(&format!("Loading {}", kind.title()), page.load(kind, range)).await;
    let report = settled(state)?
        .ok_or_else(|| format!("{} returned nothing", kind.as_str()))?;
    match run.format {
        OutputFormat::Json => run.emit(&output::render_json(&report)).await,
        OutputFormat::Csv => {
            warn_line("csv is not available for reports, printing text");
            run.emit(reports::render(&report).as_bytes()).await
        }
        _ => run.emit(reports::render(&report).as_bytes()).await,
    }
}

async fn run_levels(run: &RunConfig, client: ApiClient, cmd: &LevelsCommand) -> Result<(), String> {
    let page = EducationLevelsPage::education_levels(client);
    load_resource(&page).await?;
    match cmd {
        LevelsCommand::List => list_resource(run, &page).await,
        LevelsCommand::Add(fields) => {
            let base = EducationLevelForm {
                is_active: true,
                ..Default::default()
            };
            saved(page.create(&level_form(base, fields)).await, "education level")
        }
        LevelsCommand::Edit { id, fields } => {
            let current = page.find(*id).await.map_err(|e| e.to_string())?;
            let form = level_form(EducationLevelForm::from(&current), fields);
            saved(page.update(*id, &form).await, "education level")
        }
        LevelsCommand::Toggle { id } => toggle_resource(&page, *id).await,
        LevelsCommand::Delete { id } => delete_resource(run, &page, *id).await,
        LevelsCommand::Up { id } | LevelsCommand::Down { id } => {
            let index = page
                .position_of(*id)
                .await
                .ok_or_else(|| format!("no education level with id {id}"))?;
            let outcome = match cmd {
                LevelsCommand::Up { .. } => page.move_up(index).await,
                _ => page.move_down(index).await,
            }
            .map_err(|e| e.to_string())?;
            match outcome {
                ReorderOutcome::Unchanged => warn_line("already at the edge, order unchanged"),
                ReorderOutcome::Swapped { moved, with } => {
                    info_line(&format!("swapped education levels #{moved} and #{with}"))
                }
            }
            list_resource(run, &page).await
        }
    }
}

async fn run_roles(run: &RunConfig, client: ApiClient, cmd: &RolesCommand) -> Result<(), String> {
    let page = RolesPage::new(client);
    let (roles_state, permissions_state) = loading("Loading roles", page.refresh()).await;
    settled(roles_state)?;
    let catalogue = match settled(permissions_state) {
        Ok(list) => list.unwrap_or_default(),
        Err(e) => {
            warn_line(&format!("permission catalogue unavailable: {e}"));
            Vec::new()
        }
    };
    let check_known = |permissions: &[String]| -> Result<(), String> {
        let unknown = roles::unknown_permissions(&catalogue, permissions);
        if !catalogue.is_empty() && !unknown.is_empty() {
            return Err(format!("unknown permissions: {}", unknown.join(", ")));
        }
        Ok(())
    };

    match cmd {
        RolesCommand::List => list_resource(run, &page.roles).await,
        RolesCommand::Add(fields) => {
            let base = RoleForm {
                is_active: true,
                ..Default::default()
            };
            let form = role_form(base, fields)?;
            check_known(&form.permissions)?;
            saved(page.roles.create(&form).await, "role")
        }
        RolesCommand::Edit { id, fields } => {
            let current = page.roles.find(*id).await.map_err(|e| e.to_string())?;
            let form = role_form(RoleForm::from(&current), fields)?;
            check_known(&form.permissions)?;
            saved(page.roles.update(*id, &form).await, "role")
        }
        RolesCommand::Toggle { id } => toggle_resource(&page.roles, *id).await,
        RolesCommand::Delete { id } => delete_resource(run, &page.roles, *id).await,
        RolesCommand::Assign { id, permissions } => {
            page.roles.find(*id).await.map_err(|e| e.to_string())?;
            let permissions = utils::parse_permissions_csv(permissions)
                .map_err(|e| format!("invalid --permissions: {e}"))?;
            check_known(&permissions)?;
            let resp = page
                .assign_permissions(*id, &permissions)
                .await
                .map_err(|e| e.to_string())?;
            report_backend_message(
                &resp,
                &format!("{} permissions assigned to role #{id}", permissions.len()),
            );
            Ok(())
        }
    }
}

async fn run_permissions(run: &RunConfig, client: ApiClient) -> Result<(), String> {
    let page = RolesPage::new(client);
    let state = loading("Loading permissions", page.refresh_permissions()).await;
    let catalogue = settled(state)?.unwrap_or_default();
    let rows: Vec<_> = roles::group_by_module(&catalogue)
        .into_values()
        .flatten()
        .collect();
    run.emit_rows(&rows, "No permissions defined.").await
}

async fn run_teachers(
    run: &RunConfig,
    client: ApiClient,
    cmd: &TeachersCommand,
) -> Result<(), String> {
    let page = TeachersPage::new(client);
    load_resource(&page).await?;
    match cmd {
        TeachersCommand::List => list_resource(run, &page).await,
        TeachersCommand::Add(fields) => {
            let base = TeacherForm {
                status: "active".to_string(),
                ..Default::default()
            };
            saved(page.create(&teacher_form(base, fields)).await, "teacher")
        }
        TeachersCommand::Edit { id, fields } => {
            let current = page.find(*id).await.map_err(|e| e.to_string())?;
            let form = teacher_form(TeacherForm::from(&current), fields);
            saved(page.update(*id, &form).await, "teacher")
        }
        TeachersCommand::Toggle { id } => toggle_resource(&page, *id).await,
        TeachersCommand::Delete { id } => delete_resource(run, &page, *id).await,
        TeachersCommand::Subjects => {
            let rows = teachers::subject_breakdown(&page.rows().await);
            let refs: Vec<_> = rows.iter().collect();
            run.emit_rows(&refs, "No teachers found.").await
        }
    }
}

async fn run_employees(
    run: &RunConfig,
    client: ApiClient,
    cmd: &EmployeesCommand,
) -> Result<(), String> {
    let page = HrPage::new(client);
    load_resource(&page.employees).await?;
    let employees = &page.employees;
    match cmd {
        EmployeesCommand::List => list_resource(run, employees).await,
        EmployeesCommand::Add(fields) => {
            let base = EmployeeForm {
                status: "active".to_string(),
                ..Default::default()
            };
            saved(employees.create(&employee_form(base, fields)).await, "employee")
        }
        EmployeesCommand::Edit { id, fields } => {
            let current = employees.find(*id).await.map_err(|e| e.to_string())?;
            let form = employee_form(EmployeeForm::from(&current), fields);
            saved(employees.update(*id, &form).await, "employee")
        }
        EmployeesCommand::Toggle { id } => toggle_resource(employees, *id).await,
        EmployeesCommand::Delete { id } => delete_resource(run, employees, *id).await,
    }
}

async fn emit_hr_summary(run: &RunConfig, page: &HrPage) -> Result<(), String> {
    let summary = page.summary.data().await.unwrap_or_default();
    run.emit_card("HR summary", &hr::summary_card(&summary), &summary)
        .await
}

async fn run_leaves(run: &RunConfig, client: ApiClient, cmd: &LeavesCommand) -> Result<(), String> {
    let page = HrPage::new(client);
    match cmd {
        LeavesCommand::List { status } => {
            let state = loading("Loading leave requests", page.refresh_leaves()).await;
            let leaves = settled(state)?.unwrap_or_default();
            let rows = hr::filter_leaves(&leaves, status.as_deref());
            run.emit_rows(&rows, "No leave requests.").await
        }
        LeavesCommand::Approve { id } | LeavesCommand::Reject { id } => {
            let decision = match cmd {
                LeavesCommand::Approve { .. } => LeaveDecision::Approve,
                _ => LeaveDecision::Reject,
            };
            let resp = loading("Submitting decision", page.decide_leave(*id, decision))
                .await
                .map_err(|e| e.to_string())?;
            report_backend_message(&resp, &format!("leave request #{id} {}", decision.status()));
            if let PageState::Failed(e) = page.summary.state().await {
                warn_line(&format!("summary refresh failed: {e}"));
            }
            emit_hr_summary(run, &page).await
        }
        LeavesCommand::Summary => {
            let state = loading("Loading HR summary", page.refresh_summary()).await;
            settled(state)?;
            emit_hr_summary(run, &page).await
        }
    }
}

async fn run_students(
    run: &RunConfig,
    client: ApiClient,
    cmd: &StudentsCommand,
) -> Result<(), String> {
    let page = StudentsPage::new(client);
    let state = loading("Loading students", page.refresh()).await;
    settled(state)?;
    let roster = page.roster().await;
    match cmd {
        StudentsCommand::List(q) => {
            let (filter, sort) = student_filter(q)?;
            let rows = roster.view(&filter, sort);
            run.emit_rows(&rows, students::EMPTY_MESSAGE).await
        }
        StudentsCommand::Stats(q) => {
            let (filter, sort) = student_filter(q)?;
            let rows = roster.view(&filter, sort);
            let stats = students::student_stats(&rows);
            if run.format == OutputFormat::Json {
                return run.emit(&output::render_json(&stats)).await;
            }
            let mut out = output::render_card("Students", &students::stats_card(&stats));
            let sections = [("By gender", &stats.by_gender), ("By status", &stats.by_status)];
            for (title, list) in sections {
                let refs: Vec<_> = list.iter().collect();
                out.push('\n');
                out.push_str(title);
                out.push('\n');
                out.push_str(&String::from_utf8_lossy(&output::render_table(
                    &refs,
                    students::EMPTY_MESSAGE,
                )));
            }
            run.emit(out.as_bytes()).await
        }
        StudentsCommand::Export(q) => {
            let (filter, sort) = student_filter(q)?;
            let rows = roster.view(&filter, sort);
            info_line(&format!(
                "exporting {} of {} students",
                rows.len(),
                roster.students.len()
            ));
            run.emit(students::export_csv(&rows).as_bytes()).await
        }
        StudentsCommand::Classes => {
            let refs: Vec<_> = roster.classes.iter().collect();
            run.emit_rows(&refs, "No classes found.").await
        }
    }
}

async fn run_invoices(
    run: &RunConfig,
    client: ApiClient,
    status: Option<&str>,
    summary_only: bool,
) -> Result<(), String> {
    let page = invoices::InvoicesPage::new(client);
    let state = loading("Loading invoices", page.refresh(status)).await;
    let rows = settled(state)?.unwrap_or_default();
    let summary = invoices::summarize(&rows);
    if summary_only {
        return run
            .emit_card("Invoices", &invoices::summary_card(&summary), &summary)
            .await;
    }
    let refs: Vec<_> = rows.iter().collect();
    if matches!(run.format, OutputFormat::Table | OutputFormat::Text) {
        let mut out = output::render_card("Invoices", &invoices::summary_card(&summary));
        out.push('\n');
        out.push_str(&String::from_utf8_lossy(&output::render_rows(
            run.format,
            &refs,
            "No invoices found.",
        )));
        return run.emit(out.as_bytes()).await;
    }
    run.emit_rows(&refs, "No invoices found.").await
}

async fn run_settings(
    run: &RunConfig,
    client: ApiClient,
    cmd: &SettingsCommand,
) -> Result<(), String> {
    let page = SettingsPage::new(client);
    let state = loading("Loading settings", page.refresh()).await;
    let current = settled(state)?.unwrap_or_default();
    match cmd {
        SettingsCommand::Show => {
            let fields: Vec<(&str, String)> = current
                .fields()
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect();
            run.emit_card("School settings", &fields, &current).await
        }
        SettingsCommand::Set(fields) => {
            let form = settings_form(SettingsForm::from(&current), fields);
            saved(page.save(&form).await, "settings")
        }
        SettingsCommand::Logo { file } => {
            let path = config::expand_tilde(&file.to_string_lossy());
            let url = page.upload_logo(&path).await.map_err(|e| e.to_string())?;
            info_line(&format!("logo uploaded: {url}"));
            Ok(())
        }
    }
}

async fn run_reset(client: ApiClient, args: &ResetArgs) -> Result<(), String> {
    let options = match args.categories.as_deref() {
        Some(raw) => ResetOptions::from_categories(&utils::parse_reset_csv(raw)?),
        None => ResetOptions::default(),
    };
    match args.restore.as_ref() {
        Some(file) => warn_line(&format!(
            "this will restore {} over the current database",
            file.display()
        )),
        None => warn_line(&format!(
            "this will permanently delete: {}",
            options.selected().join(", ")
        )),
    }

    let confirmation = match args.confirm.clone() {
        Some(phrase) => phrase,
        None => {
            eprint!("{} Type {CONFIRMATION_PHRASE} to continue: ", "[?]".red().bold());
            read_stdin_line().unwrap_or_default()
        }
    };
    if !system_reset::confirm_enabled(&confirmation) {
        return Err(format!(
            "confirmation does not match {CONFIRMATION_PHRASE}, nothing was sent"
        ));
    }

    match args.restore.as_ref() {
        Some(file) => {
            let path = config::expand_tilde(&file.to_string_lossy());
            system_reset::restore(&client, &confirmation, &path)
                .await
                .map_err(|e| e.to_string())?;
            info_line("backup restored");
        }
        None => {
            let resp = loading(
                "Resetting",
                system_reset::reset(&client, &confirmation, &options),
            )
            .await
            .map_err(|e| e.to_string())?;
            report_backend_message(&resp, "system reset completed");
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    format_kv_line("Backend", &run.api.base_url);
    format_kv_line("Format", &format!("{:?}", run.format));
    if let Some(user) = run.api.session.user_name.as_deref() {
        format_kv_line("Operator", user);
    }

    let client = ApiClient::new(run.api.clone()).map_err(|e| e.to_string())?;

    match &run.command {
        Command::Dashboard => run_dashboard(&run, client).await,
        Command::Report(args) => run_report(&run, client, args).await,
        Command::Levels(cmd) => run_levels(&run, client, cmd).await,
        Command::Roles(cmd) => run_roles(&run, client, cmd).await,
        Command::Permissions => run_permissions(&run, client).await,
        Command::Teachers(cmd) => run_teachers(&run, client, cmd).await,
        Command::Employees(cmd) => run_employees(&run, client, cmd).await,
        Command::Leaves(cmd) => run_leaves(&run, client, cmd).await,
        Command::Students(cmd) => run_students(&run, client, cmd).await,
        Command::Invoices(args) => {
            run_invoices(&run, client, args.status.as_deref(), args.summary).await
        }
        Command::Settings(cmd) => run_settings(&run, client, cmd).await,
        Command::Upload(args) => {
            let kind = match args.kind.trim() {
                "teacher" => StaffKind::Teacher,
                _ => StaffKind::Employee,
            };
            let path = config::expand_tilde(&args.file.to_string_lossy());
            let url = teachers::upload_profile_picture(&client, kind, args.id, &path)
                .await
                .map_err(|e| e.to_string())?;
            info_line(&format!("profile picture uploaded: {url}"));
            Ok(())
        }
        Command::Reset(args) => run_reset(client, args).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.as_deref().map(config::expand_tilde);
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "cannot determine home directory for config".to_string())?;
        config::ensure_default_config_file(&path)?;
        info_line(&format!("config ready at {}", path.display()));
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
