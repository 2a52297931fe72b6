use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::utils::parse_id;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "schoolboard",
    version,
    about = "console for the school-management REST backend",
    long_about = "schoolboard drives the admin pages of the school-management backend from a terminal: dashboards, reports, staff, students, invoices, settings and system reset.\n\nExamples:\n  schoolboard --base-url https://school.tld/api dashboard\n  schoolboard report revenue --from 2024-01-01 --to 2024-03-31\n  schoolboard students export --class 4 --gender female -o grade4.csv\n  schoolboard leaves approve 17\n\nTip: Use --init-config to write ~/.schoolboard/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        visible_alias = "vb",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v info, -vv debug). RUST_LOG overrides."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        visible_alias = "nc",
        global = true,
        help_heading = "Output",
        help = "Disable colored status lines."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        global = true,
        help_heading = "Output",
        help = "Write the rendered result to FILE instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format: table, text, json or csv (inferred from --output extension)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        visible_alias = "cfg",
        value_name = "FILE",
        global = true,
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.schoolboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Config",
        help = "Write a default config file (if missing) and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'b',
        long = "base-url",
        visible_alias = "api",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "Backend API root, e.g. https://school.tld/api/."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 't',
        long = "token",
        value_name = "TOKEN",
        global = true,
        help_heading = "Connection",
        help = "Bearer token sent with every request."
    )]
    pub token: Option<String>,

    #[arg(
        long = "user",
        value_name = "NAME",
        global = true,
        help_heading = "Connection",
        help = "Operator name shown in status lines."
    )]
    pub user: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Connection",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "HTTP proxy URL."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'y',
        long = "yes",
        global = true,
        help_heading = "Behaviour",
        help = "Answer yes to delete confirmations."
    )]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stat cards, finance, charts, activity and insights.
    Dashboard,
    /// Run a report: class_performance, revenue, fee_collection, enrollment, attendance or all.
    Report(ReportArgs),
    /// Manage education levels.
    #[command(subcommand)]
    Levels(LevelsCommand),
    /// Manage roles.
    #[command(subcommand)]
    Roles(RolesCommand),
    /// List the permission catalogue.
    Permissions,
    /// Manage teachers.
    #[command(subcommand)]
    Teachers(TeachersCommand),
    /// Manage employees.
    #[command(subcommand)]
    Employees(EmployeesCommand),
    /// Leave requests and the HR summary.
    #[command(subcommand)]
    Leaves(LeavesCommand),
    /// Browse, summarise and export students.
    #[command(subcommand)]
    Students(StudentsCommand),
    /// Invoices with collection totals.
    Invoices(InvoicesArgs),
    /// School settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Upload a staff profile picture.
    Upload(UploadArgs),
    /// Reset data categories or restore a backup. Destructive.
    Reset(ResetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(value_name = "TYPE", help = "Report type, or 'all'.")]
    pub kind: String,

    #[arg(long = "from", value_name = "YYYY-MM-DD", requires = "to", help = "Start of the period.")]
    pub from: Option<String>,

    #[arg(long = "to", value_name = "YYYY-MM-DD", requires = "from", help = "End of the period.")]
    pub to: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LevelFields {
    #[arg(long, help = "Level name.")]
    pub name: Option<String>,
    #[arg(long, help = "Short code, e.g. PRI.")]
    pub code: Option<String>,
    #[arg(long, help = "Description.")]
    pub description: Option<String>,
    #[arg(long = "order", value_name = "N", help = "Display order.")]
    pub display_order: Option<i64>,
    #[arg(long, help = "Create or mark the level inactive.")]
    pub inactive: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LevelsCommand {
    List,
    Add(LevelFields),
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[command(flatten)]
        fields: LevelFields,
    },
    Toggle {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Move a level one place up.
    Up {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Move a level one place down.
    Down {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RoleFields {
    #[arg(long, help = "Role name.")]
    pub name: Option<String>,
    #[arg(long, help = "Description.")]
    pub description: Option<String>,
    #[arg(long, value_name = "CSV", help = "Permission slugs, comma-separated.")]
    pub permissions: Option<String>,
    #[arg(long, help = "Create or mark the role inactive.")]
    pub inactive: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RolesCommand {
    List,
    Add(RoleFields),
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[command(flatten)]
        fields: RoleFields,
    },
    Toggle {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Replace the permission set of a role.
    Assign {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long, value_name = "CSV")]
        permissions: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PersonFields {
    #[arg(long = "first-name")]
    pub first_name: Option<String>,
    #[arg(long = "last-name")]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TeacherFields {
    #[command(flatten)]
    pub person: PersonFields,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub qualification: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeachersCommand {
    List,
    Add(TeacherFields),
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[command(flatten)]
        fields: TeacherFields,
    },
    Toggle {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Teacher counts per subject.
    Subjects,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EmployeeFields {
    #[command(flatten)]
    pub person: PersonFields,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub salary: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EmployeesCommand {
    List,
    Add(EmployeeFields),
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Toggle {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum LeavesCommand {
    List {
        #[arg(long, value_name = "STATUS", help = "pending, approved or rejected.")]
        status: Option<String>,
    },
    Approve {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    Reject {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// HR summary card.
    Summary,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StudentQuery {
    #[arg(long = "class", value_name = "ID", help = "Only students in this class id.")]
    pub class_id: Option<i64>,
    #[arg(long, help = "Only students with this status.")]
    pub status: Option<String>,
    #[arg(long, help = "Only students with this gender.")]
    pub gender: Option<String>,
    #[arg(
        short = 's',
        long,
        default_value = "",
        help = "Search name, admission number, email, class or phone."
    )]
    pub search: String,
    #[arg(
        long,
        value_name = "KEY",
        default_value = "name",
        help = "Sort by name, admission or class."
    )]
    pub sort: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StudentsCommand {
    List(StudentQuery),
    /// Totals and gender/status breakdowns for the filtered rows.
    Stats(StudentQuery),
    /// CSV of the filtered rows.
    Export(StudentQuery),
    /// Classes with capacity and enrollment.
    Classes,
}

#[derive(Args, Debug, Clone)]
pub struct InvoicesArgs {
    #[arg(long, help = "Only invoices with this status.")]
    pub status: Option<String>,
    #[arg(long, help = "Print only the totals card.")]
    pub summary: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsFields {
    #[arg(long = "school-name")]
    pub school_name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long = "academic-year")]
    pub academic_year: Option<String>,
    #[arg(long)]
    pub term: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    Show,
    Set(SettingsFields),
    /// Upload a new school logo.
    Logo { file: PathBuf },
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    #[arg(value_name = "KIND", help = "teacher or employee.")]
    pub kind: String,
    #[arg(value_parser = parse_id)]
    pub id: i64,
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ResetArgs {
    #[arg(
        long,
        value_name = "CSV",
        help = "students, teachers, finance, attendance, reports, settings or all."
    )]
    pub categories: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "categories",
        help = "Restore a .sql or .zip backup instead of resetting."
    )]
    pub restore: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PHRASE",
        help = "Confirmation phrase; prompted for when omitted."
    )]
    pub confirm: Option<String>,
}
