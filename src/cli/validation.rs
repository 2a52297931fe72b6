use crate::cli::args::{CliArgs, Command, ReportArgs, ResetArgs, StudentsCommand};

fn validate_report(args: &ReportArgs) -> Result<(), String> {
    let kind = args.kind.trim();
    if !kind.eq_ignore_ascii_case("all") && crate::models::ReportKind::parse(kind).is_none() {
        return Err(format!(
            "invalid report type '{kind}', expected one of {} or all",
            crate::models::ReportKind::ALL
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) {
        crate::utils::DateRange::parse(from, to).map_err(|e| format!("invalid period: {e}"))?;
    }
    Ok(())
}

fn validate_reset(args: &ResetArgs) -> Result<(), String> {
    if args.categories.is_none() && args.restore.is_none() {
        return Err("reset needs --categories or --restore".to_string());
    }
    if let Some(raw) = args.categories.as_deref() {
        crate::utils::parse_reset_csv(raw)
            .map_err(|e| format!("invalid --categories '{raw}': {e}"))?;
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected table, text, json or csv"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    match args.command.as_ref() {
        Some(Command::Report(report)) => validate_report(report)?,
        Some(Command::Reset(reset)) => validate_reset(reset)?,
        Some(Command::Students(
            StudentsCommand::List(q) | StudentsCommand::Stats(q) | StudentsCommand::Export(q),
        )) => {
            crate::filter::StudentSort::parse(&q.sort).map_err(|e| format!("invalid --sort: {e}"))?;
        }
        Some(Command::Upload(upload)) => {
            if !matches!(upload.kind.trim(), "teacher" | "employee") {
                return Err(format!(
                    "invalid upload kind '{}', expected teacher or employee",
                    upload.kind
                ));
            }
        }
        _ => {}
    }
    Ok(())
}
