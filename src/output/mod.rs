pub mod csv;

use std::path::Path;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".csv") {
        return Some(OutputFormat::Csv);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// A row type that can be printed as a table line or exported as CSV.
pub trait Record: Serialize {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

pub fn render_table<R: Record>(rows: &[&R], empty_message: &str) -> Vec<u8> {
    if rows.is_empty() {
        return format!("{empty_message}\n").into_bytes();
    }
    let mut builder = Builder::default();
    builder.push_record(R::COLUMNS.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(row.cells());
    }
    let mut table = builder.build();
    table.with(Style::modern());
    format!("{table}\n").into_bytes()
}

pub fn render_text<R: Record>(rows: &[&R], empty_message: &str) -> Vec<u8> {
    if rows.is_empty() {
        return format!("{empty_message}\n").into_bytes();
    }
    let mut out = String::new();
    for row in rows {
        let line = R::COLUMNS
            .iter()
            .zip(row.cells())
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).unwrap_or_else(|_| b"[]".to_vec());
    out.push(b'\n');
    out
}

pub fn render_csv<R: Record>(rows: &[&R]) -> Vec<u8> {
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();
    csv::rows_to_csv(R::COLUMNS, &cells).into_bytes()
}

pub fn render_rows<R: Record>(format: OutputFormat, rows: &[&R], empty_message: &str) -> Vec<u8> {
    match format {
        OutputFormat::Table => render_table(rows, empty_message),
        OutputFormat::Text => render_text(rows, empty_message),
        OutputFormat::Json => render_json(rows),
        OutputFormat::Csv => render_csv(rows),
    }
}

/// Key/value card, used for single records and summaries.
pub fn render_card(title: &str, fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = format!("{title}\n{}\n", "-".repeat(title.chars().count()));
    for (k, v) in fields {
        out.push_str(&format!("{k:<width$} : {v}\n"));
    }
    out
}

/// Writes to `path` (truncating) or to stdout when no path is given.
pub async fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file {}: {e}", path.display()))?;
            outfile
                .write_all(bytes)
                .await
                .map_err(|e| format!("failed to write output file {}: {e}", path.display()))?;
            outfile
                .flush()
                .await
                .map_err(|e| format!("failed to write output file {}: {e}", path.display()))
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(bytes)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        score: u32,
    }

    impl Record for Row {
        const COLUMNS: &'static [&'static str] = &["Name", "Score"];

        fn cells(&self) -> Vec<String> {
            vec![self.name.clone(), self.score.to_string()]
        }
    }

    #[test]
    fn format_from_flag_or_extension() {
        assert_eq!(OutputFormat::parse("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/students.csv"), Some(OutputFormat::Csv));
        assert_eq!(infer_format_from_path("report.JSON"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("report"), None);
    }

    #[test]
    fn empty_rows_show_message_except_csv() {
        let rows: Vec<&Row> = Vec::new();
        let table = String::from_utf8(render_table(&rows, "No students found.")).unwrap();
        assert_eq!(table, "No students found.\n");
        let csv = String::from_utf8(render_csv(&rows)).unwrap();
        assert_eq!(csv, "Name,Score\r\n");
        let json = String::from_utf8(render_json(&rows)).unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn table_contains_headers_and_cells() {
        let row = Row {
            name: "Ada".into(),
            score: 91,
        };
        let out = String::from_utf8(render_table(&[&row], "none")).unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("Ada"));
        assert!(out.contains("91"));
        let text = String::from_utf8(render_text(&[&row], "none")).unwrap();
        assert_eq!(text, "Name=Ada  Score=91\n");
    }

    #[test]
    fn card_aligns_labels() {
        let card = render_card("Totals", &[("a", "1".into()), ("long", "2".into())]);
        assert!(card.contains("a    : 1"));
        assert!(card.contains("long : 2"));
    }
}
