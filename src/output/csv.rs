/// Quotes a field when it carries a delimiter, quote or line break, and
/// neutralises leading formula characters.
pub fn escape_field(value: &str) -> String {
    let guarded = match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    };
    if guarded.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded
    }
}

pub fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Header line plus one line per row. No rows gives the header alone.
pub fn rows_to_csv<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = String::new();
    write_row(&mut out, header);
    for row in rows {
        write_row(&mut out, row);
    }
    out
}

/// Splits CSV text back into records, honouring quoted fields.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_untouched() {
        assert_eq!(escape_field("Grade 4"), "Grade 4");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn delimiters_and_quotes_are_quoted() {
        assert_eq!(escape_field("Box 12, Nairobi"), "\"Box 12, Nairobi\"");
        assert_eq!(escape_field("the \"big\" one"), "\"the \"\"big\"\" one\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn formulas_are_neutralised() {
        assert_eq!(escape_field("=SUM(A1:A3)"), "'=SUM(A1:A3)");
        assert_eq!(escape_field("-5"), "'-5");
        assert_eq!(escape_field("@cmd"), "'@cmd");
        assert_eq!(escape_field("=1,2"), "\"'=1,2\"");
    }

    #[test]
    fn zero_rows_is_header_only() {
        let rows: Vec<Vec<String>> = Vec::new();
        let csv = rows_to_csv(&["Name", "Class"], &rows);
        assert_eq!(csv, "Name,Class\r\n");
        assert_eq!(parse(&csv).len(), 1);
    }

    #[test]
    fn awkward_fields_survive_a_reader_split() {
        let rows = vec![vec![
            "O'Neil, Pat".to_string(),
            "said \"hi\"".to_string(),
            "12 Main St\nApt 3".to_string(),
        ]];
        let csv = rows_to_csv(&["name", "note", "address"], &rows);
        let parsed = parse(&csv);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], rows[0]);
    }
}
