use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant).
/// A leading UTF-8 BOM is skipped. Blank lines are not returned.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // trailing row without newline (unterminated quotes are flushed as-is)
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Header cleanup applied before column lookup:
/// trim, lower-case, inner whitespace -> `_`
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W, S>(mut w: W, row: &[S]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            w.write_all(b",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_crlf_and_skips_blank_lines() {
        let text = "occupation,skill\r\n\"Analyst, Data\",\"SQL \"\"core\"\"\"\r\n\r\nNurse,Triage";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Analyst, Data".to_string(), "SQL \"core\"".to_string()]);
        assert_eq!(rows[2], vec!["Nurse".to_string(), "Triage".to_string()]);
    }

    #[test]
    fn keeps_empty_trailing_cells() {
        let rows = parse_rows("a,b,\n");
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string(), String::new()]]);
    }

    #[test]
    fn strips_bom() {
        let rows = parse_rows("\u{feff}Occupation,Skill\n");
        assert_eq!(rows[0][0], "Occupation");
    }

    #[test]
    fn written_row_parses_back() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["plain", "with,comma", "with \"quote\""]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "plain,\"with,comma\",\"with \"\"quote\"\"\"\n");
        assert_eq!(parse_rows(&text)[0][2], "with \"quote\"");
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("  Occupation Title "), "occupation_title");
        assert_eq!(normalize_header("SKILL"), "skill");
    }
}
