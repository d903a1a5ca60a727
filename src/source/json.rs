//! JSON parsing for upstream standings bodies, with readable failure context.

use anyhow::Result;

/// Parse `body`, and on failure report the serde path, the type mismatch and a
/// snippet of the offending line.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(jd) {
        Ok(value) => Ok(value),
        Err(err) => {
            let inner_err = err.inner();
            let (line, column) = (inner_err.line(), inner_err.column());
            let path = err.path().to_string();

            let msg = inner_err.to_string();
            let loc = format!(" at line {line} column {column}");
            let msg_without_loc = msg.strip_suffix(&loc).unwrap_or(&msg);

            let mut final_err = String::new();
            if !path.is_empty() && path != "." {
                final_err.push_str(&format!("at path '{path}': "));
            }
            final_err.push_str(&format!(
                "{} (line {line} col {column})\n{}",
                describe_mismatch(msg_without_loc),
                error_snippet(body, line, column, 20)
            ));

            Err(anyhow::anyhow!(final_err))
        }
    }
}

/// Rewrite "invalid type: X, expected Y" as "expected Y, got X".
fn describe_mismatch(error_msg: &str) -> String {
    if let Some(rest) = error_msg.strip_prefix("invalid type: ")
        && let Some((actual, expected)) = rest.split_once(", expected ")
    {
        return format!("expected {}, got {actual}", expected.trim());
    }
    error_msg.to_owned()
}

fn error_snippet(body: &str, line: usize, column: usize, context_len: usize) -> String {
    let target_line = body.lines().nth(line.saturating_sub(1)).unwrap_or("");
    if target_line.is_empty() {
        return "(empty line)".to_owned();
    }

    // column is 1-based
    let error_idx = column.saturating_sub(1).min(target_line.len());
    let half_len = context_len / 2;
    let mut start = error_idx.saturating_sub(half_len);
    let mut end = (error_idx + half_len).min(target_line.len());
    while !target_line.is_char_boundary(start) {
        start -= 1;
    }
    while !target_line.is_char_boundary(end) {
        end += 1;
    }

    let indicator = " ".repeat(error_idx - start) + "^";
    format!("...{}...\n   {indicator}", &target_line[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn mismatch_rewritten() {
        assert_eq!(
            describe_mismatch("invalid type: null, expected u32"),
            "expected u32, got null"
        );
        assert_eq!(describe_mismatch("expected value"), "expected value");
    }

    #[test]
    fn reports_path_of_bad_field() {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[allow(dead_code)]
            points: u32,
        }

        #[derive(Debug, Deserialize)]
        struct Table {
            #[allow(dead_code)]
            rows: Vec<Row>,
        }

        let json = r#"{
            "rows": [
                {"points": 88},
                {"points": null}
            ]
        }"#;

        let err = parse_json_with_context::<Table>(json).unwrap_err().to_string();
        assert!(err.contains("rows[1].points"), "{err}");
        assert!(err.contains("expected u32, got null"), "{err}");
    }

    #[test]
    fn snippet_handles_multibyte_text() {
        let snippet = error_snippet(r#"{"name": "Atlético", "points": x}"#, 1, 33, 20);
        assert!(snippet.contains('^'));
    }

    #[test]
    fn valid_body_parses() {
        let value: serde_json::Value = parse_json_with_context(r#"{"ok": true}"#).unwrap();
        assert_eq!(value["ok"], true);
    }
}
