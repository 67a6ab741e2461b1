//! Case file parser and runner.
//!
//! Parses the `tests/cases/*.test` format:
//!
//! ```text
//! # test: tagged_id_in_bson_mode
//! # schema: objectid
//! # options: bson
//! # path: refs 0
//! ---
//! {"$oid": "507f1f77bcf86cd799439011"}
//! ---
//! ok {"$oid": "507f1f77bcf86cd799439011"}
//! ===
//! ```
//!
//! The expectation is either `ok <json>` or one `<code> @ <path>` line per
//! issue, in the order the issues were recorded. Running a case is left to
//! the caller so this crate stays independent of the validators.

use bsonv_types::{format_path, Issue, PathSegment, Value};

use crate::{CaseReport, Run, Verdict};

/// A single case.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// From the `# test: name` line.
    pub name: String,
    /// Line number where the case starts (1-indexed).
    pub line_number: usize,
    /// Which validator to run, from `# schema:`.
    pub schema: String,
    /// `# options: bson` sets this.
    pub parse_to_bson: bool,
    /// Path prefix from `# path:`, whitespace-separated; numbers are indexes.
    pub path: Vec<PathSegment>,
    /// Input as JSON text.
    pub input: String,
    pub expected: CaseExpectation,
}

/// What a case expects back.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseExpectation {
    /// Success, with the output rendered as extended JSON.
    Ok(String),
    /// Failure, one `<code> @ <path>` line per issue.
    Issues(Vec<String>),
}

/// What running a case produced: the output as extended JSON, or the issues.
pub type CaseOutcome = Result<serde_json::Value, Vec<Issue>>;

/// Render an issue the way expectation lines spell it.
pub fn issue_line(issue: &Issue) -> String {
    format!("{} @ {}", issue.code.name(), format_path(&issue.path))
}

/// Parse the *.test format into cases.
pub fn parse_case_tests(content: &str) -> Vec<TestCase> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let Some(name) = line.strip_prefix("# test:") else {
            i += 1;
            continue;
        };

        let name = name.trim().to_string();
        let start_line = i + 1;
        let mut schema = String::new();
        let mut parse_to_bson = false;
        let mut path = Vec::new();
        i += 1;

        // Headers until the first ---
        while i < lines.len() && lines[i].trim() != "---" {
            let header = lines[i].trim();
            if let Some(value) = header.strip_prefix("# schema:") {
                schema = value.trim().to_string();
            } else if let Some(value) = header.strip_prefix("# options:") {
                parse_to_bson = value.split_whitespace().any(|opt| opt == "bson");
            } else if let Some(value) = header.strip_prefix("# path:") {
                path = value.split_whitespace().map(parse_segment).collect();
            }
            i += 1;
        }
        i += 1; // skip the ---

        let mut input_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input_lines.push(lines[i]);
            i += 1;
        }
        i += 1; // skip the ---

        let mut expected_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            let expected = lines[i].trim();
            if !expected.is_empty() {
                expected_lines.push(expected.to_string());
            }
            i += 1;
        }
        i += 1; // skip the ===

        let expected = match expected_lines.first().and_then(|l| l.strip_prefix("ok")) {
            Some(json) => CaseExpectation::Ok(json.trim().to_string()),
            None => CaseExpectation::Issues(expected_lines),
        };

        cases.push(TestCase {
            name,
            line_number: start_line,
            schema,
            parse_to_bson,
            path,
            input: input_lines.join("\n"),
            expected,
        });
    }

    cases
}

fn parse_segment(segment: &str) -> PathSegment {
    match segment.parse::<usize>() {
        Ok(index) => PathSegment::Index(index),
        Err(_) => PathSegment::from(segment),
    }
}

impl TestCase {
    /// The input decoded into the value model.
    pub fn input_value(&self) -> Result<Value, String> {
        serde_json::from_str::<serde_json::Value>(&self.input)
            .map(Value::from)
            .map_err(|e| format!("input is not valid JSON: {e}"))
    }

    /// Compare what running this case produced against its expectation.
    pub fn check(&self, outcome: &CaseOutcome) -> Verdict {
        match (&self.expected, outcome) {
            (CaseExpectation::Ok(expected), Ok(actual)) => {
                match serde_json::from_str::<serde_json::Value>(expected) {
                    Ok(expected_json) if &expected_json == actual => Verdict::Pass,
                    Ok(_) => Verdict::Mismatch {
                        expected: expected.clone(),
                        actual: actual.to_string(),
                    },
                    Err(e) => Verdict::Error {
                        message: format!("expected output is not valid JSON: {e}"),
                    },
                }
            }
            (CaseExpectation::Ok(expected), Err(issues)) => Verdict::Mismatch {
                expected: format!("ok {expected}"),
                actual: render_issues(issues),
            },
            (CaseExpectation::Issues(expected), Ok(actual)) => Verdict::Mismatch {
                expected: expected.join("; "),
                actual: format!("ok {actual}"),
            },
            (CaseExpectation::Issues(expected), Err(issues)) => {
                let actual: Vec<String> = issues.iter().map(issue_line).collect();
                if &actual == expected {
                    Verdict::Pass
                } else {
                    Verdict::Mismatch {
                        expected: expected.join("; "),
                        actual: actual.join("; "),
                    }
                }
            }
        }
    }
}

fn render_issues(issues: &[Issue]) -> String {
    issues.iter().map(issue_line).collect::<Vec<_>>().join("; ")
}

/// Run every case through both entry points and report.
///
/// Each runner returns `Err` when the case cannot be run at all, such as an
/// unknown schema name; that is recorded as an error, not a mismatch. A case
/// whose two outcomes differ is listed as a disagreement even when neither
/// matches its expectation.
pub fn run_case_tests<S, A>(cases: &[TestCase], mut sync: S, mut deferred: A) -> CaseReport
where
    S: FnMut(&TestCase) -> Result<CaseOutcome, String>,
    A: FnMut(&TestCase) -> Result<CaseOutcome, String>,
{
    let mut report = CaseReport::new();
    report.cases = cases.len();

    for case in cases {
        let sync_outcome = sync(case);
        let async_outcome = deferred(case);

        if let (Ok(a), Ok(b)) = (&sync_outcome, &async_outcome) {
            if a != b {
                report.disagreements.push(case.name.clone());
            }
        }

        for (run, outcome) in [(Run::Sync, sync_outcome), (Run::Async, async_outcome)] {
            let verdict = match outcome {
                Ok(outcome) => case.check(&outcome),
                Err(message) => Verdict::Error { message },
            };
            report.record(&case.name, case.line_number, run, verdict);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonv_types::IssueCode;

    #[test]
    fn parse_ok_case() {
        let content = r#"
# test: hex_string
# schema: objectid
---
"507f1f77bcf86cd799439011"
---
ok "507f1f77bcf86cd799439011"
===
"#;
        let cases = parse_case_tests(content);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "hex_string");
        assert_eq!(cases[0].schema, "objectid");
        assert_eq!(cases[0].line_number, 2);
        assert!(!cases[0].parse_to_bson);
        assert_eq!(
            cases[0].expected,
            CaseExpectation::Ok("\"507f1f77bcf86cd799439011\"".to_string())
        );
        assert_eq!(
            cases[0].input_value().unwrap(),
            Value::from("507f1f77bcf86cd799439011")
        );
    }

    #[test]
    fn parse_issue_case_with_headers() {
        let content = r#"
# test: bad_nested_id
# schema: dbref
# options: bson
# path: refs 2
---
{"$ref": "users", "$id": "nope"}
---
custom @ refs[2].$id
===
"#;
        let cases = parse_case_tests(content);
        assert_eq!(cases.len(), 1);
        assert!(cases[0].parse_to_bson);
        assert_eq!(
            cases[0].path,
            vec![PathSegment::from("refs"), PathSegment::Index(2)]
        );
        assert_eq!(
            cases[0].expected,
            CaseExpectation::Issues(vec!["custom @ refs[2].$id".to_string()])
        );
    }

    #[test]
    fn check_compares_issue_lines() {
        let cases = parse_case_tests(
            "# test: t\n# schema: objectid\n---\n42\n---\ninvalid_type @ (root)\n===\n",
        );
        let case = &cases[0];
        let issue = Issue {
            code: IssueCode::Custom,
            path: vec![],
            message: "x".into(),
        };
        assert_eq!(
            case.check(&Err(vec![issue])),
            Verdict::Mismatch {
                expected: "invalid_type @ (root)".into(),
                actual: "custom @ (root)".into(),
            }
        );
    }

    #[test]
    fn runner_records_errors_separately() {
        let cases = parse_case_tests("# test: t\n# schema: nope\n---\n1\n---\nok 1\n===\n");
        let unknown = |case: &TestCase| Err(format!("unknown schema {}", case.schema));
        let report = run_case_tests(&cases, unknown, unknown);
        assert_eq!(report.sync.errors, 1);
        assert_eq!(report.deferred.errors, 1);
        assert_eq!(report.sync.mismatched, 0);
        assert!(report.disagreements.is_empty());
    }

    #[test]
    fn runner_flags_runs_that_disagree() {
        let cases = parse_case_tests("# test: t\n# schema: objectid\n---\n1\n---\nok 1\n===\n");
        let report = run_case_tests(
            &cases,
            |_| Ok(Ok(serde_json::json!(1))),
            |_| Ok(Ok(serde_json::json!(2))),
        );
        assert_eq!(report.sync.passed, 1);
        assert_eq!(report.deferred.mismatched, 1);
        assert_eq!(report.disagreements, vec!["t".to_string()]);
        assert!(!report.all_passed());
    }
}
