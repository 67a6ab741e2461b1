//! Integration tests driven by the `tests/cases/*.test` files.
//!
//! Every case runs through both entry points; the two must agree.

use bsonv_kernel::{db_ref, object_id, ParseParams, SafeParseResult, Schema};
use bsonv_testutil::cases::{parse_case_tests, run_case_tests, CaseOutcome, TestCase};
use bsonv_types::Value;

const OBJECT_ID_CASES: &str = include_str!("../../../tests/cases/objectid.test");
const DB_REF_CASES: &str = include_str!("../../../tests/cases/dbref.test");

fn params(case: &TestCase) -> ParseParams {
    ParseParams::new()
        .path(case.path.clone())
        .parse_to_bson(case.parse_to_bson)
}

fn outcome<T: Into<Value>>(result: SafeParseResult<T>) -> CaseOutcome {
    match result {
        SafeParseResult::Success { data } => Ok(data.into().to_json()),
        SafeParseResult::Failure(failure) => Err(failure.issues().to_vec()),
    }
}

fn run_sync(case: &TestCase) -> Result<CaseOutcome, String> {
    let input = case.input_value()?;
    match case.schema.as_str() {
        "objectid" => Ok(outcome(object_id().safe_parse(&input, params(case)))),
        "dbref" => Ok(outcome(db_ref().safe_parse(&input, params(case)))),
        other => Err(format!("unknown schema: {other}")),
    }
}

fn run_async(case: &TestCase) -> Result<CaseOutcome, String> {
    let input = case.input_value()?;
    futures::executor::block_on(async {
        match case.schema.as_str() {
            "objectid" => Ok(outcome(object_id().safe_parse_async(&input, params(case)).await)),
            "dbref" => Ok(outcome(db_ref().safe_parse_async(&input, params(case)).await)),
            other => Err(format!("unknown schema: {other}")),
        }
    })
}

fn run_file(content: &str) {
    let cases = parse_case_tests(content);
    assert!(!cases.is_empty(), "case file parsed to nothing");

    let report = run_case_tests(&cases, run_sync, run_async);
    println!("{report}");

    assert!(report.all_passed(), "{} failing runs", report.failures.len());
    assert_eq!(report.sync.passed, cases.len());
    assert_eq!(report.deferred.passed, cases.len());
}

#[test]
fn object_id_case_file() {
    run_file(OBJECT_ID_CASES);
}

#[test]
fn db_ref_case_file() {
    run_file(DB_REF_CASES);
}
