//! Tests for reviewer output parsing and the fix-request prompt.

use crate::review::domain::{VerdictSource, fix_request, parse_review};
use rstest::rstest;

#[rstest]
fn structured_verdict_is_extracted_from_surrounding_prose() {
    let verdict = parse_review(
        "Here is my review:\n{\"approved\": false, \"issues\": [\"missing semicolon\"]}\nThanks",
    );

    assert_eq!(verdict.source(), VerdictSource::Structured);
    assert!(!verdict.approved());
    assert_eq!(verdict.issues(), ["missing semicolon".to_owned()]);
    assert_eq!(verdict.raw(), None);
}

#[rstest]
fn structured_verdict_collapses_duplicate_issues() {
    let verdict = parse_review(r#"{"approved": false, "issues": ["a", "b", "a"]}"#);

    assert_eq!(verdict.issues(), ["a".to_owned(), "b".to_owned()]);
}

#[rstest]
fn missing_issue_list_defaults_to_empty() {
    let verdict = parse_review(r#"{"approved": true}"#);

    assert_eq!(verdict.source(), VerdictSource::Structured);
    assert!(verdict.issues().is_empty());
}

#[rstest]
#[case::plain_approval("APPROVED", true)]
#[case::lowercase_approval("looks good, approved", true)]
#[case::plain_rejection("needs more work", false)]
#[case::broken_json("{\"ok\": tru", false)]
#[case::broken_json_with_token("{approved} APPROVED", true)]
#[case::reversed_braces("} then {", false)]
#[case::object_without_verdict(r#"{"summary": "fine"}"#, false)]
fn unstructured_output_falls_back_to_heuristic(#[case] output: &str, #[case] approved: bool) {
    let verdict = parse_review(output);

    assert_eq!(verdict.source(), VerdictSource::Heuristic);
    assert_eq!(verdict.approved(), approved);
    assert!(verdict.issues().is_empty());
    assert_eq!(verdict.raw(), Some(output));
}

#[rstest]
fn rejection_without_issues_counts_as_approval() {
    let verdict = parse_review(r#"{"approved": false, "issues": []}"#);

    assert!(!verdict.approved());
    assert!(verdict.is_approval());
}

#[rstest]
fn fix_request_numbers_issues_and_fences_artifact() {
    let prompt = fix_request(
        "fn main() {}",
        &["missing docs".to_owned(), "unused import".to_owned()],
    )
    .expect("template renders");

    assert_eq!(
        prompt,
        "The code has the following issues that need to be fixed:\n\n\
         1. missing docs\n\
         2. unused import\n\
         \nPlease fix these issues in the code.\n\
         \nCurrent code:\n```\nfn main() {}\n```"
    );
}
